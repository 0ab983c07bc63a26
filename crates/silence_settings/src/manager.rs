use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use silence_app::hotkey::HotkeyBinding;
use silence_app::overlay::{MonitorId, OverlayPlacement, VisibilityPolicy};
use silence_app::{KeyCode, Modifiers};
use silence_rendering::{BackgroundStyle, BadgeStyle, IconStyle};

use crate::Settings;

/// Unified config manager.
///
/// Holds the cached settings and writes every change straight through to disk.
pub struct ConfigManager {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager backed by the default settings file.
    pub fn new() -> Self {
        Self::with_path(Settings::settings_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            settings: Arc::new(RwLock::new(Settings::load_from(&path))),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a snapshot copy of current settings.
    pub fn get(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Get the shared settings reference.
    pub fn get_shared(&self) -> Arc<RwLock<Settings>> {
        Arc::clone(&self.settings)
    }

    /// Apply `f` to the cached settings and persist the result.
    ///
    /// The in-memory value is updated even if the write fails.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) -> anyhow::Result<()> {
        let snapshot = {
            let mut guard = self.settings.write();
            f(&mut guard);
            guard.normalize();
            guard.clone()
        };
        snapshot.save_to(&self.path)
    }

    /// Reload settings from disk.
    pub fn reload(&self) {
        let fresh = Settings::load_from(&self.path);
        *self.settings.write() = fresh;
    }

    // Conversions into the core types.

    pub fn binding(&self) -> HotkeyBinding {
        let s = self.settings.read();
        HotkeyBinding::new(
            KeyCode(s.hotkey_code),
            Modifiers::from_bits_truncate(s.hotkey_modifiers),
            s.ignore_modifiers,
        )
    }

    pub fn placement(&self) -> OverlayPlacement {
        let s = self.settings.read();
        OverlayPlacement::new(
            s.overlay_position_x,
            s.overlay_position_y,
            MonitorId::from(s.overlay_screen_id.as_str()),
        )
    }

    pub fn visibility_policy(&self) -> VisibilityPolicy {
        let s = self.settings.read();
        VisibilityPolicy {
            enabled: s.overlay_enabled,
            mode: s.overlay_visibility_mode,
        }
    }

    pub fn badge_style(&self) -> BadgeStyle {
        let s = self.settings.read();
        BadgeStyle {
            background: parse_background(&s.overlay_background_style),
            icon: parse_icon(&s.overlay_icon_style),
            show_text: s.overlay_show_text,
            opacity: s.overlay_opacity,
            content_opacity: s.overlay_content_opacity,
        }
    }

    #[inline]
    pub fn sounds_enabled(&self) -> bool {
        self.settings.read().sounds_enabled
    }

    #[inline]
    pub fn selected_microphone_id(&self) -> Option<String> {
        self.settings.read().selected_microphone_id.clone()
    }

    #[inline]
    pub fn auto_start_enabled(&self) -> bool {
        self.settings.read().auto_start_enabled
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted name of a background style.
pub fn background_name(style: BackgroundStyle) -> &'static str {
    match style {
        BackgroundStyle::Dark => "Dark",
        BackgroundStyle::Light => "Light",
    }
}

pub fn icon_name(style: IconStyle) -> &'static str {
    match style {
        IconStyle::Colored => "Colored",
        IconStyle::Monochrome => "Monochrome",
    }
}

fn parse_background(value: &str) -> BackgroundStyle {
    if value.eq_ignore_ascii_case("light") {
        BackgroundStyle::Light
    } else {
        BackgroundStyle::Dark
    }
}

fn parse_icon(value: &str) -> IconStyle {
    if value.eq_ignore_ascii_case("monochrome") {
        IconStyle::Monochrome
    } else {
        IconStyle::Colored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silence_app::overlay::VisibilityMode;

    fn manager() -> (tempfile::TempDir, ConfigManager) {
        let dir = tempfile::tempdir().expect("tempdir");
        let m = ConfigManager::with_path(dir.path().join("settings.json"));
        (dir, m)
    }

    #[test]
    fn update_writes_through() {
        let (_dir, m) = manager();
        m.update(|s| {
            s.hotkey_code = KeyCode::F5.0;
            s.hotkey_modifiers = (Modifiers::CTRL | Modifiers::SHIFT).bits();
        })
        .expect("update");

        let reopened = ConfigManager::with_path(m.path());
        assert_eq!(
            reopened.binding(),
            HotkeyBinding::new(KeyCode::F5, Modifiers::CTRL | Modifiers::SHIFT, true)
        );
    }

    #[test]
    fn update_clamps_placement() {
        let (_dir, m) = manager();
        m.update(|s| s.overlay_position_x = 250.0).expect("update");
        assert_eq!(m.placement().percent_x, 100.0);
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let (_dir, m) = manager();
        let mut edited = Settings::default();
        edited.overlay_enabled = false;
        edited.save_to(m.path()).expect("save");

        assert!(m.visibility_policy().enabled);
        m.reload();
        assert!(!m.visibility_policy().enabled);
    }

    #[test]
    fn converts_overlay_settings() {
        let (_dir, m) = manager();
        m.update(|s| {
            s.overlay_background_style = "Light".into();
            s.overlay_icon_style = "Monochrome".into();
            s.overlay_visibility_mode = VisibilityMode::WhenMuted;
            s.overlay_screen_id = r"\\.\DISPLAY2".into();
        })
        .expect("update");

        let style = m.badge_style();
        assert_eq!(style.background, BackgroundStyle::Light);
        assert_eq!(style.icon, IconStyle::Monochrome);
        assert_eq!(m.visibility_policy().mode, VisibilityMode::WhenMuted);
        assert_eq!(
            m.placement().monitor,
            MonitorId::Device(r"\\.\DISPLAY2".into())
        );
    }

    #[test]
    fn style_names_parse_back() {
        for style in [BackgroundStyle::Dark, BackgroundStyle::Light] {
            assert_eq!(parse_background(background_name(style)), style);
        }
        for style in [IconStyle::Colored, IconStyle::Monochrome] {
            assert_eq!(parse_icon(icon_name(style)), style);
        }
    }

    #[test]
    fn unknown_style_names_fall_back() {
        assert_eq!(parse_background("purple"), BackgroundStyle::Dark);
        assert_eq!(parse_icon(""), IconStyle::Colored);
    }
}
