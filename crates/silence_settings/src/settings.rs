use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use silence_app::overlay::VisibilityMode;
use silence_app::overlay::placement::clamp_percent;

use crate::defaults::*;

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Hotkey (virtual key + Shift=1/Ctrl=2/Alt=4/Win=8 bit set)
    #[serde(default = "default_hotkey_code")]
    pub hotkey_code: u32,
    #[serde(default = "default_hotkey_modifiers")]
    pub hotkey_modifiers: u8,
    #[serde(default = "default_ignore_modifiers")]
    pub ignore_modifiers: bool,

    /// Capture endpoint id; `None` follows the default capture device.
    #[serde(default)]
    pub selected_microphone_id: Option<String>,

    // Startup
    #[serde(default)]
    pub auto_start_enabled: bool,
    #[serde(default = "default_start_minimized")]
    pub start_minimized: bool,

    // Overlay
    #[serde(default = "default_overlay_enabled")]
    pub overlay_enabled: bool,
    #[serde(default = "default_overlay_visibility_mode")]
    pub overlay_visibility_mode: VisibilityMode,
    #[serde(default = "default_overlay_screen_id")]
    pub overlay_screen_id: String,
    #[serde(default = "default_overlay_position_x")]
    pub overlay_position_x: f64,
    #[serde(default = "default_overlay_position_y")]
    pub overlay_position_y: f64,
    #[serde(default)]
    pub overlay_show_text: bool,
    /// `"Dark"` or `"Light"`.
    #[serde(default = "default_overlay_background_style")]
    pub overlay_background_style: String,
    /// `"Colored"` or `"Monochrome"`.
    #[serde(default = "default_overlay_icon_style")]
    pub overlay_icon_style: String,
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: u8,
    #[serde(default = "default_overlay_content_opacity")]
    pub overlay_content_opacity: u8,

    // Sounds
    #[serde(default)]
    pub sounds_enabled: bool,
    /// Preset key, e.g. `"blob"` for `blob_mute.mp3`.
    #[serde(default = "default_mute_sound")]
    pub mute_sound: Option<String>,
    #[serde(default = "default_unmute_sound")]
    pub unmute_sound: Option<String>,
    #[serde(default)]
    pub custom_mute_sound_path: Option<String>,
    #[serde(default)]
    pub custom_unmute_sound_path: Option<String>,
    #[serde(default = "default_sound_volume")]
    pub sound_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey_code: default_hotkey_code(),
            hotkey_modifiers: default_hotkey_modifiers(),
            ignore_modifiers: default_ignore_modifiers(),

            selected_microphone_id: None,

            auto_start_enabled: false,
            start_minimized: default_start_minimized(),

            overlay_enabled: default_overlay_enabled(),
            overlay_visibility_mode: default_overlay_visibility_mode(),
            overlay_screen_id: default_overlay_screen_id(),
            overlay_position_x: default_overlay_position_x(),
            overlay_position_y: default_overlay_position_y(),
            overlay_show_text: false,
            overlay_background_style: default_overlay_background_style(),
            overlay_icon_style: default_overlay_icon_style(),
            overlay_opacity: default_overlay_opacity(),
            overlay_content_opacity: default_overlay_content_opacity(),

            sounds_enabled: false,
            mute_sound: default_mute_sound(),
            unmute_sound: default_unmute_sound(),
            custom_mute_sound_path: None,
            custom_unmute_sound_path: None,
            sound_volume: default_sound_volume(),
        }
    }
}

impl Settings {
    /// `%LOCALAPPDATA%\Silence` on Windows.
    pub fn settings_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    pub fn settings_path() -> PathBuf {
        Self::settings_dir().join(SETTINGS_FILE_NAME)
    }

    /// Load settings from the default location.
    ///
    /// Falls back to defaults if loading fails.
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to read settings: {e}");
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                settings.normalize();
                settings
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "settings file is corrupt, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut normalized = self.clone();
        normalized.normalize();
        let content = serde_json::to_string_pretty(&normalized)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Clamp out-of-range values from hand-edited files.
    pub fn normalize(&mut self) {
        self.overlay_position_x = clamp_percent(self.overlay_position_x);
        self.overlay_position_y = clamp_percent(self.overlay_position_y);
        self.overlay_opacity = self.overlay_opacity.min(100);
        self.overlay_content_opacity = self.overlay_content_opacity.min(100);
        self.sound_volume = if self.sound_volume.is_nan() {
            default_sound_volume()
        } else {
            self.sound_volume.clamp(0.0, 1.0)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.hotkey_code, 0x84);
        assert_eq!(s.hotkey_modifiers, 0);
        assert!(s.ignore_modifiers);
        assert_eq!(s.overlay_screen_id, "PRIMARY");
        assert_eq!((s.overlay_position_x, s.overlay_position_y), (50.0, 80.0));
        assert_eq!(s.overlay_opacity, 80);
        assert_eq!(s.overlay_content_opacity, 100);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");

        let mut s = Settings::default();
        s.hotkey_code = 0x74;
        s.hotkey_modifiers = 2 | 1;
        s.overlay_visibility_mode = VisibilityMode::WhenMuted;
        s.overlay_screen_id = r"\\.\DISPLAY2".to_string();
        s.custom_mute_sound_path = Some("C:/sounds/click.wav".to_string());
        s.save_to(&path).expect("save");

        assert_eq!(Settings::load_from(&path), s);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "hotkey_code": 77, "overlay_show_text": true }"#).expect("write");

        let s = Settings::load_from(&path);
        assert_eq!(s.hotkey_code, 77);
        assert!(s.overlay_show_text);
        assert!(s.ignore_modifiers);
        assert_eq!(s.mute_sound.as_deref(), Some("blob"));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            Settings::load_from(&dir.path().join("absent.json")),
            Settings::default()
        );
    }

    #[test]
    fn out_of_range_values_are_clamped_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "overlay_position_x": 140.0, "overlay_position_y": -3.0,
                 "overlay_opacity": 250, "sound_volume": 4.0 }"#,
        )
        .expect("write");

        let s = Settings::load_from(&path);
        assert_eq!(s.overlay_position_x, 100.0);
        assert_eq!(s.overlay_position_y, 0.0);
        assert_eq!(s.overlay_opacity, 100);
        assert_eq!(s.sound_volume, 1.0);
    }

    #[test]
    fn visibility_mode_is_stored_by_name() {
        let mut s = Settings::default();
        s.overlay_visibility_mode = VisibilityMode::WhenUnmuted;
        let json = serde_json::to_string(&s).expect("json");
        assert!(json.contains(r#""overlay_visibility_mode":"WhenUnmuted""#));
    }
}
