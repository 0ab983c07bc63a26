use silence_app::KeyCode;
use silence_app::overlay::VisibilityMode;
use silence_app::overlay::placement::PRIMARY_MONITOR_KEY;

pub const APP_DIR_NAME: &str = "Silence";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

// Hotkey defaults
pub fn default_hotkey_code() -> u32 {
    KeyCode::F21.0
}

pub fn default_hotkey_modifiers() -> u8 {
    0
}

pub fn default_ignore_modifiers() -> bool {
    true
}

// Startup defaults
pub fn default_start_minimized() -> bool {
    true
}

// Overlay defaults
pub fn default_overlay_enabled() -> bool {
    true
}

pub fn default_overlay_visibility_mode() -> VisibilityMode {
    VisibilityMode::Always
}

pub fn default_overlay_screen_id() -> String {
    PRIMARY_MONITOR_KEY.to_string()
}

pub fn default_overlay_position_x() -> f64 {
    50.0
}

pub fn default_overlay_position_y() -> f64 {
    80.0
}

pub fn default_overlay_background_style() -> String {
    "Dark".to_string()
}

pub fn default_overlay_icon_style() -> String {
    "Colored".to_string()
}

pub fn default_overlay_opacity() -> u8 {
    80
}

pub fn default_overlay_content_opacity() -> u8 {
    100
}

// Sound defaults
pub fn default_mute_sound() -> Option<String> {
    Some("blob".to_string())
}

pub fn default_unmute_sound() -> Option<String> {
    Some("blob".to_string())
}

pub fn default_sound_volume() -> f32 {
    0.5
}
