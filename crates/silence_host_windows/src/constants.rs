pub const WINDOW_CLASS_NAME: &str = "silence_message_window";

/// Title used for balloons and message boxes.
pub const APP_TITLE: &str = "silence!";

// ==================== Timers ====================

/// Drives overlay fades, crossfades and drag tracking.
pub const TIMER_UI_TICK_ID: u32 = 3001;

// ==================== Tray ====================

/// Tray icon edge in pixels.
pub const TRAY_ICON_SIZE: u32 = 32;

pub const TOOLTIP_MUTED: &str = "silence! - Microphone MUTED";
pub const TOOLTIP_UNMUTED: &str = "silence! - Microphone ON";
pub const TOOLTIP_RECORDING: &str = "silence! - Press the new hotkey (Esc cancels)";
