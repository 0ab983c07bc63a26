use silence_app::hotkey;
use silence_app::overlay::{OverlayPlacement, VisibilityMode};
use silence_rendering::{BackgroundStyle, IconStyle};

/// Target monitor picked from the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenChoice {
    Primary,
    /// Index into the monitor list the menu was built from.
    Index(usize),
}

/// Tray menu selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    ToggleMute,
    /// Start recording, or cancel a running recording.
    RecordHotkey,
    ToggleIgnoreExtraModifiers,
    ToggleOverlay,
    SetVisibility(VisibilityMode),
    SetScreen(ScreenChoice),
    ToggleOverlayText,
    SetBackground(BackgroundStyle),
    SetIconStyle(IconStyle),
    /// Enter positioning mode, or finish it.
    TogglePositioning,
    ToggleSounds,
    ToggleAutostart,
    /// `None` follows the default capture device; `Some(i)` indexes the listed devices.
    SelectMicrophone(Option<usize>),
    Exit,
}

/// Host command queue items.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Core actions (platform-neutral). Executed by the host.
    Core(silence_app::Action),
    /// Hotkey state machine actions, run against the model shared with the hook thread.
    Hotkey(hotkey::Action),

    /// Flip the microphone mute state.
    ToggleMute,
    /// Re-read the endpoint and feed the result to the core.
    SyncMuteState,

    /// Rebuild overlay policy, placement and work area from settings and monitors.
    ConfigureOverlay,
    /// Measure, render and push the badge to the overlay window.
    RenderOverlay,
    ShowOverlay,
    HideOverlay,
    SetClickThrough(bool),
    SavePlacement(OverlayPlacement),
    /// Start or stop the UI tick to match what the overlay needs.
    ScheduleTick,

    /// Refresh tray icon and tooltip.
    UpdateTray,
    PlayFeedback { muted: bool },
    ShowTrayMenu,
    Tray(TrayCommand),

    /// Non-blocking tray notification.
    Notify(String),
    /// Show error.
    ShowError(String),

    /// Quit the app (destroy the message window).
    QuitApp,

    /// No-op.
    None,
}
