use std::fmt;

use silence_app::KeyCode;
use silence_app::overlay::Monitor;
use silence_rendering::{Point, Rectangle};

/// Error returned by host-facing platform side-effect APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformServicesError {
    Window(String),
    Timer(String),
    Tray(String),
    MessageBox(String),
    Other(String),
}

impl fmt::Display for PlatformServicesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformServicesError::Window(msg) => write!(f, "window error: {msg}"),
            PlatformServicesError::Timer(msg) => write!(f, "timer error: {msg}"),
            PlatformServicesError::Tray(msg) => write!(f, "tray error: {msg}"),
            PlatformServicesError::MessageBox(msg) => write!(f, "message box error: {msg}"),
            PlatformServicesError::Other(msg) => write!(f, "platform error: {msg}"),
        }
    }
}

impl std::error::Error for PlatformServicesError {}

/// Tray icon pixels, premultiplied BGRA, top-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayIconImage {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<u8>,
}

/// Tray context menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Command {
        id: u32,
        label: String,
        checked: bool,
        enabled: bool,
    },
    Separator,
    Submenu {
        label: String,
        items: Vec<MenuItem>,
    },
}

impl MenuItem {
    pub fn command(id: u32, label: impl Into<String>) -> Self {
        MenuItem::Command {
            id,
            label: label.into(),
            checked: false,
            enabled: true,
        }
    }

    /// Non-clickable informational line.
    pub fn label(label: impl Into<String>) -> Self {
        MenuItem::Command {
            id: 0,
            label: label.into(),
            checked: false,
            enabled: false,
        }
    }

    pub fn submenu(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        MenuItem::Submenu {
            label: label.into(),
            items,
        }
    }

    /// Set the check mark. No effect on separators and submenus.
    pub fn checked(mut self, value: bool) -> Self {
        if let MenuItem::Command { checked, .. } = &mut self {
            *checked = value;
        }
        self
    }

    pub fn enabled(mut self, value: bool) -> Self {
        if let MenuItem::Command { enabled, .. } = &mut self {
            *enabled = value;
        }
        self
    }

    /// Depth-first search for a command entry by id.
    pub fn find(items: &[MenuItem], wanted: u32) -> Option<&MenuItem> {
        items.iter().find_map(|item| match item {
            MenuItem::Command { id, .. } if *id == wanted => Some(item),
            MenuItem::Submenu { items, .. } => MenuItem::find(items, wanted),
            _ => None,
        })
    }
}

/// Host-facing platform API.
///
/// The boundary where the host requests platform side effects without reaching into a backend's
/// internal helpers.
pub trait HostPlatform {
    type WindowHandle: Copy;

    /// Create the hidden, click-through, topmost layered window for the badge.
    fn create_overlay_window(&self) -> Result<Self::WindowHandle, PlatformServicesError>;

    fn show_window(&self, window: Self::WindowHandle) -> Result<(), PlatformServicesError>;
    fn hide_window(&self, window: Self::WindowHandle) -> Result<(), PlatformServicesError>;

    /// Push a premultiplied BGRA frame to a layered window, moving and resizing it to `bounds`.
    ///
    /// `alpha` is the whole-window opacity applied on top of per-pixel alpha.
    fn update_layered_window(
        &self,
        window: Self::WindowHandle,
        bounds: Rectangle,
        bgra: &[u8],
        alpha: u8,
    ) -> Result<(), PlatformServicesError>;

    /// Toggle mouse pass-through on a layered window.
    fn set_click_through(
        &self,
        window: Self::WindowHandle,
        enabled: bool,
    ) -> Result<(), PlatformServicesError>;

    fn start_timer(
        &self,
        window: Self::WindowHandle,
        timer_id: u32,
        interval_ms: u32,
    ) -> Result<(), PlatformServicesError>;

    fn stop_timer(
        &self,
        window: Self::WindowHandle,
        timer_id: u32,
    ) -> Result<(), PlatformServicesError>;

    /// Request that the platform closes the window gracefully.
    fn request_close(&self, window: Self::WindowHandle) -> Result<(), PlatformServicesError>;

    fn destroy_window(&self, window: Self::WindowHandle) -> Result<(), PlatformServicesError>;

    /// Cursor position in virtual-screen coordinates.
    fn cursor_position(&self) -> Point;

    /// Current physical state of a key or mouse button.
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Connected monitors with their work areas.
    fn monitors(&self) -> Vec<Monitor>;

    /// DPI scale factor of the monitor nearest to `window` (1.0 = 96 DPI).
    fn dpi_scale(&self, window: Self::WindowHandle) -> f32;

    fn show_info_message(&self, window: Self::WindowHandle, title: &str, message: &str);
    fn show_error_message(&self, window: Self::WindowHandle, title: &str, message: &str);

    /// Initialize the system tray icon.
    fn init_tray(
        &self,
        window: Self::WindowHandle,
        tooltip: &str,
        icon: &TrayIconImage,
    ) -> Result<(), PlatformServicesError>;

    /// Replace the tray tooltip and icon.
    fn update_tray(&self, tooltip: &str, icon: &TrayIconImage)
    -> Result<(), PlatformServicesError>;

    /// Show a transient balloon notification from the tray icon.
    fn notify(&self, title: &str, message: &str) -> Result<(), PlatformServicesError>;

    /// Show a context menu at the cursor and return the chosen command id.
    fn show_tray_menu(
        &self,
        window: Self::WindowHandle,
        items: &[MenuItem],
    ) -> Result<Option<u32>, PlatformServicesError>;

    /// Cleanup the system tray icon.
    fn cleanup_tray(&self) -> Result<(), PlatformServicesError>;
}
