use std::fmt;

use silence_platform::{TrayEvent, TrayIconImage, WindowId};
use windows::Win32::UI::WindowsAndMessaging::{WM_APP, WM_LBUTTONUP, WM_RBUTTONUP};

use super::{SafeHwnd, tray};

pub const TRAY_CALLBACK_MESSAGE: u32 = WM_APP + 1;
const TRAY_ICON_ID: u32 = 1;

pub fn tray_event_from_callback(lparam: u32) -> Option<TrayEvent> {
    match lparam {
        WM_LBUTTONUP => Some(TrayEvent::LeftClick),
        WM_RBUTTONUP => Some(TrayEvent::RightClick),
        _ => None,
    }
}

#[derive(Debug)]
pub enum TrayManagerError {
    Icon(tray::TrayIconError),
    NotInitialized,
    AddFailed,
    ModifyFailed,
    NotifyFailed,
}

impl fmt::Display for TrayManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrayManagerError::Icon(e) => write!(f, "tray icon error: {e}"),
            TrayManagerError::NotInitialized => write!(f, "tray icon not initialized"),
            TrayManagerError::AddFailed => write!(f, "failed to add tray icon"),
            TrayManagerError::ModifyFailed => write!(f, "failed to update tray icon"),
            TrayManagerError::NotifyFailed => write!(f, "failed to show tray notification"),
        }
    }
}

impl std::error::Error for TrayManagerError {}

impl From<tray::TrayIconError> for TrayManagerError {
    fn from(value: tray::TrayIconError) -> Self {
        TrayManagerError::Icon(value)
    }
}

pub type Result<T> = std::result::Result<T, TrayManagerError>;

/// Stateful system tray icon owner.
///
/// Keeps the current `HICON` alive until the shell has been handed its replacement.
#[derive(Debug, Default)]
pub struct TrayManager {
    hwnd: SafeHwnd,
    icon: Option<tray::OwnedIcon>,
    is_added: bool,
}

impl TrayManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        window: WindowId,
        tooltip: &str,
        image: &TrayIconImage,
    ) -> Result<()> {
        let hwnd = super::hwnd(window);
        self.hwnd.set(Some(hwnd));

        let icon = tray::icon_from_bgra(image)?;
        if !tray::add_tray_icon(
            hwnd,
            TRAY_ICON_ID,
            TRAY_CALLBACK_MESSAGE,
            tooltip,
            icon.handle(),
        ) {
            return Err(TrayManagerError::AddFailed);
        }

        self.icon = Some(icon);
        self.is_added = true;
        Ok(())
    }

    pub fn update(&mut self, tooltip: &str, image: &TrayIconImage) -> Result<()> {
        let Some(hwnd) = self.hwnd.get().filter(|_| self.is_added) else {
            return Err(TrayManagerError::NotInitialized);
        };

        let icon = tray::icon_from_bgra(image)?;
        if !tray::modify_tray_icon(
            hwnd,
            TRAY_ICON_ID,
            TRAY_CALLBACK_MESSAGE,
            tooltip,
            icon.handle(),
        ) {
            return Err(TrayManagerError::ModifyFailed);
        }

        // Dropping the previous icon destroys it.
        self.icon = Some(icon);
        Ok(())
    }

    pub fn notify(&self, title: &str, message: &str) -> Result<()> {
        let Some(hwnd) = self.hwnd.get().filter(|_| self.is_added) else {
            return Err(TrayManagerError::NotInitialized);
        };
        if tray::show_balloon(hwnd, TRAY_ICON_ID, title, message) {
            Ok(())
        } else {
            Err(TrayManagerError::NotifyFailed)
        }
    }

    pub fn cleanup(&mut self) {
        if !self.is_added {
            return;
        }

        if let Some(hwnd) = self.hwnd.get() {
            let _ = tray::delete_tray_icon(hwnd, TRAY_ICON_ID);
        }
        self.is_added = false;
        self.icon = None;
    }
}

impl Drop for TrayManager {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::UI::WindowsAndMessaging::WM_MOUSEMOVE;

    #[test]
    fn callback_mapping() {
        assert_eq!(tray_event_from_callback(WM_LBUTTONUP), Some(TrayEvent::LeftClick));
        assert_eq!(tray_event_from_callback(WM_RBUTTONUP), Some(TrayEvent::RightClick));
        assert_eq!(tray_event_from_callback(WM_MOUSEMOVE), None);
    }

    #[test]
    fn update_before_initialize_fails() {
        let mut tray = TrayManager::new();
        let image = TrayIconImage {
            width: 1,
            height: 1,
            bgra: vec![0; 4],
        };
        assert!(matches!(
            tray.update("silence!", &image),
            Err(TrayManagerError::NotInitialized)
        ));
    }
}
