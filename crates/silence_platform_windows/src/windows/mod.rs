pub mod app_runner;
pub mod autostart;
pub mod dpi;
pub mod host_platform;
pub mod keyboard_hook;
pub mod message_box;
pub mod microphone;
pub mod monitors;
pub mod overlay_window;
pub mod resources;
pub mod tray;
pub mod tray_manager;
mod window_event_converter;

pub use app_runner::{UserEventSender, run_message_window_app};
pub use autostart::RegistryAutostart;
pub use host_platform::WindowsHostPlatform;
pub use keyboard_hook::LowLevelKeyboardHook;
pub use microphone::CoreAudioMicrophone;
pub use resources::{ManagedBitmap, ManagedDC, ScreenDC};
pub use tray_manager::TrayManager;

use std::ffi::c_void;

use silence_platform::WindowId;
use windows::Win32::Foundation::HWND;

#[inline]
pub fn window_id(hwnd: HWND) -> WindowId {
    WindowId::from_raw(hwnd.0 as usize)
}

#[inline]
pub fn hwnd(window: WindowId) -> HWND {
    HWND(window.raw() as *mut c_void)
}

/// Window handle slot that may be empty before initialization.
#[derive(Debug, Default, Clone, Copy)]
pub struct SafeHwnd {
    hwnd: Option<HWND>,
}

impl SafeHwnd {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd: Some(hwnd) }
    }

    pub fn set(&mut self, hwnd: Option<HWND>) {
        self.hwnd = hwnd;
    }

    pub fn get(&self) -> Option<HWND> {
        self.hwnd
    }
}
