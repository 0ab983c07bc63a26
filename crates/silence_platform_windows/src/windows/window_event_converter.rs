use silence_platform::WindowEvent;
use windows::Win32::UI::WindowsAndMessaging::SPI_SETWORKAREA;

use crate::win32::{LPARAM, WM_DISPLAYCHANGE, WM_DPICHANGED, WM_SETTINGCHANGE, WPARAM};

pub struct WindowEventConverter;

impl WindowEventConverter {
    pub fn convert(msg: u32, wparam: WPARAM, _lparam: LPARAM) -> Option<WindowEvent> {
        match msg {
            WM_DISPLAYCHANGE => Some(WindowEvent::DisplayChanged),

            // Taskbar moved or resized.
            WM_SETTINGCHANGE if wparam.0 as u32 == SPI_SETWORKAREA.0 => {
                Some(WindowEvent::DisplayChanged)
            }

            WM_DPICHANGED => Some(WindowEvent::DpiChanged {
                dpi: (wparam.0 as u32) & 0xFFFF,
            }),

            _ => None,
        }
    }
}
