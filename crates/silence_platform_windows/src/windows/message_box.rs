use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    MB_ICONERROR, MB_ICONINFORMATION, MB_OK, MB_SETFOREGROUND, MESSAGEBOX_STYLE, MessageBoxW,
};
use windows::core::PCWSTR;

use crate::win_api::to_wide_chars;

#[inline]
pub fn show_error(hwnd: HWND, title: &str, message: &str) {
    show(hwnd, title, message, MB_OK | MB_ICONERROR | MB_SETFOREGROUND);
}

#[inline]
pub fn show_info(hwnd: HWND, title: &str, message: &str) {
    show(hwnd, title, message, MB_OK | MB_ICONINFORMATION | MB_SETFOREGROUND);
}

/// Blocks until dismissed. The owner is the hidden message window, so the box has no taskbar
/// parent and must force itself to the foreground.
fn show(hwnd: HWND, title: &str, message: &str, style: MESSAGEBOX_STYLE) {
    let title_w = to_wide_chars(title);
    let message_w = to_wide_chars(message);

    unsafe {
        let _ = MessageBoxW(
            Some(hwnd),
            PCWSTR(message_w.as_ptr()),
            PCWSTR(title_w.as_ptr()),
            style,
        );
    }
}
