use std::{ffi::OsStr, ffi::c_void, iter::once, os::windows::ffi::OsStrExt};

use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::System::Com::CoInitialize;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::{PROCESS_PER_MONITOR_DPI_AWARE, SetProcessDpiAwareness};
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::PCWSTR;

#[inline]
pub fn set_process_per_monitor_dpi_aware() -> windows::core::Result<()> {
    unsafe { SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE) }
}

#[inline]
pub fn co_initialize() -> windows::core::HRESULT {
    unsafe { CoInitialize(None) }
}

#[inline]
pub fn get_window_user_data(hwnd: HWND) -> isize {
    unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) }
}

#[inline]
pub fn set_window_user_data(hwnd: HWND, data: isize) -> isize {
    unsafe { SetWindowLongPtrW(hwnd, GWLP_USERDATA, data) }
}

#[inline]
pub fn get_window_ex_style(hwnd: HWND) -> u32 {
    unsafe { GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32 }
}

#[inline]
pub fn set_window_ex_style(hwnd: HWND, style: u32) {
    unsafe {
        SetWindowLongPtrW(hwnd, GWL_EXSTYLE, style as isize);
    }
}

#[inline]
pub fn def_window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

#[inline]
pub fn get_module_handle() -> windows::core::Result<HMODULE> {
    unsafe { GetModuleHandleW(None) }
}

#[inline]
pub fn load_cursor(cursor: PCWSTR) -> windows::core::Result<HCURSOR> {
    unsafe { LoadCursorW(None, cursor) }
}

#[inline]
pub fn set_cursor(cursor: HCURSOR) {
    unsafe {
        SetCursor(Some(cursor));
    }
}

pub fn register_window_class(
    window_class_name: &str,
    window_proc: unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT,
    class_style: WNDCLASS_STYLES,
) -> windows::core::Result<HMODULE> {
    let instance = get_module_handle()?;
    let class_name = to_wide_chars(window_class_name);

    let window_class = WNDCLASSW {
        lpfnWndProc: Some(window_proc),
        hInstance: instance.into(),
        lpszClassName: PCWSTR(class_name.as_ptr()),
        hbrBackground: HBRUSH(std::ptr::null_mut()),
        hCursor: load_cursor(IDC_ARROW)?,
        style: class_style,
        ..Default::default()
    };

    // Re-registration fails harmlessly when the class already exists.
    unsafe {
        RegisterClassW(&window_class);
    }
    Ok(instance)
}

/// Create a hidden top-level tool window.
///
/// A real (non message-only) window is used so broadcast messages such as `WM_DISPLAYCHANGE`
/// are delivered.
pub fn create_hidden_toolwindow_with_params(
    window_class_name: &str,
    window_proc: unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT,
    class_style: WNDCLASS_STYLES,
    create_params: Option<*const c_void>,
) -> windows::core::Result<HWND> {
    let instance = register_window_class(window_class_name, window_proc, class_style)?;
    let class_name = to_wide_chars(window_class_name);

    let hwnd = unsafe {
        CreateWindowExW(
            WS_EX_TOOLWINDOW,
            PCWSTR(class_name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP,
            0,
            0,
            0,
            0,
            None,
            None,
            Some(instance.into()),
            create_params,
        )
    }?;
    let _ = hide_window(hwnd);
    Ok(hwnd)
}

/// Create a hidden, topmost, click-through layered window that never takes focus.
pub fn create_layered_toolwindow(
    window_class_name: &str,
    window_proc: unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT,
) -> windows::core::Result<HWND> {
    let instance = register_window_class(window_class_name, window_proc, WNDCLASS_STYLES(0))?;
    let class_name = to_wide_chars(window_class_name);

    unsafe {
        CreateWindowExW(
            WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE | WS_EX_TOPMOST,
            PCWSTR(class_name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP,
            0,
            0,
            0,
            0,
            None,
            None,
            Some(instance.into()),
            None,
        )
    }
}

#[inline]
pub fn hide_window(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        let _ = ShowWindow(hwnd, SW_HIDE);
    }
    Ok(())
}

/// Show without stealing focus from the foreground application.
#[inline]
pub fn show_window_no_activate(hwnd: HWND) -> windows::core::Result<()> {
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
    }
    Ok(())
}

#[inline]
pub fn start_timer(hwnd: HWND, timer_id: u32, interval_ms: u32) -> windows::core::Result<()> {
    let id = unsafe { SetTimer(Some(hwnd), timer_id as usize, interval_ms, None) };
    if id == 0 {
        return Err(windows::core::Error::from_win32());
    }
    Ok(())
}

#[inline]
pub fn stop_timer(hwnd: HWND, timer_id: u32) -> windows::core::Result<()> {
    unsafe { KillTimer(Some(hwnd), timer_id as usize) }
}

#[inline]
pub fn destroy_window(hwnd: HWND) -> windows::core::Result<()> {
    unsafe { DestroyWindow(hwnd) }
}

#[inline]
pub fn quit_message_loop(exit_code: i32) {
    unsafe {
        PostQuitMessage(exit_code);
    }
}

#[inline]
pub fn run_message_loop() {
    unsafe {
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

#[inline]
pub fn post_message(
    hwnd: HWND,
    msg: u32,
    wparam: usize,
    lparam: isize,
) -> windows::core::Result<()> {
    unsafe { PostMessageW(Some(hwnd), msg, WPARAM(wparam), LPARAM(lparam)) }
}

/// Ask another thread's message loop to exit.
#[inline]
pub fn post_thread_quit(thread_id: u32) -> windows::core::Result<()> {
    unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
}

#[inline]
pub fn cursor_pos() -> POINT {
    let mut point = POINT::default();
    unsafe {
        let _ = GetCursorPos(&mut point);
    }
    point
}

/// Physical key state, independent of the calling thread's input queue.
#[inline]
pub fn is_key_down(vkey: u32) -> bool {
    let state = unsafe { GetAsyncKeyState(vkey as i32) };
    (state as u16 & 0x8000) != 0
}

/// Convert a Rust string to a NUL-terminated UTF-16 buffer for Win32 APIs.
#[inline]
pub fn to_wide_chars(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

/// Copy `s` into a fixed UTF-16 buffer, truncating and NUL-terminating.
pub fn copy_to_wide_buffer<const N: usize>(s: &str, buffer: &mut [u16; N]) {
    *buffer = [0u16; N];
    let wide: Vec<u16> = OsStr::new(s).encode_wide().collect();
    let len = wide.len().min(N.saturating_sub(1));
    buffer[..len].copy_from_slice(&wide[..len]);
}

/// Decode a NUL-terminated UTF-16 buffer.
pub fn from_wide_buffer(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_buffer_truncates_and_terminates() {
        let mut buf = [0xFFFFu16; 8];
        copy_to_wide_buffer("silence! - Microphone MUTED", &mut buf);
        assert_eq!(buf[7], 0);
        assert_eq!(from_wide_buffer(&buf), "silence");
    }

    #[test]
    fn wide_chars_are_nul_terminated() {
        assert_eq!(to_wide_chars("ab"), vec![97, 98, 0]);
    }
}
