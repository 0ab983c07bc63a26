pub use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, SIZE, WPARAM};
pub use windows::Win32::UI::WindowsAndMessaging::{
    WM_APP, WM_CLOSE, WM_CREATE, WM_DESTROY, WM_DISPLAYCHANGE, WM_DPICHANGED, WM_SETCURSOR,
    WM_SETTINGCHANGE, WM_TIMER, WNDCLASS_STYLES,
};
pub use windows::core::Result;
