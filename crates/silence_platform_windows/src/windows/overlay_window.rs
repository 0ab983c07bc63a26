//! The badge window: a per-pixel-alpha layered popup that ignores focus and, outside of
//! positioning mode, mouse input.

use std::ffi::c_void;

use silence_rendering::Rectangle;
use windows::Win32::Foundation::{COLORREF, E_INVALIDARG, HWND, LPARAM, LRESULT, POINT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    AC_SRC_ALPHA, AC_SRC_OVER, BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLENDFUNCTION,
    CreateCompatibleDC, CreateDIBSection, DIB_RGB_COLORS, DeleteObject,
};
use windows::Win32::UI::WindowsAndMessaging::{
    IDC_SIZEALL, MA_NOACTIVATE, ULW_ALPHA, UpdateLayeredWindow, WM_MOUSEACTIVATE, WM_SETCURSOR,
    WS_EX_TRANSPARENT,
};
use windows::core::{Error, Result};

use crate::win_api;

use super::resources::{ManagedBitmap, ManagedDC, ScreenDC};

pub const OVERLAY_CLASS_NAME: &str = "silence_overlay";

pub fn create() -> Result<HWND> {
    win_api::create_layered_toolwindow(OVERLAY_CLASS_NAME, overlay_proc)
}

unsafe extern "system" fn overlay_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // Only reachable while positioning, when the window accepts the mouse.
        WM_SETCURSOR => {
            if let Ok(cursor) = win_api::load_cursor(IDC_SIZEALL) {
                win_api::set_cursor(cursor);
            }
            LRESULT(1)
        }
        WM_MOUSEACTIVATE => LRESULT(MA_NOACTIVATE as isize),
        _ => win_api::def_window_proc(hwnd, msg, wparam, lparam),
    }
}

/// Toggle `WS_EX_TRANSPARENT` so clicks either pass through or land on the badge.
pub fn set_click_through(hwnd: HWND, enabled: bool) {
    let style = win_api::get_window_ex_style(hwnd);
    let updated = if enabled {
        style | WS_EX_TRANSPARENT.0
    } else {
        style & !WS_EX_TRANSPARENT.0
    };
    if updated != style {
        win_api::set_window_ex_style(hwnd, updated);
    }
}

/// Copy a premultiplied, top-down BGRA frame into the layered window and move it to `bounds`.
pub fn update(hwnd: HWND, bounds: Rectangle, bgra: &[u8], alpha: u8) -> Result<()> {
    let (width, height) = (bounds.width, bounds.height);
    let expected = width.max(0) as usize * height.max(0) as usize * 4;
    if width <= 0 || height <= 0 || bgra.len() != expected {
        return Err(Error::from(E_INVALIDARG));
    }

    let screen = ScreenDC::acquire().ok_or_else(Error::from_win32)?;
    let memory = ManagedDC::new(unsafe { CreateCompatibleDC(Some(screen.handle())) })
        .ok_or_else(Error::from_win32)?;

    let info = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut bits: *mut c_void = std::ptr::null_mut();
    let bitmap = unsafe {
        CreateDIBSection(
            Some(screen.handle()),
            &info,
            DIB_RGB_COLORS,
            &mut bits,
            None,
            0,
        )
    }?;
    if bits.is_null() {
        unsafe {
            let _ = DeleteObject(bitmap.into());
        }
        return Err(Error::from_win32());
    }

    unsafe {
        std::ptr::copy_nonoverlapping(bgra.as_ptr(), bits.cast::<u8>(), expected);
    }

    let Some(_selected) = ManagedBitmap::select(&memory, bitmap) else {
        return Err(Error::from_win32());
    };

    let destination = POINT {
        x: bounds.x,
        y: bounds.y,
    };
    let size = SIZE {
        cx: width,
        cy: height,
    };
    let source = POINT::default();
    let blend = BLENDFUNCTION {
        BlendOp: AC_SRC_OVER as u8,
        BlendFlags: 0,
        SourceConstantAlpha: alpha,
        AlphaFormat: AC_SRC_ALPHA as u8,
    };

    unsafe {
        UpdateLayeredWindow(
            hwnd,
            Some(screen.handle()),
            Some(&destination),
            Some(&size),
            Some(memory.handle()),
            Some(&source),
            COLORREF(0),
            Some(&blend),
            ULW_ALPHA,
        )
    }
}
