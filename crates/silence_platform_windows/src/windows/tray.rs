use std::ffi::c_void;
use std::fmt;

use silence_platform::{MenuItem, TrayIconImage};
use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, CreateBitmap, CreateDIBSection, DIB_RGB_COLORS,
    DeleteObject, HBITMAP,
};
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_TIP, NIIF_INFO, NIM_ADD, NIM_DELETE, NIM_MODIFY,
    NOTIFY_ICON_MESSAGE, NOTIFYICONDATAW, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreateIconIndirect, CreatePopupMenu, DestroyIcon, DestroyMenu, GetCursorPos,
    HICON, HMENU, ICONINFO, MENU_ITEM_FLAGS, MF_CHECKED, MF_GRAYED, MF_POPUP, MF_SEPARATOR,
    MF_STRING, SetForegroundWindow, TPM_RETURNCMD, TPM_RIGHTBUTTON, TrackPopupMenu, WM_NULL,
};
use windows::core::PCWSTR;

use crate::win_api::{copy_to_wide_buffer, post_message, to_wide_chars};

#[derive(Debug)]
pub enum TrayIconError {
    InvalidImage { width: u32, height: u32, len: usize },
    Windows(windows::core::Error),
}

impl fmt::Display for TrayIconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrayIconError::InvalidImage { width, height, len } => {
                write!(f, "icon buffer of {len} bytes does not match {width}x{height}")
            }
            TrayIconError::Windows(e) => write!(f, "windows error: {e:?}"),
        }
    }
}

impl std::error::Error for TrayIconError {}

impl From<windows::core::Error> for TrayIconError {
    fn from(value: windows::core::Error) -> Self {
        TrayIconError::Windows(value)
    }
}

pub type Result<T> = std::result::Result<T, TrayIconError>;

/// Owned `HICON`, destroyed on drop.
#[derive(Debug)]
pub struct OwnedIcon(HICON);

impl OwnedIcon {
    #[inline]
    pub fn handle(&self) -> HICON {
        self.0
    }
}

impl Drop for OwnedIcon {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyIcon(self.0);
        }
    }
}

struct OwnedBitmap(HBITMAP);

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteObject(self.0.into());
        }
    }
}

/// Build an alpha icon from premultiplied BGRA pixels.
pub fn icon_from_bgra(image: &TrayIconImage) -> Result<OwnedIcon> {
    let (width, height) = (image.width as i32, image.height as i32);
    let expected = image.width as usize * image.height as usize * 4;
    if width <= 0 || height <= 0 || image.bgra.len() != expected {
        return Err(TrayIconError::InvalidImage {
            width: image.width,
            height: image.height,
            len: image.bgra.len(),
        });
    }

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
    let color = OwnedBitmap(unsafe {
        CreateDIBSection(None, &info, DIB_RGB_COLORS, &mut bits, None, 0)
    }?);
    if bits.is_null() {
        return Err(windows::core::Error::from_win32().into());
    }
    unsafe {
        std::ptr::copy_nonoverlapping(image.bgra.as_ptr(), bits.cast::<u8>(), expected);
    }

    // Alpha icons still need a monochrome mask; its contents are ignored.
    let mask = OwnedBitmap(unsafe { CreateBitmap(width, height, 1, 1, None) });
    if mask.0.is_invalid() {
        return Err(windows::core::Error::from_win32().into());
    }

    let icon_info = ICONINFO {
        fIcon: true.into(),
        xHotspot: 0,
        yHotspot: 0,
        hbmMask: mask.0,
        hbmColor: color.0,
    };
    let icon = unsafe { CreateIconIndirect(&icon_info) }?;
    Ok(OwnedIcon(icon))
}

fn notify_data(hwnd: HWND, icon_id: u32) -> NOTIFYICONDATAW {
    NOTIFYICONDATAW {
        cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: icon_id,
        ..Default::default()
    }
}

fn notify(
    action: NOTIFY_ICON_MESSAGE,
    hwnd: HWND,
    icon_id: u32,
    callback_message: u32,
    tooltip: &str,
    icon: HICON,
) -> bool {
    let mut nid = notify_data(hwnd, icon_id);
    nid.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
    nid.uCallbackMessage = callback_message;
    nid.hIcon = icon;
    copy_to_wide_buffer(tooltip, &mut nid.szTip);
    unsafe { Shell_NotifyIconW(action, &nid).as_bool() }
}

/// Add the tray icon. `callback_message` is delivered to `hwnd` with the mouse message in
/// `lparam`.
pub fn add_tray_icon(
    hwnd: HWND,
    icon_id: u32,
    callback_message: u32,
    tooltip: &str,
    icon: HICON,
) -> bool {
    notify(NIM_ADD, hwnd, icon_id, callback_message, tooltip, icon)
}

pub fn modify_tray_icon(
    hwnd: HWND,
    icon_id: u32,
    callback_message: u32,
    tooltip: &str,
    icon: HICON,
) -> bool {
    notify(NIM_MODIFY, hwnd, icon_id, callback_message, tooltip, icon)
}

/// Show a balloon notification anchored to an existing tray icon.
pub fn show_balloon(hwnd: HWND, icon_id: u32, title: &str, message: &str) -> bool {
    let mut nid = notify_data(hwnd, icon_id);
    nid.uFlags = NIF_INFO;
    nid.dwInfoFlags = NIIF_INFO;
    copy_to_wide_buffer(title, &mut nid.szInfoTitle);
    copy_to_wide_buffer(message, &mut nid.szInfo);
    unsafe { Shell_NotifyIconW(NIM_MODIFY, &nid).as_bool() }
}

pub fn delete_tray_icon(hwnd: HWND, icon_id: u32) -> bool {
    let nid = notify_data(hwnd, icon_id);
    unsafe { Shell_NotifyIconW(NIM_DELETE, &nid).as_bool() }
}

fn append_items(menu: HMENU, items: &[MenuItem]) -> windows::core::Result<()> {
    for item in items {
        match item {
            MenuItem::Command {
                id,
                label,
                checked,
                enabled,
            } => {
                let mut flags = MF_STRING;
                if *checked {
                    flags |= MF_CHECKED;
                }
                if !*enabled {
                    flags |= MF_GRAYED;
                }
                let text = to_wide_chars(label);
                unsafe { AppendMenuW(menu, flags, *id as usize, PCWSTR(text.as_ptr())) }?;
            }
            MenuItem::Separator => unsafe {
                AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null())?;
            },
            MenuItem::Submenu { label, items } => {
                let submenu = unsafe { CreatePopupMenu() }?;
                if let Err(e) = append_items(submenu, items) {
                    unsafe {
                        let _ = DestroyMenu(submenu);
                    }
                    return Err(e);
                }
                let text = to_wide_chars(label);
                let flags: MENU_ITEM_FLAGS = MF_STRING | MF_POPUP;
                // Ownership of the submenu passes to the parent once appended.
                unsafe {
                    AppendMenuW(menu, flags, submenu.0 as usize, PCWSTR(text.as_ptr()))
                }?;
            }
        }
    }
    Ok(())
}

/// Show `items` as a popup menu at the cursor.
///
/// Returns the chosen command id, or `None` if the menu was dismissed.
pub fn track_menu(hwnd: HWND, items: &[MenuItem]) -> windows::core::Result<Option<u32>> {
    let menu = unsafe { CreatePopupMenu() }?;
    if let Err(e) = append_items(menu, items) {
        unsafe {
            let _ = DestroyMenu(menu);
        }
        return Err(e);
    }

    let mut cursor = POINT::default();
    let cmd = unsafe {
        let _ = GetCursorPos(&mut cursor);
        // The menu only closes on outside clicks if the owner is foreground.
        let _ = SetForegroundWindow(hwnd);
        let cmd = TrackPopupMenu(
            menu,
            TPM_RIGHTBUTTON | TPM_RETURNCMD,
            cursor.x,
            cursor.y,
            Some(0),
            hwnd,
            None,
        );
        let _ = DestroyMenu(menu);
        cmd
    };
    let _ = post_message(hwnd, WM_NULL, 0, 0);

    Ok(match cmd.0 as u32 {
        0 => None,
        id => Some(id),
    })
}
