//! RAII wrappers for GDI handles used when pushing frames to layered windows.

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    DeleteDC, DeleteObject, GetDC, HBITMAP, HDC, HGDIOBJ, ReleaseDC, SelectObject,
};

/// Screen DC obtained with `GetDC(None)`, released on drop.
pub struct ScreenDC {
    hdc: HDC,
}

impl ScreenDC {
    pub fn acquire() -> Option<Self> {
        let hdc = unsafe { GetDC(None) };
        (!hdc.is_invalid()).then_some(Self { hdc })
    }

    #[inline]
    pub fn handle(&self) -> HDC {
        self.hdc
    }
}

impl Drop for ScreenDC {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(None::<HWND>, self.hdc);
        }
    }
}

/// Memory DC from `CreateCompatibleDC`, deleted on drop.
pub struct ManagedDC {
    hdc: HDC,
}

impl ManagedDC {
    pub fn new(hdc: HDC) -> Option<Self> {
        (!hdc.is_invalid()).then_some(Self { hdc })
    }

    #[inline]
    pub fn handle(&self) -> HDC {
        self.hdc
    }
}

impl Drop for ManagedDC {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteDC(self.hdc);
        }
    }
}

/// Bitmap selected into a DC for the guard's lifetime.
///
/// Drop restores the previous selection before deleting the bitmap.
pub struct ManagedBitmap<'dc> {
    dc: &'dc ManagedDC,
    bitmap: HBITMAP,
    previous: HGDIOBJ,
}

impl<'dc> ManagedBitmap<'dc> {
    pub fn select(dc: &'dc ManagedDC, bitmap: HBITMAP) -> Option<Self> {
        if bitmap.is_invalid() {
            return None;
        }
        let previous = unsafe { SelectObject(dc.handle(), bitmap.into()) };
        Some(Self {
            dc,
            bitmap,
            previous,
        })
    }
}

impl Drop for ManagedBitmap<'_> {
    fn drop(&mut self) {
        unsafe {
            SelectObject(self.dc.handle(), self.previous);
            let _ = DeleteObject(self.bitmap.into());
        }
    }
}
