use windows::Win32::Foundation::HWND;
use windows::Win32::UI::HiDpi::GetDpiForWindow;

pub const BASE_DPI: u32 = 96;

/// Scale factor for `hwnd`; 1.0 when the window has no DPI yet.
pub fn scale_for_window(hwnd: HWND) -> f32 {
    let dpi = unsafe { GetDpiForWindow(hwnd) };
    scale_from_dpi(dpi)
}

#[inline]
pub fn scale_from_dpi(dpi: u32) -> f32 {
    if dpi == 0 {
        1.0
    } else {
        dpi as f32 / BASE_DPI as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_scales() {
        assert_eq!(scale_from_dpi(96), 1.0);
        assert_eq!(scale_from_dpi(144), 1.5);
        assert_eq!(scale_from_dpi(0), 1.0);
    }
}
