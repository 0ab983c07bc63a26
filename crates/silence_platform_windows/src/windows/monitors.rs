use silence_app::overlay::Monitor;
use silence_rendering::Rectangle;
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
    MONITORINFOF_PRIMARY,
};
use windows::core::BOOL;

use crate::win_api::from_wide_buffer;

/// Enumerate connected monitors in system order.
pub fn enumerate() -> Vec<Monitor> {
    let mut monitors: Vec<Monitor> = Vec::new();
    unsafe {
        let _ = EnumDisplayMonitors(
            None,
            None,
            Some(collect_monitor),
            LPARAM(&mut monitors as *mut Vec<Monitor> as isize),
        );
    }
    monitors
}

unsafe extern "system" fn collect_monitor(
    monitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    data: LPARAM,
) -> BOOL {
    let monitors = unsafe { &mut *(data.0 as *mut Vec<Monitor>) };

    let mut info = MONITORINFOEXW {
        monitorInfo: MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFOEXW>() as u32,
            ..Default::default()
        },
        ..Default::default()
    };

    let ok = unsafe {
        GetMonitorInfoW(monitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO)
    };
    if ok.as_bool() {
        monitors.push(Monitor {
            device_name: from_wide_buffer(&info.szDevice),
            work_area: rect_to_rectangle(info.monitorInfo.rcWork),
            is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    } else {
        tracing::debug!("GetMonitorInfoW failed, skipping monitor");
    }

    // Keep enumerating.
    true.into()
}

#[inline]
pub fn rect_to_rectangle(rect: RECT) -> Rectangle {
    Rectangle::new(
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_area_conversion() {
        let rect = RECT {
            left: -1920,
            top: 0,
            right: 0,
            bottom: 1040,
        };
        assert_eq!(rect_to_rectangle(rect), Rectangle::new(-1920, 0, 1920, 1040));
    }
}
