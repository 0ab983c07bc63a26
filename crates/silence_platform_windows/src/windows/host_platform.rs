use std::cell::RefCell;

use silence_app::KeyCode;
use silence_app::overlay::Monitor;
use silence_platform::{HostPlatform, MenuItem, PlatformServicesError, TrayIconImage, WindowId};
use silence_rendering::{Point, Rectangle};

use crate::win_api;
use crate::win32::WM_CLOSE;

use super::{TrayManager, dpi, message_box, monitors, overlay_window, tray};

thread_local! {
    static TRAY: RefCell<TrayManager> = RefCell::new(TrayManager::new());
}

/// Windows host-facing platform implementation.
///
/// All calls must come from the UI thread that owns the windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHostPlatform;

impl WindowsHostPlatform {
    pub fn new() -> Self {
        Self
    }

    fn window_err(e: impl std::fmt::Debug) -> PlatformServicesError {
        PlatformServicesError::Window(format!("{e:?}"))
    }

    fn timer_err(e: impl std::fmt::Debug) -> PlatformServicesError {
        PlatformServicesError::Timer(format!("{e:?}"))
    }

    fn tray_err(e: impl std::fmt::Display) -> PlatformServicesError {
        PlatformServicesError::Tray(e.to_string())
    }
}

impl HostPlatform for WindowsHostPlatform {
    type WindowHandle = WindowId;

    fn create_overlay_window(&self) -> Result<WindowId, PlatformServicesError> {
        overlay_window::create()
            .map(super::window_id)
            .map_err(Self::window_err)
    }

    fn show_window(&self, window: WindowId) -> Result<(), PlatformServicesError> {
        win_api::show_window_no_activate(super::hwnd(window)).map_err(Self::window_err)
    }

    fn hide_window(&self, window: WindowId) -> Result<(), PlatformServicesError> {
        win_api::hide_window(super::hwnd(window)).map_err(Self::window_err)
    }

    fn update_layered_window(
        &self,
        window: WindowId,
        bounds: Rectangle,
        bgra: &[u8],
        alpha: u8,
    ) -> Result<(), PlatformServicesError> {
        overlay_window::update(super::hwnd(window), bounds, bgra, alpha).map_err(Self::window_err)
    }

    fn set_click_through(
        &self,
        window: WindowId,
        enabled: bool,
    ) -> Result<(), PlatformServicesError> {
        overlay_window::set_click_through(super::hwnd(window), enabled);
        Ok(())
    }

    fn start_timer(
        &self,
        window: WindowId,
        timer_id: u32,
        interval_ms: u32,
    ) -> Result<(), PlatformServicesError> {
        win_api::start_timer(super::hwnd(window), timer_id, interval_ms).map_err(Self::timer_err)
    }

    fn stop_timer(&self, window: WindowId, timer_id: u32) -> Result<(), PlatformServicesError> {
        win_api::stop_timer(super::hwnd(window), timer_id).map_err(Self::timer_err)
    }

    fn request_close(&self, window: WindowId) -> Result<(), PlatformServicesError> {
        win_api::post_message(super::hwnd(window), WM_CLOSE, 0, 0).map_err(Self::window_err)
    }

    fn destroy_window(&self, window: WindowId) -> Result<(), PlatformServicesError> {
        win_api::destroy_window(super::hwnd(window)).map_err(Self::window_err)
    }

    fn cursor_position(&self) -> Point {
        let p = win_api::cursor_pos();
        Point::new(p.x, p.y)
    }

    fn is_key_down(&self, key: KeyCode) -> bool {
        win_api::is_key_down(key.0)
    }

    fn monitors(&self) -> Vec<Monitor> {
        monitors::enumerate()
    }

    fn dpi_scale(&self, window: WindowId) -> f32 {
        dpi::scale_for_window(super::hwnd(window))
    }

    fn show_info_message(&self, window: WindowId, title: &str, message: &str) {
        message_box::show_info(super::hwnd(window), title, message);
    }

    fn show_error_message(&self, window: WindowId, title: &str, message: &str) {
        message_box::show_error(super::hwnd(window), title, message);
    }

    fn init_tray(
        &self,
        window: WindowId,
        tooltip: &str,
        icon: &TrayIconImage,
    ) -> Result<(), PlatformServicesError> {
        TRAY.with(|t| {
            t.borrow_mut()
                .initialize(window, tooltip, icon)
                .map_err(Self::tray_err)
        })
    }

    fn update_tray(&self, tooltip: &str, icon: &TrayIconImage) -> Result<(), PlatformServicesError> {
        TRAY.with(|t| t.borrow_mut().update(tooltip, icon).map_err(Self::tray_err))
    }

    fn notify(&self, title: &str, message: &str) -> Result<(), PlatformServicesError> {
        TRAY.with(|t| t.borrow().notify(title, message).map_err(Self::tray_err))
    }

    fn show_tray_menu(
        &self,
        window: WindowId,
        items: &[MenuItem],
    ) -> Result<Option<u32>, PlatformServicesError> {
        tray::track_menu(super::hwnd(window), items).map_err(|e| Self::tray_err(format!("{e:?}")))
    }

    fn cleanup_tray(&self) -> Result<(), PlatformServicesError> {
        TRAY.with(|t| t.borrow_mut().cleanup());
        Ok(())
    }
}
