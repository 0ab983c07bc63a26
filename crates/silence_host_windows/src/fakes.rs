//! In-memory collaborators for host tests.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;
use silence_app::KeyCode;
use silence_app::overlay::Monitor;
use silence_platform::{
    AudioDevice, AutostartControl, HostPlatform, KeyEvent, KeySink, KeyboardHook, MenuItem,
    MicrophoneControl, PlatformError, PlatformResult, PlatformServicesError, TrayIconImage,
    WindowId,
};
use silence_rendering::{Point, Rectangle};

use crate::host_event::{EventSink, HostEvent};
use crate::sound::FeedbackPlayer;

pub const MESSAGE_WINDOW: WindowId = WindowId::from_raw(1);
pub const OVERLAY_WINDOW: WindowId = WindowId::from_raw(2);

pub fn collecting_sink() -> (EventSink, Arc<Mutex<Vec<HostEvent>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink_received = Arc::clone(&received);
    let sink: EventSink = Arc::new(move |event| sink_received.lock().push(event));
    (sink, received)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub bounds: Rectangle,
    pub alpha: u8,
    pub len: usize,
}

#[derive(Debug, Default)]
pub struct PlatformLog {
    pub fail_overlay: bool,
    pub overlay_visible: bool,
    pub click_through: Option<bool>,
    pub frames: Vec<Frame>,
    pub active_timers: Vec<u32>,
    pub tray_tooltip: Option<String>,
    pub tray_icon_size: Option<(u32, u32)>,
    pub tray_cleaned: bool,
    pub notifications: Vec<String>,
    pub errors: Vec<String>,
    pub last_menu: Vec<MenuItem>,
    pub menu_choice: Option<u32>,
    pub destroyed: Vec<WindowId>,
    pub cursor: Point,
    pub keys_down: Vec<KeyCode>,
    pub monitors: Vec<Monitor>,
}

impl PlatformLog {
    pub fn with_monitors() -> Self {
        Self {
            monitors: vec![
                Monitor {
                    device_name: r"\\.\DISPLAY1".into(),
                    work_area: Rectangle::new(0, 0, 1920, 1040),
                    is_primary: true,
                },
                Monitor {
                    device_name: r"\\.\DISPLAY2".into(),
                    work_area: Rectangle::new(1920, 0, 2560, 1400),
                    is_primary: false,
                },
            ],
            ..Self::default()
        }
    }
}

pub struct FakePlatform {
    pub log: Rc<RefCell<PlatformLog>>,
}

impl HostPlatform for FakePlatform {
    type WindowHandle = WindowId;

    fn create_overlay_window(&self) -> Result<WindowId, PlatformServicesError> {
        if self.log.borrow().fail_overlay {
            return Err(PlatformServicesError::Window("CreateWindowExW".into()));
        }
        Ok(OVERLAY_WINDOW)
    }

    fn show_window(&self, _window: WindowId) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().overlay_visible = true;
        Ok(())
    }

    fn hide_window(&self, _window: WindowId) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().overlay_visible = false;
        Ok(())
    }

    fn update_layered_window(
        &self,
        _window: WindowId,
        bounds: Rectangle,
        bgra: &[u8],
        alpha: u8,
    ) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().frames.push(Frame {
            bounds,
            alpha,
            len: bgra.len(),
        });
        Ok(())
    }

    fn set_click_through(
        &self,
        _window: WindowId,
        enabled: bool,
    ) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().click_through = Some(enabled);
        Ok(())
    }

    fn start_timer(
        &self,
        _window: WindowId,
        timer_id: u32,
        _interval_ms: u32,
    ) -> Result<(), PlatformServicesError> {
        let mut log = self.log.borrow_mut();
        if !log.active_timers.contains(&timer_id) {
            log.active_timers.push(timer_id);
        }
        Ok(())
    }

    fn stop_timer(&self, _window: WindowId, timer_id: u32) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().active_timers.retain(|id| *id != timer_id);
        Ok(())
    }

    fn request_close(&self, _window: WindowId) -> Result<(), PlatformServicesError> {
        Ok(())
    }

    fn destroy_window(&self, window: WindowId) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().destroyed.push(window);
        Ok(())
    }

    fn cursor_position(&self) -> Point {
        self.log.borrow().cursor
    }

    fn is_key_down(&self, key: KeyCode) -> bool {
        self.log.borrow().keys_down.contains(&key)
    }

    fn monitors(&self) -> Vec<Monitor> {
        self.log.borrow().monitors.clone()
    }

    fn dpi_scale(&self, _window: WindowId) -> f32 {
        1.0
    }

    fn show_info_message(&self, _window: WindowId, _title: &str, message: &str) {
        self.log.borrow_mut().notifications.push(message.to_string());
    }

    fn show_error_message(&self, _window: WindowId, _title: &str, message: &str) {
        self.log.borrow_mut().errors.push(message.to_string());
    }

    fn init_tray(
        &self,
        _window: WindowId,
        tooltip: &str,
        icon: &TrayIconImage,
    ) -> Result<(), PlatformServicesError> {
        self.update_tray(tooltip, icon)
    }

    fn update_tray(
        &self,
        tooltip: &str,
        icon: &TrayIconImage,
    ) -> Result<(), PlatformServicesError> {
        let mut log = self.log.borrow_mut();
        log.tray_tooltip = Some(tooltip.to_string());
        log.tray_icon_size = Some((icon.width, icon.height));
        Ok(())
    }

    fn notify(&self, _title: &str, message: &str) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().notifications.push(message.to_string());
        Ok(())
    }

    fn show_tray_menu(
        &self,
        _window: WindowId,
        items: &[MenuItem],
    ) -> Result<Option<u32>, PlatformServicesError> {
        let mut log = self.log.borrow_mut();
        log.last_menu = items.to_vec();
        Ok(log.menu_choice.take())
    }

    fn cleanup_tray(&self) -> Result<(), PlatformServicesError> {
        self.log.borrow_mut().tray_cleaned = true;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MicState {
    pub muted: bool,
    pub missing: bool,
    pub devices: Vec<AudioDevice>,
    pub selected: Option<String>,
}

pub struct FakeMicrophone {
    pub state: Rc<RefCell<MicState>>,
}

impl MicrophoneControl for FakeMicrophone {
    fn is_muted(&self) -> PlatformResult<bool> {
        let state = self.state.borrow();
        if state.missing {
            return Err(PlatformError::NoCaptureDevice);
        }
        Ok(state.muted)
    }

    fn toggle_mute(&self) -> PlatformResult<bool> {
        let mut state = self.state.borrow_mut();
        if state.missing {
            return Err(PlatformError::NoCaptureDevice);
        }
        state.muted = !state.muted;
        Ok(state.muted)
    }

    fn devices(&self) -> PlatformResult<Vec<AudioDevice>> {
        Ok(self.state.borrow().devices.clone())
    }

    fn select_device(&mut self, id: Option<String>) {
        self.state.borrow_mut().selected = id;
    }
}

#[derive(Default)]
struct HookState {
    sink: Option<KeySink>,
    fail: bool,
}

/// Keyboard hook driven by the test through [`FakeHook::press`].
#[derive(Clone, Default)]
pub struct FakeHook {
    state: Rc<RefCell<HookState>>,
}

impl FakeHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let hook = Self::default();
        hook.state.borrow_mut().fail = true;
        hook
    }

    /// Deliver a transition as the hook thread would. No-op when not installed.
    pub fn press(&self, event: KeyEvent) {
        if let Some(sink) = self.state.borrow_mut().sink.as_mut() {
            sink(event);
        }
    }
}

impl KeyboardHook for FakeHook {
    fn install(&mut self, sink: KeySink) -> PlatformResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail {
            return Err(PlatformError::Hook("SetWindowsHookExW".into()));
        }
        state.sink = Some(sink);
        Ok(())
    }

    fn uninstall(&mut self) {
        self.state.borrow_mut().sink = None;
    }

    fn is_installed(&self) -> bool {
        self.state.borrow().sink.is_some()
    }
}

pub struct FakeAutostart {
    pub enabled: Rc<Cell<bool>>,
}

impl AutostartControl for FakeAutostart {
    fn is_enabled(&self) -> PlatformResult<bool> {
        Ok(self.enabled.get())
    }

    fn set_enabled(&self, enabled: bool) -> PlatformResult<()> {
        self.enabled.set(enabled);
        Ok(())
    }
}

pub struct RecordingPlayer {
    pub played: Rc<RefCell<Vec<(PathBuf, f32)>>>,
}

impl FeedbackPlayer for RecordingPlayer {
    fn play(&mut self, path: &Path, volume: f32) {
        self.played.borrow_mut().push((path.to_path_buf(), volume));
    }
}
