use std::path::PathBuf;

use silence_app::hotkey::{self, HotkeyBinding};
use silence_app::overlay::{
    self, Monitor, MonitorId, OverlayPlacement, PointerState, animation::FRAME_INTERVAL_MS,
    resolve_work_area,
};
use silence_app::{Action as CoreAction, AppModel, KeyCode};
use silence_host_protocol::{Command, ScreenChoice, TrayCommand};
use silence_platform::{
    AudioDevice, AutostartControl, HostPlatform, InputEvent, KeyboardHook, MicrophoneControl,
    PlatformError, PlatformServicesError, TrayEvent, WindowEvent, WindowId,
};
use silence_settings::{ConfigManager, Settings, background_name, icon_name};

use crate::command_executor::CommandExecutor;
use crate::constants::*;
use crate::core_bridge;
use crate::error::AppResult;
use crate::host_event::{EventSink, HostEvent};
use crate::hotkey_service::HotkeyService;
use crate::overlay_view::{self, BadgePainter};
use crate::sound::{FeedbackPlayer, resolve_sound_path};
use crate::tray_menu::{self, MenuState};

/// OS collaborators handed to [`App::new`].
pub struct HostServices {
    /// Host-facing platform side effects (windows, timers, tray, monitors).
    pub platform: Box<dyn HostPlatform<WindowHandle = WindowId>>,
    pub microphone: Box<dyn MicrophoneControl>,
    pub keyboard_hook: Box<dyn KeyboardHook>,
    pub autostart: Box<dyn AutostartControl>,
    pub sounds: Box<dyn FeedbackPlayer>,
    pub painter: Box<dyn BadgePainter>,
    /// Directory holding the bundled sound presets.
    pub sounds_dir: PathBuf,
}

/// Tray application state, owned by the message window.
pub struct App {
    /// Core state/actions/effects (platform-neutral).
    core: AppModel,
    config: ConfigManager,

    host_platform: Box<dyn HostPlatform<WindowHandle = WindowId>>,
    microphone: Box<dyn MicrophoneControl>,
    autostart: Box<dyn AutostartControl>,
    sounds: Box<dyn FeedbackPlayer>,
    painter: Box<dyn BadgePainter>,
    sounds_dir: PathBuf,
    hotkeys: HotkeyService,

    /// Hidden message window that owns the tray icon and the UI tick.
    window: WindowId,
    /// Layered badge window; `None` if it could not be created.
    overlay: Option<WindowId>,
    ticking: bool,

    /// Lists the last tray menu was built from; menu ids index into them.
    monitors: Vec<Monitor>,
    devices: Vec<AudioDevice>,

    shut_down: bool,
}

impl App {
    pub fn new(
        window: WindowId,
        services: HostServices,
        config: ConfigManager,
        events: EventSink,
    ) -> Self {
        let mut microphone = services.microphone;
        microphone.select_device(config.selected_microphone_id());
        let hotkeys = HotkeyService::new(config.binding(), services.keyboard_hook, events);

        Self {
            core: AppModel::new(),
            config,
            host_platform: services.platform,
            microphone,
            autostart: services.autostart,
            sounds: services.sounds,
            painter: services.painter,
            sounds_dir: services.sounds_dir,
            hotkeys,
            window,
            overlay: None,
            ticking: false,
            monitors: Vec::new(),
            devices: Vec::new(),
            shut_down: false,
        }
    }

    /// Bring up the overlay, tray icon and keyboard hook.
    ///
    /// Only a tray failure is fatal. With `announce` a balloon names the active hotkey.
    pub fn start(&mut self, announce: bool) -> AppResult<()> {
        self.overlay = match self.host_platform.create_overlay_window() {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                tracing::warn!("overlay unavailable: {e}");
                None
            }
        };

        let muted = match self.microphone.is_muted() {
            Ok(muted) => Some(muted),
            Err(e) => {
                tracing::warn!("could not read microphone state: {e}");
                None
            }
        };
        let shown_muted = muted.unwrap_or(false);
        let icon = overlay_view::tray_icon(self.painter.as_ref(), shown_muted)?;
        self.host_platform.init_tray(
            self.window,
            &tray_menu::tooltip(shown_muted, None),
            &icon,
        )?;

        if let Err(e) = self.hotkeys.start() {
            tracing::warn!("keyboard hook unavailable, hotkey disabled: {e}");
        }
        self.reconcile_autostart();

        // Mute state first so the overlay appears with the right glyph instead of crossfading.
        let mut commands = Vec::new();
        if let Some(muted) = muted {
            commands.push(Command::Core(CoreAction::MuteStateChanged(muted)));
        }
        commands.push(Command::ConfigureOverlay);
        if announce {
            commands.push(Command::Notify(format!(
                "Running in the tray. Press {} to toggle the microphone.",
                self.hotkeys.binding().display_name()
            )));
        }
        self.execute_command_chain(commands, self.window);

        tracing::info!(
            hotkey = %self.hotkeys.binding().display_name(),
            overlay = self.overlay.is_some(),
            "started"
        );
        Ok(())
    }

    pub fn core(&self) -> &AppModel {
        &self.core
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    pub fn binding(&self) -> HotkeyBinding {
        self.hotkeys.binding()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub(crate) fn host_platform(&self) -> &dyn HostPlatform<WindowHandle = WindowId> {
        self.host_platform.as_ref()
    }

    pub(crate) fn dispatch_core_action(&mut self, action: CoreAction) -> Vec<Command> {
        core_bridge::dispatch(&mut self.core, action)
    }

    pub(crate) fn dispatch_hotkey_action(&mut self, action: hotkey::Action) -> Vec<Command> {
        self.hotkeys
            .dispatch(action)
            .into_iter()
            .flat_map(|effect| self.handle_hotkey_effect(effect))
            .collect()
    }

    pub(crate) fn handle_hotkey_effect(&mut self, effect: hotkey::Effect) -> Vec<Command> {
        match effect {
            hotkey::Effect::Toggle => vec![Command::ToggleMute],
            hotkey::Effect::ModifiersChanged(_) => vec![Command::UpdateTray],
            hotkey::Effect::Captured(binding) => {
                self.update_settings(|s| {
                    s.hotkey_code = binding.key.0;
                    s.hotkey_modifiers = binding.modifiers.bits();
                    s.ignore_modifiers = binding.ignore_extra_modifiers;
                });
                tracing::info!(hotkey = %binding.display_name(), "hotkey recorded");
                vec![
                    Command::UpdateTray,
                    Command::Notify(format!("Hotkey set to {}", binding.display_name())),
                ]
            }
            hotkey::Effect::RecordingCancelled => vec![
                Command::UpdateTray,
                Command::Notify("Hotkey recording cancelled".to_string()),
            ],
        }
    }

    // ==================== Microphone ====================

    pub(crate) fn toggle_mute(&mut self) -> Vec<Command> {
        match self.microphone.toggle_mute() {
            Ok(muted) => {
                tracing::info!(muted, "microphone toggled");
                vec![Command::Core(CoreAction::MuteStateChanged(muted))]
            }
            Err(PlatformError::NoCaptureDevice) => {
                tracing::warn!("toggle requested but no capture device is available");
                vec![Command::Notify("No microphone found".to_string())]
            }
            Err(e) => {
                tracing::warn!("toggle mute failed: {e}");
                vec![Command::Notify(format!("Could not toggle the microphone: {e}"))]
            }
        }
    }

    pub(crate) fn sync_mute_state(&mut self) -> Vec<Command> {
        match self.microphone.is_muted() {
            Ok(muted) => vec![Command::Core(CoreAction::MuteStateChanged(muted))],
            Err(e) => {
                tracing::warn!("could not read microphone state: {e}");
                vec![]
            }
        }
    }

    // ==================== Overlay ====================

    pub(crate) fn configure_overlay(&mut self) -> Vec<Command> {
        self.monitors = self.host_platform.monitors();
        let placement = self.config.placement();
        let work_area = resolve_work_area(&self.monitors, &placement.monitor);
        tracing::debug!(?work_area, monitor = placement.monitor.as_key(), "configure overlay");

        vec![Command::Core(CoreAction::Overlay(overlay::Action::Configure {
            policy: self.config.visibility_policy(),
            placement,
            work_area,
        }))]
    }

    /// Measure, paint and push the current frame.
    ///
    /// The measured size is fed to the model first so placement and anchoring see the real badge.
    /// Returns whatever the resize produced.
    pub(crate) fn render_overlay(&mut self) -> Vec<Command> {
        let Some(overlay) = self.overlay else {
            return vec![];
        };

        let style = self.config.badge_style();
        let scale = self.host_platform.dpi_scale(overlay);
        let muted = self.core.overlay().visual().muted;
        let size = self.painter.measure(&style, muted, scale);
        let follow_up = if size != self.core.overlay().bounds().size() {
            self.dispatch_core_action(CoreAction::Overlay(overlay::Action::Resize(size)))
        } else {
            vec![]
        };

        if self.core.overlay().phase() == overlay::Phase::Hidden {
            return follow_up;
        }

        let visual = self.core.overlay().visual();
        let frame = match self
            .painter
            .paint(&style, &overlay_view::frame_content(&visual), scale)
        {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("badge render failed: {e}");
                return follow_up;
            }
        };

        if let Err(e) = self.host_platform.update_layered_window(
            overlay,
            visual.bounds,
            &frame.bgra,
            overlay_view::window_alpha(visual.alpha),
        ) {
            tracing::warn!("overlay update failed: {e}");
        }
        follow_up
    }

    pub(crate) fn with_overlay(
        &self,
        f: impl FnOnce(
            &dyn HostPlatform<WindowHandle = WindowId>,
            WindowId,
        ) -> Result<(), PlatformServicesError>,
    ) {
        if let Some(overlay) = self.overlay
            && let Err(e) = f(self.host_platform.as_ref(), overlay)
        {
            tracing::warn!("overlay window: {e}");
        }
    }

    pub(crate) fn save_placement(&mut self, placement: &OverlayPlacement) {
        tracing::info!(
            x = placement.percent_x,
            y = placement.percent_y,
            monitor = placement.monitor.as_key(),
            "overlay position saved"
        );
        self.update_settings(|s| {
            s.overlay_position_x = placement.percent_x;
            s.overlay_position_y = placement.percent_y;
            s.overlay_screen_id = placement.monitor.as_key().to_string();
        });
    }

    /// Placement the badge would be saved with if positioning ended now.
    fn live_placement(&self) -> OverlayPlacement {
        let model = self.core.overlay();
        let bounds = model.bounds();
        OverlayPlacement::from_position(
            bounds.origin(),
            model.work_area(),
            bounds.size(),
            model.placement().monitor.clone(),
        )
    }

    /// Start or stop the UI tick to match `needs_tick`.
    pub(crate) fn schedule_tick(&mut self, window: WindowId) {
        let needed = self.core.overlay().needs_tick();
        if needed == self.ticking {
            return;
        }

        let result = if needed {
            self.host_platform
                .start_timer(window, TIMER_UI_TICK_ID, FRAME_INTERVAL_MS)
        } else {
            self.host_platform.stop_timer(window, TIMER_UI_TICK_ID)
        };
        match result {
            Ok(()) => self.ticking = needed,
            Err(e) => tracing::warn!("UI tick timer: {e}"),
        }
    }

    fn tick_commands(&self) -> Vec<Command> {
        let pointer = PointerState {
            cursor: self.host_platform.cursor_position(),
            button_down: self.host_platform.is_key_down(KeyCode::LBUTTON),
            escape_down: self.host_platform.is_key_down(KeyCode::ESCAPE),
        };
        vec![Command::Core(CoreAction::Overlay(overlay::Action::Tick(
            pointer,
        )))]
    }

    // ==================== Tray ====================

    pub(crate) fn update_tray(&mut self) {
        let muted = self.core.muted().unwrap_or(false);
        let recording = match self.hotkeys.phase() {
            hotkey::Phase::Recording { held } => Some(held),
            hotkey::Phase::Armed => None,
        };
        let tooltip = tray_menu::tooltip(muted, recording);

        let result = overlay_view::tray_icon(self.painter.as_ref(), muted)
            .map_err(|e| PlatformServicesError::Tray(e.to_string()))
            .and_then(|icon| self.host_platform.update_tray(&tooltip, &icon));
        if let Err(e) = result {
            tracing::warn!("tray update failed: {e}");
        }
    }

    pub(crate) fn show_tray_menu(&mut self, window: WindowId) -> Vec<Command> {
        self.monitors = self.host_platform.monitors();
        self.devices = self.microphone.devices().unwrap_or_else(|e| {
            tracing::debug!("could not list capture devices: {e}");
            Vec::new()
        });

        let settings = self.config.get();
        let screen = MonitorId::from(settings.overlay_screen_id.as_str());
        let autostart = self
            .autostart
            .is_enabled()
            .unwrap_or(settings.auto_start_enabled);
        let state = MenuState {
            binding: self.hotkeys.binding(),
            recording: self.hotkeys.is_recording(),
            overlay: self.config.visibility_policy(),
            screen: &screen,
            style: self.config.badge_style(),
            positioning: self
                .core
                .overlay()
                .is_positioning()
                .then(|| self.live_placement()),
            sounds_enabled: settings.sounds_enabled,
            autostart,
            monitors: &self.monitors,
            devices: &self.devices,
            microphone: settings.selected_microphone_id.as_deref(),
        };
        let items = tray_menu::build(&state);

        match self.host_platform.show_tray_menu(window, &items) {
            Ok(Some(id)) => tray_menu::command_for_id(id)
                .map(Command::Tray)
                .into_iter()
                .collect(),
            Ok(None) => vec![],
            Err(e) => {
                tracing::warn!("tray menu failed: {e}");
                vec![]
            }
        }
    }

    pub(crate) fn handle_tray_command(&mut self, command: TrayCommand) -> Vec<Command> {
        tracing::debug!(?command, "tray command");
        match command {
            TrayCommand::ToggleMute => vec![Command::ToggleMute],

            TrayCommand::RecordHotkey => {
                if self.hotkeys.is_recording() {
                    vec![Command::Hotkey(hotkey::Action::CancelRecording)]
                } else {
                    vec![
                        Command::Hotkey(hotkey::Action::StartRecording),
                        Command::Notify("Press the new hotkey. Esc cancels.".to_string()),
                    ]
                }
            }

            TrayCommand::ToggleIgnoreExtraModifiers => {
                let ignore = !self.hotkeys.binding().ignore_extra_modifiers;
                self.update_settings(|s| s.ignore_modifiers = ignore);
                vec![Command::Hotkey(hotkey::Action::SetIgnoreExtraModifiers(
                    ignore,
                ))]
            }

            TrayCommand::ToggleOverlay => {
                self.update_settings(|s| s.overlay_enabled = !s.overlay_enabled);
                vec![Command::ConfigureOverlay]
            }

            TrayCommand::SetVisibility(mode) => {
                self.update_settings(|s| s.overlay_visibility_mode = mode);
                vec![Command::ConfigureOverlay]
            }

            TrayCommand::SetScreen(choice) => {
                let monitor = match choice {
                    ScreenChoice::Primary => MonitorId::Primary,
                    ScreenChoice::Index(i) => match self.monitors.get(i) {
                        Some(m) => MonitorId::Device(m.device_name.clone()),
                        None => return vec![],
                    },
                };
                self.update_settings(|s| s.overlay_screen_id = monitor.as_key().to_string());
                vec![Command::ConfigureOverlay]
            }

            TrayCommand::ToggleOverlayText => {
                self.update_settings(|s| s.overlay_show_text = !s.overlay_show_text);
                vec![Command::RenderOverlay]
            }

            TrayCommand::SetBackground(background) => {
                self.update_settings(|s| {
                    s.overlay_background_style = background_name(background).to_string()
                });
                vec![Command::RenderOverlay]
            }

            TrayCommand::SetIconStyle(icon) => {
                self.update_settings(|s| s.overlay_icon_style = icon_name(icon).to_string());
                vec![Command::RenderOverlay]
            }

            TrayCommand::TogglePositioning => {
                let action = if self.core.overlay().is_positioning() {
                    overlay::Action::StopPositioning
                } else {
                    overlay::Action::StartPositioning
                };
                vec![Command::Core(CoreAction::Overlay(action))]
            }

            TrayCommand::ToggleSounds => {
                self.update_settings(|s| s.sounds_enabled = !s.sounds_enabled);
                vec![]
            }

            TrayCommand::ToggleAutostart => self.toggle_autostart(),

            TrayCommand::SelectMicrophone(choice) => {
                let id = match choice {
                    None => None,
                    Some(i) => match self.devices.get(i) {
                        Some(device) => Some(device.id.clone()),
                        None => return vec![],
                    },
                };
                tracing::info!(device = id.as_deref().unwrap_or("default"), "microphone selected");
                self.update_settings(|s| s.selected_microphone_id = id.clone());
                self.microphone.select_device(id);
                vec![Command::SyncMuteState]
            }

            TrayCommand::Exit => vec![Command::QuitApp],
        }
    }

    pub(crate) fn play_feedback(&mut self, muted: bool) {
        let settings = self.config.get();
        if !settings.sounds_enabled {
            return;
        }
        if let Some(path) = resolve_sound_path(&settings, &self.sounds_dir, muted) {
            self.sounds.play(&path, settings.sound_volume);
        }
    }

    pub(crate) fn notify(&self, message: &str) {
        if let Err(e) = self.host_platform.notify(APP_TITLE, message) {
            tracing::debug!("notification failed: {e}");
        }
    }

    // ==================== Autostart ====================

    fn toggle_autostart(&mut self) -> Vec<Command> {
        let enable = !self
            .autostart
            .is_enabled()
            .unwrap_or(self.config.auto_start_enabled());
        match self.autostart.set_enabled(enable) {
            Ok(()) => {
                tracing::info!(enabled = enable, "start with Windows changed");
                self.update_settings(|s| s.auto_start_enabled = enable);
                vec![]
            }
            Err(e) => {
                tracing::warn!("autostart change failed: {e}");
                vec![Command::Notify(format!(
                    "Could not change Start with Windows: {e}"
                ))]
            }
        }
    }

    /// Make the registry match the stored preference. An enabled entry is rewritten so it points
    /// at the running executable.
    fn reconcile_autostart(&self) {
        let wanted = self.config.auto_start_enabled();
        let result = match self.autostart.is_enabled() {
            Ok(actual) if wanted || actual => self.autostart.set_enabled(wanted),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::warn!("could not reconcile autostart: {e}");
        }
    }

    fn update_settings(&self, f: impl FnOnce(&mut Settings)) {
        if let Err(e) = self.config.update(f) {
            tracing::warn!("failed to save settings: {e:#}");
        }
    }

    /// Release the hook, timer, overlay and tray icon. Idempotent.
    pub(crate) fn cleanup_before_quit(&mut self, window: WindowId) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        self.hotkeys.stop();
        if self.ticking {
            let _ = self.host_platform.stop_timer(window, TIMER_UI_TICK_ID);
            self.ticking = false;
        }
        if let Some(overlay) = self.overlay.take() {
            let _ = self.host_platform.hide_window(overlay);
            let _ = self.host_platform.destroy_window(overlay);
        }
        if let Err(e) = self.host_platform.cleanup_tray() {
            tracing::debug!("tray cleanup: {e}");
        }
        tracing::info!("shut down");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cleanup_before_quit(self.window);
    }
}

impl silence_platform::WindowMessageHandler for App {
    type WindowHandle = WindowId;
    type UserEvent = HostEvent;

    fn handle_input_event(&mut self, window: WindowId, event: InputEvent) -> Option<isize> {
        let commands = match event {
            InputEvent::Tray(TrayEvent::LeftClick) => vec![Command::ToggleMute],
            InputEvent::Tray(TrayEvent::RightClick) => vec![Command::ShowTrayMenu],
            InputEvent::Timer { id } if id == TIMER_UI_TICK_ID => self.tick_commands(),
            InputEvent::Timer { .. } => return None,
        };
        self.execute_command_chain(commands, window);
        Some(0)
    }

    fn handle_user_event(&mut self, window: WindowId, event: HostEvent) -> Option<isize> {
        match event {
            HostEvent::Hotkey(effect) => {
                let commands = self.handle_hotkey_effect(effect);
                self.execute_command_chain(commands, window);
            }
        }
        Some(0)
    }

    fn handle_window_event(&mut self, window: WindowId, event: WindowEvent) -> Option<isize> {
        let commands = match event {
            WindowEvent::DisplayChanged => vec![Command::ConfigureOverlay],
            WindowEvent::DpiChanged { dpi } => {
                tracing::debug!(dpi, "DPI changed");
                vec![Command::RenderOverlay]
            }
        };
        self.execute_command_chain(commands, window);
        None
    }

    fn handle_close_requested(&mut self, window: WindowId) -> Option<isize> {
        self.execute_command_chain(vec![Command::QuitApp], window);
        Some(0)
    }
}
