use std::sync::Arc;

use silence_platform::WindowId;
use silence_platform_windows::win32::WNDCLASS_STYLES;
use silence_platform_windows::{
    CoreAudioMicrophone, LowLevelKeyboardHook, RegistryAutostart, UserEventSender,
    WindowsHostPlatform, run_message_window_app,
};
use silence_rendering::BadgeRenderer;
use silence_settings::ConfigManager;

use crate::app::{App, HostServices};
use crate::constants::WINDOW_CLASS_NAME;
use crate::error::AppError;
use crate::host_event::{EventSink, HostEvent};
use crate::sound::{FeedbackPlayer, RodioPlayer, SilentPlayer, default_sounds_dir};

/// Launch options from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip the startup balloon.
    pub minimized: bool,
}

/// Run the tray app until it exits.
pub fn run(options: RunOptions) -> silence_platform_windows::Result<()> {
    run_message_window_app(WINDOW_CLASS_NAME, WNDCLASS_STYLES(0), move |window, events| {
        create_app(window, events, options)
    })
}

fn create_app(
    window: WindowId,
    events: UserEventSender<HostEvent>,
    options: RunOptions,
) -> Result<App, AppError> {
    let sink: EventSink = Arc::new(move |event| {
        if let Err(e) = events.send(event) {
            tracing::warn!("dropped hotkey event, message window is gone: {e}");
        }
    });

    let sounds: Box<dyn FeedbackPlayer> = match RodioPlayer::spawn() {
        Ok(player) => Box::new(player),
        Err(e) => {
            tracing::warn!("sound playback unavailable: {e}");
            Box::new(SilentPlayer)
        }
    };

    let services = HostServices {
        platform: Box::new(WindowsHostPlatform::new()),
        microphone: Box::new(CoreAudioMicrophone::new(None)),
        keyboard_hook: Box::new(LowLevelKeyboardHook::new()),
        autostart: Box::new(RegistryAutostart::for_current_exe()?),
        sounds,
        painter: Box::new(BadgeRenderer::new()),
        sounds_dir: default_sounds_dir(),
    };

    let config = ConfigManager::new();
    tracing::info!(settings = %config.path().display(), "loaded settings");

    let mut app = App::new(window, services, config, sink);
    app.start(!options.minimized)?;
    Ok(app)
}
