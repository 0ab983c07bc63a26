use thiserror::Error;

use crate::KeyEvent;

/// Errors from OS collaborators (audio endpoint, keyboard hook, registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("audio endpoint error: {0}")]
    Audio(String),

    #[error("no capture device available")]
    NoCaptureDevice,

    #[error("keyboard hook error: {0}")]
    Hook(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("initialization failed: {0}")]
    Init(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// A capture endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub id: String,
    pub name: String,
}

/// Mute control for one capture endpoint.
pub trait MicrophoneControl {
    fn is_muted(&self) -> PlatformResult<bool>;

    /// Flip the mute state and return the new value.
    fn toggle_mute(&self) -> PlatformResult<bool>;

    /// Active capture endpoints.
    fn devices(&self) -> PlatformResult<Vec<AudioDevice>>;

    /// Target a specific endpoint; `None` follows the default capture device.
    fn select_device(&mut self, id: Option<String>);
}

/// Receiver for raw key transitions. Runs on the hook thread.
pub type KeySink = Box<dyn FnMut(KeyEvent) + Send + 'static>;

/// System-wide, non-consuming keyboard observer.
pub trait KeyboardHook {
    /// Start delivering key transitions to `sink`. Replaces any previous installation.
    fn install(&mut self, sink: KeySink) -> PlatformResult<()>;

    /// Stop delivery and release the hook. Safe to call when not installed.
    fn uninstall(&mut self);

    fn is_installed(&self) -> bool;
}

/// Launch-at-login registration.
pub trait AutostartControl {
    fn is_enabled(&self) -> PlatformResult<bool>;
    fn set_enabled(&self, enabled: bool) -> PlatformResult<()>;
}
