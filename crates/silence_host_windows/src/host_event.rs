use std::sync::Arc;

use silence_app::hotkey;

/// Events produced off the UI thread and drained on it.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Output of the hotkey machine, forwarded from the hook thread.
    Hotkey(hotkey::Effect),
}

/// Posts a [`HostEvent`] onto the UI thread. Callable from any thread.
pub type EventSink = Arc<dyn Fn(HostEvent) + Send + Sync>;
