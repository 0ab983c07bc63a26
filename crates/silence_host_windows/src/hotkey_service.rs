//! Keyboard hook wiring for the hotkey machine.
//!
//! The model lives behind a mutex shared by the hook thread (key transitions) and the UI thread
//! (recording control from the tray). Effects produced on the hook thread are posted back to the
//! UI thread as [`HostEvent::Hotkey`].

use std::sync::Arc;

use parking_lot::Mutex;
use silence_app::KeyCode;
use silence_app::hotkey::{self, HotkeyBinding};
use silence_platform::{KeyEvent, KeyTransition, KeyboardHook, PlatformResult};

use crate::host_event::{EventSink, HostEvent};

pub struct HotkeyService {
    model: Arc<Mutex<hotkey::Model>>,
    hook: Box<dyn KeyboardHook>,
    events: EventSink,
}

impl HotkeyService {
    pub fn new(binding: HotkeyBinding, hook: Box<dyn KeyboardHook>, events: EventSink) -> Self {
        Self {
            model: Arc::new(Mutex::new(hotkey::Model::new(binding))),
            hook,
            events,
        }
    }

    /// Install the hook. On failure the machine simply never sees a key.
    pub fn start(&mut self) -> PlatformResult<()> {
        let model = Arc::clone(&self.model);
        let events = Arc::clone(&self.events);
        self.hook.install(Box::new(move |event| {
            for effect in handle_key_event(&model, event) {
                events(HostEvent::Hotkey(effect));
            }
        }))?;
        tracing::debug!(binding = %self.binding().display_name(), "keyboard hook installed");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.hook.is_installed() {
            self.hook.uninstall();
            tracing::debug!("keyboard hook released");
        }
    }

    pub fn is_active(&self) -> bool {
        self.hook.is_installed()
    }

    /// Run an action from the UI thread. Effects are returned, not posted.
    pub fn dispatch(&self, action: hotkey::Action) -> Vec<hotkey::Effect> {
        self.model.lock().reduce(action)
    }

    pub fn binding(&self) -> HotkeyBinding {
        self.model.lock().binding()
    }

    pub fn phase(&self) -> hotkey::Phase {
        self.model.lock().phase()
    }

    pub fn is_recording(&self) -> bool {
        self.model.lock().is_recording()
    }
}

impl Drop for HotkeyService {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Feed one hook transition into the model.
///
/// Escape while recording abandons the recording instead of becoming the new binding.
pub fn handle_key_event(model: &Mutex<hotkey::Model>, event: KeyEvent) -> Vec<hotkey::Effect> {
    let mut model = model.lock();
    let action = match event.transition {
        KeyTransition::Down if event.key == KeyCode::ESCAPE && model.is_recording() => {
            hotkey::Action::CancelRecording
        }
        KeyTransition::Down => hotkey::Action::KeyDown {
            key: event.key,
            held: event.held,
        },
        KeyTransition::Up => hotkey::Action::KeyUp { key: event.key },
    };
    model.reduce(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeHook, collecting_sink};
    use silence_app::Modifiers;
    use silence_app::hotkey::Effect;

    fn service(hook: FakeHook) -> (HotkeyService, Arc<Mutex<Vec<HostEvent>>>) {
        let (sink, received) = collecting_sink();
        let service = HotkeyService::new(HotkeyBinding::default(), Box::new(hook), sink);
        (service, received)
    }

    #[test]
    fn hook_events_are_forwarded_as_host_events() {
        let hook = FakeHook::new();
        let (mut service, received) = service(hook.clone());
        service.start().expect("install");

        hook.press(KeyEvent::down(KeyCode::F21, Modifiers::CTRL));
        hook.press(KeyEvent::up(KeyCode::F21, Modifiers::CTRL));

        assert_eq!(*received.lock(), vec![HostEvent::Hotkey(Effect::Toggle)]);
    }

    #[test]
    fn escape_cancels_recording() {
        let model = Mutex::new(hotkey::Model::new(HotkeyBinding::default()));
        model.lock().reduce(hotkey::Action::StartRecording);

        let effects = handle_key_event(&model, KeyEvent::down(KeyCode::ESCAPE, Modifiers::NONE));
        assert_eq!(effects, vec![Effect::RecordingCancelled]);
        assert_eq!(model.lock().binding(), HotkeyBinding::default());
    }

    #[test]
    fn escape_is_an_ordinary_key_when_armed() {
        let binding = HotkeyBinding::new(KeyCode::ESCAPE, Modifiers::NONE, true);
        let model = Mutex::new(hotkey::Model::new(binding));
        let effects = handle_key_event(&model, KeyEvent::down(KeyCode::ESCAPE, Modifiers::NONE));
        assert_eq!(effects, vec![Effect::Toggle]);
    }

    #[test]
    fn recording_from_the_ui_thread_captures_hook_keys() {
        let hook = FakeHook::new();
        let (mut service, received) = service(hook.clone());
        service.start().expect("install");

        assert_eq!(
            service.dispatch(hotkey::Action::StartRecording),
            vec![Effect::ModifiersChanged(Modifiers::NONE)]
        );
        hook.press(KeyEvent::down(KeyCode::LCONTROL, Modifiers::CTRL));
        hook.press(KeyEvent::down(KeyCode::F5, Modifiers::CTRL));

        let expected = HotkeyBinding::new(KeyCode::F5, Modifiers::CTRL, true);
        assert_eq!(
            *received.lock(),
            vec![
                HostEvent::Hotkey(Effect::ModifiersChanged(Modifiers::CTRL)),
                HostEvent::Hotkey(Effect::Captured(expected)),
            ]
        );
        assert_eq!(service.binding(), expected);
        assert!(!service.is_recording());
    }

    #[test]
    fn failed_install_leaves_service_inert() {
        let hook = FakeHook::failing();
        let (mut service, received) = service(hook.clone());

        assert!(service.start().is_err());
        assert!(!service.is_active());
        hook.press(KeyEvent::down(KeyCode::F21, Modifiers::NONE));
        assert!(received.lock().is_empty());
    }

    #[test]
    fn drop_releases_the_hook() {
        let hook = FakeHook::new();
        let (mut service, _received) = service(hook.clone());
        service.start().expect("install");
        assert!(hook.is_installed());

        drop(service);
        assert!(!hook.is_installed());
    }
}
