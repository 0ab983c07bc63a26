use silence_platform::InputEvent;
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::WM_TIMER;

/// Convert Win32 window messages to platform-agnostic [`InputEvent`].
///
/// Tray callbacks are decoded separately by the runner since they need the tray message id.
pub struct EventConverter;

impl EventConverter {
    /// Returns `None` if the message is not an input event.
    pub fn convert(msg: u32, wparam: WPARAM, _lparam: LPARAM) -> Option<InputEvent> {
        match msg {
            WM_TIMER => Some(InputEvent::Timer {
                id: wparam.0 as u32,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::UI::WindowsAndMessaging::WM_KEYDOWN;

    #[test]
    fn timer_message() {
        assert_eq!(
            EventConverter::convert(WM_TIMER, WPARAM(7), LPARAM(0)),
            Some(InputEvent::Timer { id: 7 })
        );
        assert_eq!(EventConverter::convert(WM_KEYDOWN, WPARAM(0x41), LPARAM(0)), None);
    }
}
