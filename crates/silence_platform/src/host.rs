use crate::{InputEvent, WindowEvent};

/// Opaque window identifier.
///
/// Keeps platform window handles (e.g. Win32 `HWND`) from leaking across crate boundaries.
/// Backends convert to and from raw handles as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(usize);

impl WindowId {
    pub const INVALID: WindowId = WindowId(0);

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Handler for the hidden message window that owns the tray icon and the UI timer.
///
/// The platform backend owns the event loop and window procedure; the host turns messages into
/// commands.
pub trait WindowMessageHandler {
    type WindowHandle: Copy;
    type UserEvent: Send + 'static;

    /// Return `Some(result)` to mark the message as handled.
    fn handle_input_event(
        &mut self,
        window: Self::WindowHandle,
        event: InputEvent,
    ) -> Option<isize>;

    /// Handle an event posted from a background thread onto the window thread.
    fn handle_user_event(
        &mut self,
        _window: Self::WindowHandle,
        _event: Self::UserEvent,
    ) -> Option<isize> {
        None
    }

    fn handle_window_event(
        &mut self,
        _window: Self::WindowHandle,
        _event: WindowEvent,
    ) -> Option<isize> {
        None
    }

    /// Raw message fallback. `None` defers to the default window procedure.
    fn handle_window_message(
        &mut self,
        _window: Self::WindowHandle,
        _msg: u32,
        _wparam: usize,
        _lparam: isize,
    ) -> Option<isize> {
        None
    }

    fn handle_close_requested(&mut self, _window: Self::WindowHandle) -> Option<isize> {
        None
    }
}
