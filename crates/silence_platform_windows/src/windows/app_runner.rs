use std::ffi::c_void;
use std::fmt;
use std::sync::mpsc;

use silence_platform::{InputEvent, WindowId, WindowMessageHandler};
use windows::Win32::UI::WindowsAndMessaging::{CREATESTRUCTW, WNDCLASS_STYLES};

use crate::EventConverter;
use crate::win_api;
use crate::win32::{HWND, LPARAM, LRESULT, WM_APP, WM_CLOSE, WM_CREATE, WM_DESTROY, WPARAM};

use super::message_box;
use super::tray_manager::{TRAY_CALLBACK_MESSAGE, tray_event_from_callback};
use super::window_event_converter::WindowEventConverter;

const USER_EVENT_MESSAGE: u32 = WM_APP + 42;

/// Posts events from any thread onto the message window's thread.
pub struct UserEventSender<E> {
    /// Opaque window id (avoids `HWND` being !Send while still allowing PostMessage from any thread).
    window: WindowId,
    sender: mpsc::Sender<E>,
}

impl<E> Clone for UserEventSender<E> {
    fn clone(&self) -> Self {
        Self {
            window: self.window,
            sender: self.sender.clone(),
        }
    }
}

impl<E> UserEventSender<E> {
    pub fn send(&self, event: E) -> Result<(), mpsc::SendError<E>> {
        self.sender.send(event)?;
        let hwnd = super::hwnd(self.window);
        let _ = win_api::post_message(hwnd, USER_EVENT_MESSAGE, 0, 0);
        Ok(())
    }
}

struct CreateParams<F, E> {
    factory: Option<F>,
    user_events: Option<mpsc::Receiver<E>>,
    user_event_sender: mpsc::Sender<E>,
}

struct AppState<A, E> {
    app: A,
    user_events: mpsc::Receiver<E>,
    /// A handler is on the stack. Modal loops (the tray menu) pump messages while it runs.
    busy: bool,
    /// User events arrived while busy.
    deferred_events: bool,
    /// `WM_DESTROY` arrived while busy; free the state once the handler unwinds.
    destroyed: bool,
}

#[inline]
fn state_ptr<A, E>(hwnd: HWND) -> *mut AppState<A, E> {
    win_api::get_window_user_data(hwnd) as *mut AppState<A, E>
}

/// Run `f` against the app unless another handler is already running.
///
/// Nested messages are dropped, except user events, which stay queued and are drained when the
/// outer handler returns.
fn dispatch<A, E, R>(hwnd: HWND, window: WindowId, f: impl FnOnce(&mut A) -> Option<R>) -> Option<R>
where
    A: WindowMessageHandler<WindowHandle = WindowId, UserEvent = E> + 'static,
{
    let ptr = state_ptr::<A, E>(hwnd);
    if ptr.is_null() {
        return None;
    }

    // SAFETY: the pointer is set from a leaked Box in WM_CREATE and only freed when no handler
    // is running. `busy` guarantees at most one `&mut A` exists; the flags are disjoint fields
    // accessed through the raw pointer.
    unsafe {
        if (*ptr).busy {
            return None;
        }
        (*ptr).busy = true;
        let result = f(&mut (*ptr).app);
        (*ptr).busy = false;

        if (*ptr).destroyed {
            drop(Box::from_raw(ptr));
            return result;
        }
        if std::mem::take(&mut (*ptr).deferred_events) {
            drain_user_events::<A, E>(hwnd, window);
        }
        result
    }
}

fn drain_user_events<A, E>(hwnd: HWND, window: WindowId)
where
    A: WindowMessageHandler<WindowHandle = WindowId, UserEvent = E> + 'static,
{
    loop {
        let ptr = state_ptr::<A, E>(hwnd);
        if ptr.is_null() {
            return;
        }
        // SAFETY: see `dispatch`; no handler is running here.
        let event = match unsafe { (*ptr).user_events.try_recv() } {
            Ok(event) => event,
            Err(_) => return,
        };
        let _ = dispatch::<A, E, isize>(hwnd, window, |app| app.handle_user_event(window, event));
    }
}

/// Create the hidden message window, build the app inside `WM_CREATE` and pump messages until
/// the window is destroyed.
pub fn run_message_window_app<A, F, E>(
    window_class_name: &str,
    class_style: WNDCLASS_STYLES,
    create_app: F,
) -> windows::core::Result<()>
where
    A: WindowMessageHandler<WindowHandle = WindowId> + 'static,
    F: FnOnce(WindowId, UserEventSender<A::UserEvent>) -> std::result::Result<A, E>,
    E: fmt::Display,
{
    let _ = win_api::set_process_per_monitor_dpi_aware();

    let (tx, rx) = mpsc::channel::<A::UserEvent>();

    let mut create_params = CreateParams {
        factory: Some(create_app),
        user_events: Some(rx),
        user_event_sender: tx,
    };

    let _hwnd = win_api::create_hidden_toolwindow_with_params(
        window_class_name,
        window_proc::<A, F, E>,
        class_style,
        Some(
            (&mut create_params as *mut CreateParams<F, A::UserEvent>).cast::<c_void>()
                as *const c_void,
        ),
    )?;

    win_api::run_message_loop();
    Ok(())
}

unsafe extern "system" fn window_proc<A, F, E>(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT
where
    A: WindowMessageHandler<WindowHandle = WindowId> + 'static,
    F: FnOnce(WindowId, UserEventSender<A::UserEvent>) -> std::result::Result<A, E>,
    E: fmt::Display,
{
    let window = super::window_id(hwnd);

    match msg {
        WM_CREATE => {
            let _ = win_api::co_initialize();

            let create_struct = unsafe { &*(lparam.0 as *const CREATESTRUCTW) };
            let create_params = create_struct.lpCreateParams as *mut CreateParams<F, A::UserEvent>;

            if create_params.is_null() {
                return LRESULT(-1);
            }

            let Some(factory) = (unsafe { (&mut *create_params).factory.take() }) else {
                return LRESULT(-1);
            };
            let Some(user_events) = (unsafe { (&mut *create_params).user_events.take() }) else {
                return LRESULT(-1);
            };

            let event_sender = UserEventSender {
                window,
                sender: unsafe { (&mut *create_params).user_event_sender.clone() },
            };

            match factory(window, event_sender) {
                Ok(app) => {
                    let state = Box::new(AppState {
                        app,
                        user_events,
                        busy: false,
                        deferred_events: false,
                        destroyed: false,
                    });
                    win_api::set_window_user_data(hwnd, Box::into_raw(state) as isize);
                    LRESULT(0)
                }
                Err(e) => {
                    tracing::error!("startup failed: {e}");
                    message_box::show_error(hwnd, "silence!", &format!("Failed to start: {e}"));
                    LRESULT(-1)
                }
            }
        }

        WM_DESTROY => {
            let ptr = state_ptr::<A, A::UserEvent>(hwnd);
            win_api::set_window_user_data(hwnd, 0);
            if !ptr.is_null() {
                // SAFETY: see `dispatch`. A running handler frees the state when it unwinds.
                unsafe {
                    if (*ptr).busy {
                        (*ptr).destroyed = true;
                    } else {
                        // Dropping the app releases the hook, timers and tray icon.
                        drop(Box::from_raw(ptr));
                    }
                }
            }

            win_api::quit_message_loop(0);
            LRESULT(0)
        }

        val if val == USER_EVENT_MESSAGE => {
            let ptr = state_ptr::<A, A::UserEvent>(hwnd);
            if ptr.is_null() {
                return LRESULT(0);
            }
            // SAFETY: flag access only; see `dispatch`.
            if unsafe { (*ptr).busy } {
                unsafe { (*ptr).deferred_events = true };
                return LRESULT(0);
            }
            drain_user_events::<A, A::UserEvent>(hwnd, window);
            LRESULT(0)
        }

        WM_CLOSE => {
            if let Some(result) = dispatch::<A, A::UserEvent, isize>(hwnd, window, |app| {
                app.handle_close_requested(window)
            }) {
                return LRESULT(result);
            }
            win_api::def_window_proc(hwnd, msg, wparam, lparam)
        }

        val if val == TRAY_CALLBACK_MESSAGE => {
            if let Some(tray_event) = tray_event_from_callback(lparam.0 as u32) {
                let _ = dispatch::<A, A::UserEvent, isize>(hwnd, window, |app| {
                    app.handle_input_event(window, InputEvent::Tray(tray_event))
                });
            }
            LRESULT(0)
        }

        _ => {
            let handled = dispatch::<A, A::UserEvent, isize>(hwnd, window, |app| {
                if let Some(event) = WindowEventConverter::convert(msg, wparam, lparam)
                    && let Some(result) = app.handle_window_event(window, event)
                {
                    return Some(result);
                }

                if let Some(result) = app.handle_window_message(window, msg, wparam.0, lparam.0) {
                    return Some(result);
                }

                EventConverter::convert(msg, wparam, lparam)
                    .and_then(|event| app.handle_input_event(window, event))
            });

            match handled {
                Some(result) => LRESULT(result),
                None => win_api::def_window_proc(hwnd, msg, wparam, lparam),
            }
        }
    }
}
