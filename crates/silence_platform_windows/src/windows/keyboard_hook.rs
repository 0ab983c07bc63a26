//! System-wide keyboard observation through a `WH_KEYBOARD_LL` hook.
//!
//! The hook lives on its own thread with its own message loop so a busy UI thread can never
//! stall keyboard input for the whole session. Events are observed, never swallowed.

use std::cell::RefCell;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use silence_app::{KeyCode, Modifiers};
use silence_platform::{KeyEvent, KeySink, KeyTransition, KeyboardHook, PlatformError, PlatformResult};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{VK_CONTROL, VK_LWIN, VK_MENU, VK_RWIN, VK_SHIFT};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG, PM_NOREMOVE, PeekMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN,
    WM_SYSKEYUP, WM_USER,
};

use crate::win_api;

thread_local! {
    static SINK: RefCell<Option<KeySink>> = RefCell::new(None);
}

/// Snapshot of the physical modifier keys at the time of the call.
pub fn held_modifiers() -> Modifiers {
    let mut held = Modifiers::NONE;
    held.set(Modifiers::SHIFT, win_api::is_key_down(VK_SHIFT.0 as u32));
    held.set(Modifiers::CTRL, win_api::is_key_down(VK_CONTROL.0 as u32));
    held.set(Modifiers::ALT, win_api::is_key_down(VK_MENU.0 as u32));
    held.set(
        Modifiers::WIN,
        win_api::is_key_down(VK_LWIN.0 as u32) || win_api::is_key_down(VK_RWIN.0 as u32),
    );
    held
}

pub fn transition_from_message(msg: u32) -> Option<KeyTransition> {
    match msg {
        WM_KEYDOWN | WM_SYSKEYDOWN => Some(KeyTransition::Down),
        WM_KEYUP | WM_SYSKEYUP => Some(KeyTransition::Up),
        _ => None,
    }
}

unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32
        && let Some(transition) = transition_from_message(wparam.0 as u32)
    {
        let info = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
        let event = KeyEvent {
            key: KeyCode(info.vkCode),
            transition,
            held: held_modifiers(),
        };
        SINK.with(|sink| {
            if let Ok(mut sink) = sink.try_borrow_mut()
                && let Some(sink) = sink.as_mut()
            {
                sink(event);
            }
        });
    }

    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

struct HookGuard(HHOOK);

impl Drop for HookGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.0);
        }
    }
}

fn run_hook_thread(sink: KeySink, ready: mpsc::Sender<Result<u32, String>>) {
    SINK.with(|slot| *slot.borrow_mut() = Some(sink));

    // Create the thread's message queue before anyone can post WM_QUIT to it.
    let mut msg = MSG::default();
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }

    let installed = win_api::get_module_handle().and_then(|module| unsafe {
        SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_proc), Some(module.into()), 0)
    });
    let hook = match installed {
        Ok(hook) => HookGuard(hook),
        Err(e) => {
            let _ = ready.send(Err(format!("SetWindowsHookExW failed: {e:?}")));
            return;
        }
    };

    let _ = ready.send(Ok(unsafe { GetCurrentThreadId() }));
    tracing::info!("keyboard hook installed");

    win_api::run_message_loop();

    drop(hook);
    SINK.with(|slot| slot.borrow_mut().take());
    tracing::info!("keyboard hook removed");
}

struct HookWorker {
    thread_id: u32,
    handle: JoinHandle<()>,
}

/// [`KeyboardHook`] backed by a low-level keyboard hook on a dedicated thread.
#[derive(Default)]
pub struct LowLevelKeyboardHook {
    worker: Option<HookWorker>,
}

impl LowLevelKeyboardHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyboardHook for LowLevelKeyboardHook {
    fn install(&mut self, sink: KeySink) -> PlatformResult<()> {
        self.uninstall();

        let (ready_tx, ready_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("keyboard-hook".into())
            .spawn(move || run_hook_thread(sink, ready_tx))
            .map_err(|e| PlatformError::Hook(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                self.worker = Some(HookWorker { thread_id, handle });
                Ok(())
            }
            Ok(Err(message)) => {
                let _ = handle.join();
                Err(PlatformError::Hook(message))
            }
            Err(_) => {
                let _ = handle.join();
                Err(PlatformError::Hook("hook thread exited during startup".into()))
            }
        }
    }

    fn uninstall(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if let Err(e) = win_api::post_thread_quit(worker.thread_id) {
            tracing::warn!("failed to stop keyboard hook thread: {e:?}");
            return;
        }
        if worker.handle.join().is_err() {
            tracing::warn!("keyboard hook thread panicked");
        }
    }

    fn is_installed(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for LowLevelKeyboardHook {
    fn drop(&mut self) {
        self.uninstall();
    }
}
