pub use silence_app::{KeyCode, Modifiers};

/// System tray event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    LeftClick,
    /// Context menu requested at the cursor.
    RightClick,
}

/// Platform-agnostic input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// System tray event.
    Tray(TrayEvent),
    /// Timer event.
    Timer { id: u32 },
}

/// Window/display state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Monitor layout or work area changed.
    DisplayChanged,
    DpiChanged { dpi: u32 },
}

/// Direction of a key transition seen by a keyboard hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    Up,
}

/// One key transition plus the synchronously sampled modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub transition: KeyTransition,
    pub held: Modifiers,
}

impl KeyEvent {
    pub fn down(key: KeyCode, held: Modifiers) -> Self {
        Self {
            key,
            transition: KeyTransition::Down,
            held,
        }
    }

    pub fn up(key: KeyCode, held: Modifiers) -> Self {
        Self {
            key,
            transition: KeyTransition::Up,
            held,
        }
    }
}
