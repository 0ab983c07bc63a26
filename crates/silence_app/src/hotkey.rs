//! Global hotkey matching and capture.
//!
//! The model is fed raw key transitions from the low-level keyboard hook. While armed it matches
//! key-downs against the stored binding; while recording it learns a new binding from the next
//! non-modifier key-down.

use serde::{Deserialize, Serialize};

use crate::keys::{KeyCode, Modifiers};

/// A key plus the modifiers that must be held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HotkeyBinding {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    /// Subset matching (extra held modifiers allowed) when true, exact matching when false.
    pub ignore_extra_modifiers: bool,
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self {
            key: KeyCode::F21,
            modifiers: Modifiers::NONE,
            ignore_extra_modifiers: true,
        }
    }
}

impl HotkeyBinding {
    pub const fn new(key: KeyCode, modifiers: Modifiers, ignore_extra_modifiers: bool) -> Self {
        Self {
            key,
            modifiers,
            ignore_extra_modifiers,
        }
    }

    /// Does a key-down of `key` with `held` modifiers trigger this binding?
    pub fn matches(&self, key: KeyCode, held: Modifiers) -> bool {
        if key != self.key {
            return false;
        }

        // A modifier bound as the key itself is always "held" while it is pressed.
        let held = match key.modifier() {
            Some(own) => held - own,
            None => held,
        };

        if self.ignore_extra_modifiers {
            held.contains(self.modifiers)
        } else {
            held == self.modifiers
        }
    }

    /// e.g. `Ctrl + Shift + F5`.
    pub fn display_name(&self) -> String {
        let mut parts: Vec<String> = self.modifiers.names().map(str::to_string).collect();
        parts.push(self.key.name());
        parts.join(" + ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Armed,
    Recording { held: Modifiers },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Key pressed. `held` is the synchronous modifier snapshot taken by the hook.
    KeyDown { key: KeyCode, held: Modifiers },
    KeyUp { key: KeyCode },
    StartRecording,
    /// Abandon a recording without changing the binding.
    CancelRecording,
    SetBinding(HotkeyBinding),
    SetIgnoreExtraModifiers(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The armed binding fired.
    Toggle,
    /// Live modifier feedback while recording.
    ModifiersChanged(Modifiers),
    /// Recording finished with a new binding; the model is armed with it.
    Captured(HotkeyBinding),
    RecordingCancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    binding: HotkeyBinding,
    phase: Phase,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(HotkeyBinding::default())
    }
}

impl Model {
    pub fn new(binding: HotkeyBinding) -> Self {
        Self {
            binding,
            phase: Phase::Armed,
        }
    }

    pub fn binding(&self) -> HotkeyBinding {
        self.binding
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.phase, Phase::Recording { .. })
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::KeyDown { key, held } => match self.phase {
                Phase::Armed => {
                    if self.binding.matches(key, held) {
                        vec![Effect::Toggle]
                    } else {
                        Vec::new()
                    }
                }
                Phase::Recording { held: recorded } => match key.modifier() {
                    Some(flag) => self.update_recorded(recorded | flag),
                    None => {
                        let captured = HotkeyBinding {
                            key,
                            modifiers: recorded,
                            ignore_extra_modifiers: self.binding.ignore_extra_modifiers,
                        };
                        self.binding = captured;
                        self.phase = Phase::Armed;
                        vec![Effect::Captured(captured)]
                    }
                },
            },

            Action::KeyUp { key } => match (self.phase, key.modifier()) {
                (Phase::Recording { held: recorded }, Some(flag)) => {
                    self.update_recorded(recorded - flag)
                }
                _ => Vec::new(),
            },

            Action::StartRecording => {
                self.phase = Phase::Recording {
                    held: Modifiers::NONE,
                };
                vec![Effect::ModifiersChanged(Modifiers::NONE)]
            }

            Action::CancelRecording => {
                if !self.is_recording() {
                    return Vec::new();
                }
                self.phase = Phase::Armed;
                vec![Effect::RecordingCancelled]
            }

            Action::SetBinding(binding) => {
                self.binding = binding;
                Vec::new()
            }

            Action::SetIgnoreExtraModifiers(ignore) => {
                self.binding.ignore_extra_modifiers = ignore;
                Vec::new()
            }
        }
    }

    fn update_recorded(&mut self, held: Modifiers) -> Vec<Effect> {
        let Phase::Recording { held: previous } = self.phase else {
            return Vec::new();
        };
        if previous == held {
            // Auto-repeat of an already held modifier.
            return Vec::new();
        }
        self.phase = Phase::Recording { held };
        vec![Effect::ModifiersChanged(held)]
    }
}
