pub mod hotkey;
pub mod keys;
pub mod overlay;

pub use keys::{KeyCode, Modifiers};

/// Top-level application actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The endpoint reported a (possibly unchanged) mute state.
    MuteStateChanged(bool),
    Overlay(overlay::Action),
}

/// Top-level application effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Overlay(overlay::Effect),
    /// Refresh the tray icon and tooltip.
    UpdateTray { muted: bool },
    /// Play the mute/unmute sound if enabled.
    PlayFeedback { muted: bool },
}

/// Core app model: the last known microphone state plus the overlay.
#[derive(Debug, Default)]
pub struct AppModel {
    muted: Option<bool>,
    overlay: overlay::Model,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first state has been read from the device.
    pub fn muted(&self) -> Option<bool> {
        self.muted
    }

    pub fn overlay(&self) -> &overlay::Model {
        &self.overlay
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::MuteStateChanged(muted) => {
                let previous = self.muted.replace(muted);
                if previous == Some(muted) {
                    return Vec::new();
                }

                let mut effects = vec![Effect::UpdateTray { muted }];
                // No sound for the initial read at startup.
                if previous.is_some() {
                    effects.push(Effect::PlayFeedback { muted });
                }
                effects.extend(
                    self.overlay
                        .reduce(overlay::Action::MuteChanged(muted))
                        .into_iter()
                        .map(Effect::Overlay),
                );
                effects
            }

            Action::Overlay(a) => self
                .overlay
                .reduce(a)
                .into_iter()
                .map(Effect::Overlay)
                .collect(),
        }
    }
}
