use silence_app::{AppModel, Effect, overlay};

use silence_host_protocol::Command;

pub fn command_from_effect(effect: Effect) -> Option<Command> {
    match effect {
        Effect::Overlay(overlay_effect) => match overlay_effect {
            overlay::Effect::ShowWindow => Some(Command::ShowOverlay),
            overlay::Effect::HideWindow => Some(Command::HideOverlay),
            overlay::Effect::SetClickThrough(enabled) => Some(Command::SetClickThrough(enabled)),
            overlay::Effect::Redraw => Some(Command::RenderOverlay),
            overlay::Effect::SavePlacement(placement) => Some(Command::SavePlacement(placement)),
            overlay::Effect::PositioningEnded => {
                tracing::debug!("overlay positioning finished");
                None
            }
        },

        Effect::UpdateTray { .. } => Some(Command::UpdateTray),
        Effect::PlayFeedback { muted } => Some(Command::PlayFeedback { muted }),
    }
}

pub fn commands_from_effects(effects: impl IntoIterator<Item = Effect>) -> Vec<Command> {
    effects
        .into_iter()
        .filter_map(command_from_effect)
        .collect()
}

/// Reduce `action` and translate the effects. Always ends with [`Command::ScheduleTick`] so the
/// UI tick follows whatever the overlay needs now.
pub fn dispatch(core: &mut AppModel, action: silence_app::Action) -> Vec<Command> {
    let mut commands = commands_from_effects(core.reduce(action));
    commands.push(Command::ScheduleTick);
    commands
}
