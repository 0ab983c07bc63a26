//! Tray menu layout, command ids and tooltip text.

use silence_app::Modifiers;
use silence_app::hotkey::HotkeyBinding;
use silence_app::overlay::placement::{describe_horizontal, describe_vertical};
use silence_app::overlay::{Monitor, MonitorId, OverlayPlacement, VisibilityMode, VisibilityPolicy};
use silence_host_protocol::{ScreenChoice, TrayCommand};
use silence_platform::{AudioDevice, MenuItem};
use silence_rendering::{BackgroundStyle, BadgeStyle, IconStyle};

use crate::constants::{TOOLTIP_MUTED, TOOLTIP_RECORDING, TOOLTIP_UNMUTED};

const ID_TOGGLE_MUTE: u32 = 1;
const ID_RECORD_HOTKEY: u32 = 2;
const ID_IGNORE_MODIFIERS: u32 = 3;
const ID_SHOW_OVERLAY: u32 = 4;
const ID_SHOW_TEXT: u32 = 5;
const ID_POSITION: u32 = 6;
const ID_SOUNDS: u32 = 7;
const ID_AUTOSTART: u32 = 8;
const ID_EXIT: u32 = 9;

const ID_BACKGROUND_DARK: u32 = 20;
const ID_BACKGROUND_LIGHT: u32 = 21;
const ID_ICON_COLORED: u32 = 22;
const ID_ICON_MONOCHROME: u32 = 23;

const ID_VISIBILITY_BASE: u32 = 30;

const ID_SCREEN_PRIMARY: u32 = 100;
const ID_SCREEN_BASE: u32 = 101;
const MAX_SCREENS: u32 = 99;

const ID_MIC_DEFAULT: u32 = 200;
const ID_MIC_BASE: u32 = 201;
const MAX_MICROPHONES: u32 = 99;

/// Everything the menu reflects.
#[derive(Debug, Clone)]
pub struct MenuState<'a> {
    pub binding: HotkeyBinding,
    pub recording: bool,
    pub overlay: VisibilityPolicy,
    pub screen: &'a MonitorId,
    pub style: BadgeStyle,
    /// Live placement while positioning, `None` otherwise.
    pub positioning: Option<OverlayPlacement>,
    pub sounds_enabled: bool,
    pub autostart: bool,
    pub monitors: &'a [Monitor],
    pub devices: &'a [AudioDevice],
    /// Selected capture endpoint id; `None` follows the default device.
    pub microphone: Option<&'a str>,
}

pub fn build(state: &MenuState<'_>) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::label(format!("Hotkey: {}", state.binding.display_name())),
        MenuItem::Separator,
        MenuItem::command(ID_TOGGLE_MUTE, "Toggle Mute"),
        MenuItem::command(
            ID_RECORD_HOTKEY,
            if state.recording {
                "Cancel Recording"
            } else {
                "Record Hotkey..."
            },
        ),
        MenuItem::command(ID_IGNORE_MODIFIERS, "Ignore Extra Modifiers")
            .checked(state.binding.ignore_extra_modifiers),
        MenuItem::Separator,
        MenuItem::command(ID_SHOW_OVERLAY, "Show Overlay").checked(state.overlay.enabled),
        MenuItem::submenu("Overlay Visibility", visibility_items(state.overlay.mode)),
        MenuItem::submenu("Overlay Screen", screen_items(state.screen, state.monitors)),
        MenuItem::submenu("Overlay Appearance", appearance_items(&state.style)),
        MenuItem::command(ID_SHOW_TEXT, "Show Overlay Text").checked(state.style.show_text),
    ];

    match &state.positioning {
        Some(placement) => {
            items.push(MenuItem::label(position_label(placement)));
            items.push(MenuItem::command(ID_POSITION, "Finish Positioning"));
        }
        None => items.push(MenuItem::command(ID_POSITION, "Position Overlay")),
    }

    items.extend([
        MenuItem::Separator,
        MenuItem::submenu(
            "Microphone",
            microphone_items(state.microphone, state.devices),
        ),
        MenuItem::command(ID_SOUNDS, "Play Sounds").checked(state.sounds_enabled),
        MenuItem::command(ID_AUTOSTART, "Start with Windows").checked(state.autostart),
        MenuItem::Separator,
        MenuItem::command(ID_EXIT, "Exit"),
    ]);
    items
}

fn visibility_items(current: VisibilityMode) -> Vec<MenuItem> {
    VisibilityMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            MenuItem::command(ID_VISIBILITY_BASE + i as u32, mode.label()).checked(*mode == current)
        })
        .collect()
}

fn screen_items(current: &MonitorId, monitors: &[Monitor]) -> Vec<MenuItem> {
    let mut items =
        vec![MenuItem::command(ID_SCREEN_PRIMARY, "Primary").checked(*current == MonitorId::Primary)];
    items.extend(
        monitors
            .iter()
            .take(MAX_SCREENS as usize)
            .enumerate()
            .map(|(i, monitor)| {
                let selected = matches!(current, MonitorId::Device(name) if *name == monitor.device_name);
                MenuItem::command(ID_SCREEN_BASE + i as u32, monitor.label(i)).checked(selected)
            }),
    );
    items
}

fn appearance_items(style: &BadgeStyle) -> Vec<MenuItem> {
    vec![
        MenuItem::command(ID_BACKGROUND_DARK, "Dark Background")
            .checked(style.background == BackgroundStyle::Dark),
        MenuItem::command(ID_BACKGROUND_LIGHT, "Light Background")
            .checked(style.background == BackgroundStyle::Light),
        MenuItem::Separator,
        MenuItem::command(ID_ICON_COLORED, "Colored Icon").checked(style.icon == IconStyle::Colored),
        MenuItem::command(ID_ICON_MONOCHROME, "Monochrome Icon")
            .checked(style.icon == IconStyle::Monochrome),
    ]
}

fn microphone_items(selected: Option<&str>, devices: &[AudioDevice]) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::command(ID_MIC_DEFAULT, "Default Device").checked(selected.is_none())];
    if !devices.is_empty() {
        items.push(MenuItem::Separator);
    }
    items.extend(
        devices
            .iter()
            .take(MAX_MICROPHONES as usize)
            .enumerate()
            .map(|(i, device)| {
                MenuItem::command(ID_MIC_BASE + i as u32, device.name.as_str())
                    .checked(selected == Some(device.id.as_str()))
            }),
    );
    items
}

/// Map a chosen menu id back to its command.
///
/// Index-based ids refer to the monitor and device lists the menu was built from.
pub fn command_for_id(id: u32) -> Option<TrayCommand> {
    let command = match id {
        ID_TOGGLE_MUTE => TrayCommand::ToggleMute,
        ID_RECORD_HOTKEY => TrayCommand::RecordHotkey,
        ID_IGNORE_MODIFIERS => TrayCommand::ToggleIgnoreExtraModifiers,
        ID_SHOW_OVERLAY => TrayCommand::ToggleOverlay,
        ID_SHOW_TEXT => TrayCommand::ToggleOverlayText,
        ID_POSITION => TrayCommand::TogglePositioning,
        ID_SOUNDS => TrayCommand::ToggleSounds,
        ID_AUTOSTART => TrayCommand::ToggleAutostart,
        ID_EXIT => TrayCommand::Exit,
        ID_BACKGROUND_DARK => TrayCommand::SetBackground(BackgroundStyle::Dark),
        ID_BACKGROUND_LIGHT => TrayCommand::SetBackground(BackgroundStyle::Light),
        ID_ICON_COLORED => TrayCommand::SetIconStyle(IconStyle::Colored),
        ID_ICON_MONOCHROME => TrayCommand::SetIconStyle(IconStyle::Monochrome),
        ID_SCREEN_PRIMARY => TrayCommand::SetScreen(ScreenChoice::Primary),
        ID_MIC_DEFAULT => TrayCommand::SelectMicrophone(None),
        id if id >= ID_VISIBILITY_BASE && id < ID_VISIBILITY_BASE + VisibilityMode::ALL.len() as u32 => {
            TrayCommand::SetVisibility(VisibilityMode::ALL[(id - ID_VISIBILITY_BASE) as usize])
        }
        id if id >= ID_SCREEN_BASE && id < ID_SCREEN_BASE + MAX_SCREENS => {
            TrayCommand::SetScreen(ScreenChoice::Index((id - ID_SCREEN_BASE) as usize))
        }
        id if id >= ID_MIC_BASE && id < ID_MIC_BASE + MAX_MICROPHONES => {
            TrayCommand::SelectMicrophone(Some((id - ID_MIC_BASE) as usize))
        }
        _ => return None,
    };
    Some(command)
}

/// e.g. `Position: Center, Bottom 20%`.
pub fn position_label(placement: &OverlayPlacement) -> String {
    format!(
        "Position: {}, {}",
        describe_horizontal(placement.percent_x),
        describe_vertical(placement.percent_y)
    )
}

/// Tray tooltip. While recording it echoes the modifiers held so far.
pub fn tooltip(muted: bool, recording: Option<Modifiers>) -> String {
    match recording {
        Some(held) if !held.is_empty() => {
            let names: Vec<&str> = held.names().collect();
            format!("silence! - Recording: {} + ...", names.join(" + "))
        }
        Some(_) => TOOLTIP_RECORDING.to_string(),
        None if muted => TOOLTIP_MUTED.to_string(),
        None => TOOLTIP_UNMUTED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silence_app::KeyCode;
    use silence_rendering::Rectangle;

    fn monitors() -> Vec<Monitor> {
        vec![
            Monitor {
                device_name: r"\\.\DISPLAY1".into(),
                work_area: Rectangle::new(0, 0, 1920, 1040),
                is_primary: true,
            },
            Monitor {
                device_name: r"\\.\DISPLAY2".into(),
                work_area: Rectangle::new(1920, 0, 2560, 1400),
                is_primary: false,
            },
        ]
    }

    fn devices() -> Vec<AudioDevice> {
        vec![
            AudioDevice {
                id: "{mic-a}".into(),
                name: "Headset".into(),
            },
            AudioDevice {
                id: "{mic-b}".into(),
                name: "Webcam".into(),
            },
        ]
    }

    fn collect_ids(items: &[MenuItem], out: &mut Vec<u32>) {
        for item in items {
            match item {
                MenuItem::Command { id, .. } if *id != 0 => out.push(*id),
                MenuItem::Submenu { items, .. } => collect_ids(items, out),
                _ => {}
            }
        }
    }

    fn is_checked(items: &[MenuItem], id: u32) -> bool {
        matches!(MenuItem::find(items, id), Some(MenuItem::Command { checked: true, .. }))
    }

    fn label_of(items: &[MenuItem], id: u32) -> String {
        match MenuItem::find(items, id) {
            Some(MenuItem::Command { label, .. }) => label.clone(),
            other => panic!("no command {id}: {other:?}"),
        }
    }

    #[test]
    fn every_menu_entry_maps_to_a_command() {
        let screen = MonitorId::Device(r"\\.\DISPLAY2".into());
        let monitors = monitors();
        let devices = devices();
        let state = MenuState {
            binding: HotkeyBinding::default(),
            recording: false,
            overlay: VisibilityPolicy::default(),
            screen: &screen,
            style: BadgeStyle::default(),
            positioning: None,
            sounds_enabled: true,
            autostart: false,
            monitors: &monitors,
            devices: &devices,
            microphone: Some("{mic-b}"),
        };
        let items = build(&state);

        let mut ids = Vec::new();
        collect_ids(&items, &mut ids);
        assert!(ids.iter().all(|id| command_for_id(*id).is_some()));

        assert!(is_checked(&items, ID_SCREEN_BASE + 1));
        assert!(!is_checked(&items, ID_SCREEN_PRIMARY));
        assert!(is_checked(&items, ID_MIC_BASE + 1));
        assert!(!is_checked(&items, ID_MIC_DEFAULT));
        assert!(is_checked(&items, ID_SOUNDS));
        assert!(is_checked(&items, ID_IGNORE_MODIFIERS));
        assert!(is_checked(&items, ID_BACKGROUND_DARK));
        assert!(is_checked(&items, ID_VISIBILITY_BASE));
    }

    #[test]
    fn index_ids_decode() {
        assert_eq!(
            command_for_id(ID_SCREEN_BASE + 1),
            Some(TrayCommand::SetScreen(ScreenChoice::Index(1)))
        );
        assert_eq!(
            command_for_id(ID_MIC_BASE),
            Some(TrayCommand::SelectMicrophone(Some(0)))
        );
        assert_eq!(
            command_for_id(ID_VISIBILITY_BASE + 2),
            Some(TrayCommand::SetVisibility(VisibilityMode::WhenUnmuted))
        );
        assert_eq!(command_for_id(0), None);
        assert_eq!(command_for_id(ID_VISIBILITY_BASE + 3), None);
    }

    #[test]
    fn recording_and_positioning_change_labels() {
        let screen = MonitorId::Primary;
        let placement = OverlayPlacement::new(50.0, 80.0, MonitorId::Primary);
        let state = MenuState {
            binding: HotkeyBinding::new(KeyCode::F5, Modifiers::CTRL, false),
            recording: true,
            overlay: VisibilityPolicy::default(),
            screen: &screen,
            style: BadgeStyle::default(),
            positioning: Some(placement),
            sounds_enabled: false,
            autostart: true,
            monitors: &[],
            devices: &[],
            microphone: None,
        };
        let items = build(&state);

        assert_eq!(items[0], MenuItem::label("Hotkey: Ctrl + F5"));
        assert_eq!(label_of(&items, ID_RECORD_HOTKEY), "Cancel Recording");
        assert_eq!(label_of(&items, ID_POSITION), "Finish Positioning");
        assert!(items.contains(&MenuItem::label("Position: Center, Bottom 20%")));
        assert!(!is_checked(&items, ID_IGNORE_MODIFIERS));
        assert!(is_checked(&items, ID_AUTOSTART));
        assert!(is_checked(&items, ID_MIC_DEFAULT));
    }

    #[test]
    fn position_labels() {
        let p = OverlayPlacement::new(12.0, 3.0, MonitorId::Primary);
        assert_eq!(position_label(&p), "Position: Left 12%, Top 3%");
        let p = OverlayPlacement::new(70.0, 50.5, MonitorId::Primary);
        assert_eq!(position_label(&p), "Position: Right 30%, Middle");
    }

    #[test]
    fn tooltips() {
        assert_eq!(tooltip(true, None), "silence! - Microphone MUTED");
        assert_eq!(tooltip(false, None), "silence! - Microphone ON");
        assert_eq!(tooltip(true, Some(Modifiers::NONE)), TOOLTIP_RECORDING);
        assert_eq!(
            tooltip(false, Some(Modifiers::CTRL | Modifiers::SHIFT)),
            "silence! - Recording: Ctrl + Shift + ..."
        );
    }
}
