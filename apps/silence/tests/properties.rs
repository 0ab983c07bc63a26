use silence::settings::ConfigManager;
use silence_app::hotkey::{Action, Effect, HotkeyBinding, Model};
use silence_app::overlay::snap::{MAGNETIC_RANGE, magnetic_axis, magnetic_snap};
use silence_app::overlay::{
    self, MonitorId, OverlayPlacement, PointerState, VisibilityMode, VisibilityPolicy,
};
use silence_app::{KeyCode, Modifiers};
use silence_rendering::{Point, Rectangle, Size};

const HD: Rectangle = Rectangle::new(0, 0, 1920, 1080);
const BADGE: Size = Size::new(48, 48);

fn press(model: &mut Model, key: KeyCode, held: Modifiers) -> Vec<Effect> {
    model.reduce(Action::KeyDown { key, held })
}

#[test]
fn subset_binding_fires_with_extra_modifiers() {
    let mut model = Model::new(HotkeyBinding::new(KeyCode::M, Modifiers::CTRL, true));
    for held in [
        Modifiers::CTRL,
        Modifiers::CTRL | Modifiers::SHIFT,
        Modifiers::ALL,
    ] {
        assert_eq!(press(&mut model, KeyCode::M, held), vec![Effect::Toggle]);
    }
    for held in [Modifiers::NONE, Modifiers::SHIFT] {
        assert!(press(&mut model, KeyCode::M, held).is_empty());
    }
}

#[test]
fn exact_binding_rejects_extra_modifiers() {
    let required = Modifiers::CTRL | Modifiers::SHIFT;
    let mut model = Model::new(HotkeyBinding::new(KeyCode::M, required, false));
    assert_eq!(press(&mut model, KeyCode::M, required), vec![Effect::Toggle]);
    assert!(press(&mut model, KeyCode::M, required | Modifiers::ALT).is_empty());
}

#[test]
fn recording_captures_held_modifiers() {
    let mut model = Model::new(HotkeyBinding::default());
    model.reduce(Action::StartRecording);
    press(&mut model, KeyCode::LCONTROL, Modifiers::CTRL);
    press(&mut model, KeyCode::LSHIFT, Modifiers::CTRL | Modifiers::SHIFT);
    let effects = press(&mut model, KeyCode::F5, Modifiers::CTRL | Modifiers::SHIFT);

    let Some(Effect::Captured(binding)) = effects.first() else {
        panic!("expected a captured binding, got {effects:?}");
    };
    assert_eq!(binding.key, KeyCode::F5);
    assert_eq!(binding.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
    assert_eq!(model.binding(), *binding);
}

#[test]
fn released_modifier_is_not_captured() {
    let mut model = Model::new(HotkeyBinding::default());
    model.reduce(Action::StartRecording);
    press(&mut model, KeyCode::LCONTROL, Modifiers::CTRL);
    press(&mut model, KeyCode::LSHIFT, Modifiers::CTRL | Modifiers::SHIFT);
    model.reduce(Action::KeyUp {
        key: KeyCode::LCONTROL,
    });
    let effects = press(&mut model, KeyCode::F5, Modifiers::SHIFT);

    assert_eq!(
        effects,
        vec![Effect::Captured(HotkeyBinding::new(
            KeyCode::F5,
            Modifiers::SHIFT,
            model.binding().ignore_extra_modifiers,
        ))]
    );
}

#[test]
fn saved_placement_resolves_to_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigManager::with_path(dir.path().join("settings.json"));
    config
        .update(|s| {
            s.overlay_position_x = 50.0;
            s.overlay_position_y = 80.0;
            s.overlay_screen_id = "PRIMARY".into();
        })
        .unwrap();

    // Reload from disk to cover persistence too.
    let placement = ConfigManager::with_path(config.path()).placement();
    assert_eq!(placement, OverlayPlacement::new(50.0, 80.0, MonitorId::Primary));
    assert_eq!(placement.resolve(HD, BADGE), Point::new(936, 825));
}

#[test]
fn magnetic_snap_profile() {
    let center = (1920.0 - 48.0) / 2.0;
    assert_eq!(magnetic_axis(center + 5.0, center), center);

    let base = center + 150.0;
    let eased = magnetic_axis(base, center);
    let expected = base - 150.0 * (1.0 - 150.0 / MAGNETIC_RANGE).powi(3);
    assert!((eased - expected).abs() < 1e-9);

    assert_eq!(magnetic_axis(center + 250.0, center), center + 250.0);

    // Both axes near center land exactly on it.
    assert_eq!(
        magnetic_snap(Point::new(940, 513), HD, BADGE),
        Point::new(936, 516)
    );
}

#[test]
fn visibility_policy_table() {
    let when_muted = VisibilityPolicy {
        enabled: true,
        mode: VisibilityMode::WhenMuted,
    };
    assert!(when_muted.should_show(true));
    assert!(!when_muted.should_show(false));

    let always = VisibilityPolicy::default();
    assert!(always.should_show(true));
    assert!(always.should_show(false));
}

#[test]
fn stopping_positioning_twice_saves_once() {
    let mut model = overlay::Model::new();
    model.reduce(overlay::Action::Resize(BADGE));
    model.reduce(overlay::Action::Configure {
        policy: VisibilityPolicy::default(),
        placement: OverlayPlacement::new(50.0, 80.0, MonitorId::Primary),
        work_area: HD,
    });
    model.reduce(overlay::Action::StartPositioning);
    model.reduce(overlay::Action::Tick(PointerState::default()));

    let first = model.reduce(overlay::Action::StopPositioning);
    let saves = first
        .iter()
        .filter(|e| matches!(e, overlay::Effect::SavePlacement(_)))
        .count();
    assert_eq!(saves, 1);
    assert!(model.reduce(overlay::Action::StopPositioning).is_empty());
}
