//! Overlay window state machine.
//!
//! Phases:
//! - `Hidden`: window not shown.
//! - `Shown`: passive, click-through badge, fading in or out per the visibility policy.
//! - `Positioning`: interactive; the user drags the badge and the final position is saved.
//!
//! All time-based behavior (fades, crossfades, drag polling) advances on [`Action::Tick`], which
//! the host delivers at [`FRAME_INTERVAL_MS`](super::animation::FRAME_INTERVAL_MS) while
//! [`Model::needs_tick`] is true.

use silence_rendering::{Point, Rectangle, Size, anchor_shift};

use super::animation::{CROSSFADE_SPEED, Ramp};
use super::placement::{FALLBACK_WORK_AREA, OverlayPlacement};
use super::snap::magnetic_snap;
use super::visibility::VisibilityPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Shown,
    Positioning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossfade {
    Idle,
    /// Content fading out; the glyph swaps when it reaches zero.
    Out,
    In,
}

/// Pointer and key state sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    pub cursor: Point,
    pub button_down: bool,
    pub escape_down: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Settings or monitor layout changed.
    Configure {
        policy: VisibilityPolicy,
        placement: OverlayPlacement,
        work_area: Rectangle,
    },
    /// Badge re-measured. The host sends this before painting whenever the size may differ.
    Resize(Size),
    MuteChanged(bool),
    StartPositioning,
    /// Finish positioning and commit the position. No-op unless positioning.
    StopPositioning,
    Tick(PointerState),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowWindow,
    HideWindow,
    SetClickThrough(bool),
    Redraw,
    SavePlacement(OverlayPlacement),
    PositioningEnded,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayVisual {
    /// Mute state currently drawn (lags the real state during a crossfade).
    pub muted: bool,
    pub highlight: bool,
    pub dragging: bool,
    pub alpha: f32,
    pub content_alpha: f32,
    pub bounds: Rectangle,
}

#[derive(Debug, Clone)]
pub struct Model {
    phase: Phase,
    policy: VisibilityPolicy,
    placement: OverlayPlacement,
    work_area: Rectangle,
    position: Point,
    size: Size,
    muted: bool,
    displayed_muted: bool,
    window: Ramp,
    content: Ramp,
    crossfade: Crossfade,
    drag_offset: Option<Point>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Self {
            phase: Phase::Hidden,
            // Nothing is shown until the first Configure.
            policy: VisibilityPolicy {
                enabled: false,
                ..VisibilityPolicy::default()
            },
            placement: OverlayPlacement::default(),
            work_area: FALLBACK_WORK_AREA,
            position: Point::ZERO,
            size: Size::default(),
            muted: false,
            displayed_muted: false,
            window: Ramp::empty(),
            content: Ramp::full(),
            crossfade: Crossfade::Idle,
            drag_offset: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn placement(&self) -> &OverlayPlacement {
        &self.placement
    }

    pub fn work_area(&self) -> Rectangle {
        self.work_area
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_origin_size(self.position, self.size)
    }

    pub fn is_positioning(&self) -> bool {
        self.phase == Phase::Positioning
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// True while a fade, crossfade or positioning session needs periodic ticks.
    pub fn needs_tick(&self) -> bool {
        self.phase == Phase::Positioning
            || !self.window.is_settled()
            || self.crossfade != Crossfade::Idle
    }

    pub fn visual(&self) -> OverlayVisual {
        OverlayVisual {
            muted: self.displayed_muted,
            highlight: self.phase == Phase::Positioning,
            dragging: self.is_dragging(),
            alpha: self.window.alpha(),
            content_alpha: self.content.alpha(),
            bounds: self.bounds(),
        }
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Configure {
                policy,
                placement,
                work_area,
            } => {
                self.policy = policy;
                if self.phase != Phase::Positioning {
                    self.work_area = work_area;
                    self.placement = placement;
                    if !self.size.is_empty() {
                        self.position = self.placement.resolve(self.work_area, self.size);
                    }
                } else if placement.monitor != self.placement.monitor {
                    self.move_to_monitor(placement, work_area);
                } else {
                    self.work_area = work_area;
                }

                let mut effects = Vec::new();
                self.apply_visibility(&mut effects);
                effects.push(Effect::Redraw);
                effects
            }

            Action::Resize(size) => {
                if size == self.size || size.is_empty() {
                    return Vec::new();
                }

                let old = self.size;
                self.size = size;
                if old.is_empty() {
                    self.position = self.placement.resolve(self.work_area, size);
                } else {
                    self.position.x -=
                        anchor_shift(old.width, size.width, self.placement.percent_x);
                }
                Vec::new()
            }

            Action::MuteChanged(muted) => self.mute_changed(muted),

            Action::StartPositioning => {
                // An unmeasured badge has no position worth saving.
                if self.phase == Phase::Positioning || self.size.is_empty() {
                    return Vec::new();
                }

                let was_hidden = self.phase == Phase::Hidden;
                self.phase = Phase::Positioning;
                self.drag_offset = None;
                self.window.snap(true);
                if was_hidden {
                    self.settle_content();
                }

                let mut effects = vec![Effect::SetClickThrough(false)];
                if was_hidden {
                    effects.push(Effect::ShowWindow);
                }
                effects.push(Effect::Redraw);
                effects
            }

            Action::StopPositioning => self.stop_positioning(),

            Action::Tick(pointer) => self.tick(pointer),
        }
    }

    fn mute_changed(&mut self, muted: bool) -> Vec<Effect> {
        let visible = self.phase != Phase::Hidden && self.window.targets_full();
        self.muted = muted;

        let mut effects = Vec::new();
        if visible {
            if self.displayed_muted != muted {
                self.crossfade = Crossfade::Out;
                self.content.fade_out();
            } else if self.crossfade == Crossfade::Out {
                // Toggled back before the swap; just fade the old glyph back in.
                self.crossfade = Crossfade::In;
                self.content.fade_in();
            }
        } else {
            self.settle_content();
            effects.push(Effect::Redraw);
        }

        self.apply_visibility(&mut effects);
        effects
    }

    /// Carry the in-progress position over to another monitor, keeping its relative offsets.
    fn move_to_monitor(&mut self, placement: OverlayPlacement, work_area: Rectangle) {
        self.drag_offset = None;
        self.placement = if self.size.is_empty() {
            placement
        } else {
            OverlayPlacement::from_position(
                self.position,
                self.work_area,
                self.size,
                placement.monitor,
            )
        };
        self.work_area = work_area;
        if !self.size.is_empty() {
            self.position = self.placement.resolve(self.work_area, self.size);
        }
    }

    fn stop_positioning(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Positioning {
            return Vec::new();
        }

        self.drag_offset = None;
        self.phase = Phase::Shown;

        let placement = OverlayPlacement::from_position(
            self.position,
            self.work_area,
            self.size,
            self.placement.monitor.clone(),
        );
        if !self.work_area.contains_rect(&self.bounds()) {
            self.position = placement.resolve(self.work_area, self.size);
        }
        self.placement = placement.clone();

        let mut effects = vec![
            Effect::SetClickThrough(true),
            Effect::SavePlacement(placement),
            Effect::PositioningEnded,
        ];
        self.apply_visibility(&mut effects);
        effects.push(Effect::Redraw);
        effects
    }

    fn tick(&mut self, pointer: PointerState) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut redraw = false;

        if self.phase == Phase::Positioning {
            if pointer.escape_down {
                return self.stop_positioning();
            }
            redraw |= self.track_drag(pointer);
        }

        redraw |= self.window.step(1);

        match self.crossfade {
            Crossfade::Idle => {}
            Crossfade::Out => {
                redraw |= self.content.step(CROSSFADE_SPEED);
                if self.content.is_empty() {
                    self.displayed_muted = self.muted;
                    self.crossfade = Crossfade::In;
                    self.content.fade_in();
                    redraw = true;
                }
            }
            Crossfade::In => {
                redraw |= self.content.step(CROSSFADE_SPEED);
                if self.content.is_full() {
                    self.crossfade = Crossfade::Idle;
                }
            }
        }

        if self.phase == Phase::Shown && self.window.is_empty() && self.window.is_settled() {
            self.phase = Phase::Hidden;
            self.settle_content();
            effects.push(Effect::HideWindow);
            return effects;
        }

        if redraw {
            effects.push(Effect::Redraw);
        }
        effects
    }

    /// Returns true if the badge moved.
    fn track_drag(&mut self, pointer: PointerState) -> bool {
        match self.drag_offset {
            None => {
                if pointer.button_down && self.bounds().contains(pointer.cursor) {
                    self.drag_offset = Some(Point::new(
                        pointer.cursor.x - self.position.x,
                        pointer.cursor.y - self.position.y,
                    ));
                }
                false
            }
            Some(_) if !pointer.button_down => {
                self.drag_offset = None;
                false
            }
            Some(offset) => {
                let base = Point::new(pointer.cursor.x - offset.x, pointer.cursor.y - offset.y);
                let next = magnetic_snap(base, self.work_area, self.size);
                if next == self.position {
                    return false;
                }
                self.position = next;
                true
            }
        }
    }

    fn apply_visibility(&mut self, effects: &mut Vec<Effect>) {
        let want = self.policy.should_show(self.muted);
        match self.phase {
            Phase::Positioning => {}
            Phase::Hidden => {
                if want {
                    self.phase = Phase::Shown;
                    self.window = Ramp::empty();
                    self.window.fade_in();
                    self.settle_content();
                    effects.push(Effect::ShowWindow);
                }
            }
            Phase::Shown => {
                if want {
                    self.window.fade_in();
                } else {
                    self.window.fade_out();
                }
            }
        }
    }

    /// Drop any crossfade and show the current state at full content opacity.
    fn settle_content(&mut self) {
        self.displayed_muted = self.muted;
        self.content.snap(true);
        self.crossfade = Crossfade::Idle;
    }
}
