//! Frame-stepped opacity ramps.
//!
//! Opacity is tracked in whole frames rather than floats so a fade always lands exactly on its
//! target after a fixed number of ticks.

/// Interval of the UI tick that drives fades and drag polling.
pub const FRAME_INTERVAL_MS: u32 = 16;
/// Frames in a full show/hide fade.
pub const FADE_FRAMES: u8 = 10;
pub const FADE_DURATION_MS: u32 = FRAME_INTERVAL_MS * FADE_FRAMES as u32;
/// Crossfade runs at twice the show/hide speed, so out+in fits in one fade.
pub const CROSSFADE_SPEED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    level: u8,
    target: u8,
}

impl Ramp {
    pub const fn full() -> Self {
        Self {
            level: FADE_FRAMES,
            target: FADE_FRAMES,
        }
    }

    pub const fn empty() -> Self {
        Self {
            level: 0,
            target: 0,
        }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        f32::from(self.level) / f32::from(FADE_FRAMES)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.level == FADE_FRAMES
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.level == self.target
    }

    /// True while heading toward (or sitting at) full opacity.
    #[inline]
    pub fn targets_full(&self) -> bool {
        self.target == FADE_FRAMES
    }

    pub fn fade_in(&mut self) {
        self.target = FADE_FRAMES;
    }

    pub fn fade_out(&mut self) {
        self.target = 0;
    }

    /// Jump to full or empty immediately.
    pub fn snap(&mut self, full: bool) {
        *self = if full { Self::full() } else { Self::empty() };
    }

    /// Advance `speed` frames toward the target. Returns true if the level changed.
    pub fn step(&mut self, speed: u8) -> bool {
        let before = self.level;
        self.level = if self.level < self.target {
            self.level.saturating_add(speed).min(self.target)
        } else {
            self.level.saturating_sub(speed).max(self.target)
        };
        self.level != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_in_takes_fade_frames() {
        let mut r = Ramp::empty();
        r.fade_in();
        let mut ticks = 0;
        while r.step(1) {
            ticks += 1;
        }
        assert_eq!(ticks, FADE_FRAMES);
        assert_eq!(r.alpha(), 1.0);
        assert_eq!(FADE_DURATION_MS, 160);
    }

    #[test]
    fn double_speed_halves_duration() {
        let mut r = Ramp::full();
        r.fade_out();
        let mut ticks = 0;
        while r.step(CROSSFADE_SPEED) {
            ticks += 1;
        }
        assert_eq!(ticks, FADE_FRAMES / 2);
        assert!(r.is_empty());
    }

    #[test]
    fn reversal_mid_fade() {
        let mut r = Ramp::empty();
        r.fade_in();
        r.step(1);
        r.step(1);
        r.fade_out();
        assert!(r.step(1));
        assert!((r.alpha() - 0.1).abs() < f32::EPSILON);
        assert!(r.step(1));
        assert!(!r.step(1));
        assert!(r.is_settled());
    }

    #[test]
    fn overshoot_is_clamped() {
        let mut r = Ramp::empty();
        r.fade_in();
        for _ in 0..5 {
            r.step(3);
        }
        assert!(r.is_full());
    }
}
