//! Magnetic centering while dragging.

use silence_rendering::{Point, Rectangle, Size};

/// Distance from center (px) inside which the badge is pulled toward it.
pub const MAGNETIC_RANGE: f64 = 200.0;
/// Distance from center (px) inside which the badge sits exactly on it.
pub const SNAP_THRESHOLD: f64 = 8.0;

/// Pull one axis toward `center`.
///
/// Strength is a cubic ease-in of the normalized distance, `(1 - d / range)^3`.
pub fn magnetic_axis(base: f64, center: f64) -> f64 {
    let distance = (base - center).abs();
    if distance >= MAGNETIC_RANGE {
        return base;
    }
    if distance < SNAP_THRESHOLD {
        return center;
    }

    let t = 1.0 - distance / MAGNETIC_RANGE;
    let strength = t * t * t;
    base + (center - base) * strength
}

/// Top-left origin that centers a `badge` in `work_area` (fractional).
pub fn centered_origin(work_area: Rectangle, badge: Size) -> (f64, f64) {
    (
        work_area.x as f64 + (work_area.width - badge.width) as f64 / 2.0,
        work_area.y as f64 + (work_area.height - badge.height) as f64 / 2.0,
    )
}

/// Apply magnetic centering on both axes independently and round to whole pixels.
pub fn magnetic_snap(base: Point, work_area: Rectangle, badge: Size) -> Point {
    let (cx, cy) = centered_origin(work_area, badge);
    let x = magnetic_axis(base.x as f64, cx);
    let y = magnetic_axis(base.y as f64, cy);
    Point::new(x.round() as i32, y.round() as i32)
}
