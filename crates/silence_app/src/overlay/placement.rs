//! Monitor-relative overlay placement.
//!
//! Placement is stored as a percentage of the target monitor's work area, never as absolute
//! pixels, so it survives resolution and monitor layout changes.

use serde::{Deserialize, Serialize};
use silence_rendering::{Point, Rectangle, Size};

pub const PRIMARY_MONITOR_KEY: &str = "PRIMARY";

/// Work area used when no monitor can be enumerated at all.
pub const FALLBACK_WORK_AREA: Rectangle = Rectangle::new(0, 0, 1920, 1080);

/// Target monitor, persisted as `"PRIMARY"` or the GDI device name (e.g. `\\.\DISPLAY2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MonitorId {
    #[default]
    Primary,
    Device(String),
}

impl MonitorId {
    pub fn as_key(&self) -> &str {
        match self {
            MonitorId::Primary => PRIMARY_MONITOR_KEY,
            MonitorId::Device(name) => name,
        }
    }
}

impl From<String> for MonitorId {
    fn from(value: String) -> Self {
        if value.is_empty() || value == PRIMARY_MONITOR_KEY {
            MonitorId::Primary
        } else {
            MonitorId::Device(value)
        }
    }
}

impl From<&str> for MonitorId {
    fn from(value: &str) -> Self {
        MonitorId::from(value.to_string())
    }
}

impl From<MonitorId> for String {
    fn from(value: MonitorId) -> Self {
        match value {
            MonitorId::Primary => PRIMARY_MONITOR_KEY.to_string(),
            MonitorId::Device(name) => name,
        }
    }
}

/// One display as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub device_name: String,
    pub work_area: Rectangle,
    pub is_primary: bool,
}

impl Monitor {
    /// Menu label, e.g. `Screen 2: \\.\DISPLAY2 (2560x1400) - Primary`.
    pub fn label(&self, index: usize) -> String {
        format!(
            "Screen {}: {} ({}x{}){}",
            index + 1,
            self.device_name,
            self.work_area.width,
            self.work_area.height,
            if self.is_primary { " - Primary" } else { "" }
        )
    }
}

/// Work area of the requested monitor.
///
/// A device that is no longer connected falls back to the primary monitor, then to the first
/// monitor, then to [`FALLBACK_WORK_AREA`].
pub fn resolve_work_area(monitors: &[Monitor], id: &MonitorId) -> Rectangle {
    if let MonitorId::Device(name) = id
        && let Some(m) = monitors.iter().find(|m| &m.device_name == name)
    {
        return m.work_area;
    }

    monitors
        .iter()
        .find(|m| m.is_primary)
        .or_else(|| monitors.first())
        .map(|m| m.work_area)
        .unwrap_or(FALLBACK_WORK_AREA)
}

#[inline]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    pub percent_x: f64,
    pub percent_y: f64,
    pub monitor: MonitorId,
}

impl Default for OverlayPlacement {
    fn default() -> Self {
        Self {
            percent_x: 50.0,
            percent_y: 80.0,
            monitor: MonitorId::Primary,
        }
    }
}

impl OverlayPlacement {
    pub fn new(percent_x: f64, percent_y: f64, monitor: MonitorId) -> Self {
        Self {
            percent_x: clamp_percent(percent_x),
            percent_y: clamp_percent(percent_y),
            monitor,
        }
    }

    /// Top-left pixel position of a `badge`-sized window in `work_area`.
    ///
    /// Fractional pixels are truncated.
    pub fn resolve(&self, work_area: Rectangle, badge: Size) -> Point {
        let x = work_area.x as f64
            + (work_area.width - badge.width) as f64 * clamp_percent(self.percent_x) / 100.0;
        let y = work_area.y as f64
            + (work_area.height - badge.height) as f64 * clamp_percent(self.percent_y) / 100.0;
        Point::new(x as i32, y as i32)
    }

    /// Inverse of [`resolve`](Self::resolve), clamped to 0-100.
    pub fn from_position(
        position: Point,
        work_area: Rectangle,
        badge: Size,
        monitor: MonitorId,
    ) -> Self {
        Self {
            percent_x: percent_of(position.x - work_area.x, work_area.width - badge.width),
            percent_y: percent_of(position.y - work_area.y, work_area.height - badge.height),
            monitor,
        }
    }
}

fn percent_of(offset: i32, span: i32) -> f64 {
    if span <= 0 {
        return 0.0;
    }
    clamp_percent(offset as f64 * 100.0 / span as f64)
}

/// Human-readable horizontal position: `Center`, `Left 12%` or `Right 30%`.
pub fn describe_horizontal(percent_x: f64) -> String {
    describe_axis(percent_x, "Center", "Left", "Right")
}

/// Human-readable vertical position: `Middle`, `Top 5%` or `Bottom 20%`.
pub fn describe_vertical(percent_y: f64) -> String {
    describe_axis(percent_y, "Middle", "Top", "Bottom")
}

fn describe_axis(percent: f64, centered: &str, low: &str, high: &str) -> String {
    if (percent - 50.0).abs() < 1.0 {
        centered.to_string()
    } else if percent < 50.0 {
        format!("{low} {percent:.0}%")
    } else {
        format!("{high} {:.0}%", 100.0 - percent)
    }
}
