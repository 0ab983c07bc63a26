//! Badge geometry at a given display scale.
//!
//! Everything here is in physical pixels. Base metrics are expressed at 96 DPI and truncated after
//! scaling so the badge snaps to whole pixels the same way the window does.

use crate::types::{Rectangle, Size};

pub const BASE_ICON_ONLY_SIZE: i32 = 48;
pub const BASE_ICON_FONT_SIZE: f32 = 28.0;
pub const BASE_TEXT_FONT_SIZE: f32 = 14.0;
pub const BASE_PADDING: i32 = 6;
pub const BASE_ICON_TEXT_GAP: i32 = 2;
pub const BASE_CORNER_RADIUS: i32 = 6;
pub const BASE_BORDER_WIDTH: f32 = 2.0;

/// Percent-x above which the badge keeps its right edge when its width changes.
pub const RIGHT_ANCHOR_PERCENT: f64 = 60.0;
/// Percent-x at or above which (up to [`RIGHT_ANCHOR_PERCENT`]) the badge keeps its center.
pub const CENTER_ANCHOR_PERCENT: f64 = 40.0;

#[inline]
fn scaled(base: i32, scale: f32) -> i32 {
    (base as f32 * scale) as i32
}

/// Resolved badge geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeLayout {
    pub size: Size,
    pub scale: f32,
    /// Square box the microphone glyph is drawn into.
    pub icon_rect: Rectangle,
    /// Box reserved for the status label, if shown.
    pub text_rect: Option<Rectangle>,
    pub icon_font_size: f32,
    pub text_font_size: f32,
    pub corner_radius: f32,
    pub border_width: f32,
}

impl BadgeLayout {
    /// Compute the layout from measured content extents.
    ///
    /// `icon_width` is the glyph advance at the icon font size, `text_width` the label advance at
    /// the text font size (or `None` when the label is hidden).
    pub fn compute(scale: f32, icon_width: f32, text_width: Option<f32>) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };

        let icon_only = scaled(BASE_ICON_ONLY_SIZE, scale);
        let padding = scaled(BASE_PADDING, scale);
        let gap = scaled(BASE_ICON_TEXT_GAP, scale);
        let icon_font_size = BASE_ICON_FONT_SIZE * scale;
        let text_font_size = BASE_TEXT_FONT_SIZE * scale;

        let icon_w = icon_width.max(0.0).ceil() as i32;
        let icon_h = icon_font_size.ceil() as i32;
        let icon_y = (icon_only - icon_h) / 2;

        let (width, icon_rect, text_rect) = match text_width {
            Some(text_width) => {
                let text_w = text_width.max(0.0).ceil() as i32;
                let width = padding + icon_w + gap + text_w + padding;
                let icon_rect = Rectangle::new(padding, icon_y, icon_w, icon_h);
                let text_rect = Rectangle::new(padding + icon_w + gap, 0, text_w, icon_only);
                (width, icon_rect, Some(text_rect))
            }
            None => {
                let icon_rect = Rectangle::new((icon_only - icon_w) / 2, icon_y, icon_w, icon_h);
                (icon_only, icon_rect, None)
            }
        };

        Self {
            size: Size::new(width, icon_only),
            scale,
            icon_rect,
            text_rect,
            icon_font_size,
            text_font_size,
            corner_radius: scaled(BASE_CORNER_RADIUS, scale) as f32,
            border_width: BASE_BORDER_WIDTH * scale,
        }
    }
}

/// Horizontal shift (to subtract from the badge x) after a width change.
///
/// Badges placed in the right third keep their right edge, the middle third keeps its center and
/// the left third keeps its left edge.
pub fn anchor_shift(old_width: i32, new_width: i32, percent_x: f64) -> i32 {
    if old_width <= 0 || old_width == new_width {
        return 0;
    }

    let diff = new_width - old_width;
    if percent_x > RIGHT_ANCHOR_PERCENT {
        diff
    } else if percent_x >= CENTER_ANCHOR_PERCENT {
        diff / 2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_only_is_square_at_base_scale() {
        let layout = BadgeLayout::compute(1.0, 28.0, None);
        assert_eq!(layout.size, Size::new(48, 48));
        assert_eq!(layout.icon_rect, Rectangle::new(10, 10, 28, 28));
        assert!(layout.text_rect.is_none());
    }

    #[test]
    fn text_width_adds_padding_icon_and_gap() {
        // 6 + 28 + 2 + ceil(120.2) + 6
        let layout = BadgeLayout::compute(1.0, 28.0, Some(120.2));
        assert_eq!(layout.size, Size::new(163, 48));
        assert_eq!(layout.text_rect, Some(Rectangle::new(36, 0, 121, 48)));
    }

    #[test]
    fn height_stays_fixed_when_width_grows() {
        let short = BadgeLayout::compute(1.5, 42.0, Some(10.0));
        let long = BadgeLayout::compute(1.5, 42.0, Some(300.0));
        assert_eq!(short.size.height, 72);
        assert_eq!(long.size.height, 72);
        assert!(long.size.width > short.size.width);
    }

    #[test]
    fn scale_truncates_metrics() {
        let layout = BadgeLayout::compute(1.25, 35.0, None);
        assert_eq!(layout.size, Size::new(60, 60));
        assert_eq!(layout.corner_radius, 7.0);
        assert_eq!(layout.border_width, 2.5);
    }

    #[test]
    fn invalid_scale_falls_back_to_one() {
        let layout = BadgeLayout::compute(f32::NAN, 28.0, None);
        assert_eq!(layout.size, Size::new(48, 48));
    }

    #[test]
    fn anchor_shift_by_third() {
        assert_eq!(anchor_shift(48, 160, 80.0), 112);
        assert_eq!(anchor_shift(48, 160, 50.0), 56);
        assert_eq!(anchor_shift(48, 160, 60.0), 56);
        assert_eq!(anchor_shift(48, 160, 40.0), 56);
        assert_eq!(anchor_shift(48, 160, 39.9), 0);
        assert_eq!(anchor_shift(160, 48, 100.0), -112);
    }

    #[test]
    fn anchor_shift_ignores_first_layout() {
        assert_eq!(anchor_shift(0, 160, 100.0), 0);
        assert_eq!(anchor_shift(160, 160, 100.0), 0);
    }

    #[test]
    fn center_anchor_truncates_odd_differences() {
        assert_eq!(anchor_shift(48, 51, 50.0), 1);
        assert_eq!(anchor_shift(51, 48, 50.0), -1);
    }
}
