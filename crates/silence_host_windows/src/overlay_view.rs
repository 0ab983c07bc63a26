//! Badge painting for the overlay window and the tray icon.

use silence_app::overlay::OverlayVisual;
use silence_platform::TrayIconImage;
use silence_rendering::layout::BASE_ICON_ONLY_SIZE;
use silence_rendering::{
    BackgroundStyle, BadgeBitmap, BadgeContent, BadgeRenderer, BadgeStyle, IconStyle,
    RenderResult, Size, TextMeasurer,
};

use crate::constants::TRAY_ICON_SIZE;

/// Measures and rasterizes badges.
pub trait BadgePainter {
    /// Badge size for `muted` without painting it.
    fn measure(&self, style: &BadgeStyle, muted: bool, scale: f32) -> Size;

    fn paint(
        &self,
        style: &BadgeStyle,
        content: &BadgeContent,
        scale: f32,
    ) -> RenderResult<BadgeBitmap>;
}

impl<M: TextMeasurer> BadgePainter for BadgeRenderer<M> {
    fn measure(&self, style: &BadgeStyle, muted: bool, scale: f32) -> Size {
        self.layout(style, muted, scale).size
    }

    fn paint(
        &self,
        style: &BadgeStyle,
        content: &BadgeContent,
        scale: f32,
    ) -> RenderResult<BadgeBitmap> {
        self.render(style, content, scale)
    }
}

/// Colored glyph on a transparent square.
pub const TRAY_STYLE: BadgeStyle = BadgeStyle {
    background: BackgroundStyle::Dark,
    icon: IconStyle::Colored,
    show_text: false,
    opacity: 0,
    content_opacity: 100,
};

pub fn tray_icon(painter: &dyn BadgePainter, muted: bool) -> RenderResult<TrayIconImage> {
    let scale = TRAY_ICON_SIZE as f32 / BASE_ICON_ONLY_SIZE as f32;
    let bitmap = painter.paint(&TRAY_STYLE, &BadgeContent::steady(muted), scale)?;
    Ok(TrayIconImage {
        width: bitmap.width,
        height: bitmap.height,
        bgra: bitmap.bgra,
    })
}

/// Content layer for one overlay frame.
pub fn frame_content(visual: &OverlayVisual) -> BadgeContent {
    BadgeContent {
        muted: visual.muted,
        content_alpha: visual.content_alpha,
        highlight: visual.highlight,
    }
}

/// Whole-window fade factor as `SourceConstantAlpha`.
pub fn window_alpha(alpha: f32) -> u8 {
    if alpha.is_nan() {
        return 0;
    }
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}
