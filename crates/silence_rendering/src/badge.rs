//! Badge composition.
//!
//! A badge is a rounded background, an optional highlight border and a content layer (microphone
//! glyph plus optional status label). The content layer is composited with its own opacity so the
//! glyph can crossfade independently of the background.

use tiny_skia::{
    FillRule, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::error::{RenderError, RenderResult};
use crate::icons::microphone_svg;
use crate::layout::BadgeLayout;
use crate::pixels::rgba_to_bgra;
use crate::text::{SvgTextEngine, TextMeasurer};
use crate::types::{Color, Rectangle, Size};

pub const MUTED_LABEL: &str = "Microphone is muted";
pub const UNMUTED_LABEL: &str = "Microphone is unmuted";

pub const DARK_BACKGROUND: Color = Color::rgb(30, 30, 30);
pub const LIGHT_BACKGROUND: Color = Color::rgb(255, 255, 255);
pub const HIGHLIGHT_BORDER: Color = Color::rgb(0, 120, 215);
pub const MUTED_ICON: Color = Color::rgb(220, 53, 69);
pub const UNMUTED_ICON: Color = Color::rgb(40, 167, 69);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundStyle {
    #[default]
    Dark,
    Light,
}

impl BackgroundStyle {
    pub fn color(self) -> Color {
        match self {
            BackgroundStyle::Dark => DARK_BACKGROUND,
            BackgroundStyle::Light => LIGHT_BACKGROUND,
        }
    }

    /// Foreground that contrasts with this background.
    pub fn contrast(self) -> Color {
        match self {
            BackgroundStyle::Dark => Color::WHITE,
            BackgroundStyle::Light => Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconStyle {
    #[default]
    Monochrome,
    Colored,
}

/// Appearance settings that feed the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStyle {
    pub background: BackgroundStyle,
    pub icon: IconStyle,
    pub show_text: bool,
    /// Background opacity, 0-100.
    pub opacity: u8,
    /// Glyph/label opacity, 0-100.
    pub content_opacity: u8,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            background: BackgroundStyle::Dark,
            icon: IconStyle::Monochrome,
            show_text: false,
            opacity: 80,
            content_opacity: 100,
        }
    }
}

impl BadgeStyle {
    pub fn icon_color(&self, muted: bool) -> Color {
        match (self.icon, muted) {
            (IconStyle::Monochrome, _) => self.background.contrast(),
            (IconStyle::Colored, true) => MUTED_ICON,
            (IconStyle::Colored, false) => UNMUTED_ICON,
        }
    }
}

/// Per-frame content state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeContent {
    pub muted: bool,
    /// Crossfade factor in `0.0..=1.0`.
    pub content_alpha: f32,
    /// Draw the positioning highlight border.
    pub highlight: bool,
}

impl BadgeContent {
    pub fn steady(muted: bool) -> Self {
        Self {
            muted,
            content_alpha: 1.0,
            highlight: false,
        }
    }
}

/// Rendered badge in premultiplied BGRA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeBitmap {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<u8>,
}

impl BadgeBitmap {
    pub fn size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }
}

pub fn status_label(muted: bool) -> &'static str {
    if muted { MUTED_LABEL } else { UNMUTED_LABEL }
}

/// Convert a 0-100 percentage to an 8-bit alpha.
pub fn percent_to_alpha(percent: u8) -> u8 {
    (u32::from(percent.min(100)) * 255 / 100) as u8
}

pub struct BadgeRenderer<M = SvgTextEngine> {
    measurer: M,
    text: SvgTextEngine,
}

impl BadgeRenderer<SvgTextEngine> {
    /// Renderer that measures and draws labels with system fonts.
    pub fn new() -> Self {
        let text = SvgTextEngine::with_system_fonts();
        Self {
            measurer: text.clone(),
            text,
        }
    }
}

impl Default for BadgeRenderer<SvgTextEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TextMeasurer> BadgeRenderer<M> {
    /// Renderer with a custom measurer. Labels are laid out but not drawn.
    pub fn with_measurer(measurer: M) -> Self {
        Self {
            measurer,
            text: SvgTextEngine::empty(),
        }
    }

    pub fn layout(&self, style: &BadgeStyle, muted: bool, scale: f32) -> BadgeLayout {
        let probe = BadgeLayout::compute(scale, 0.0, None);
        let icon_width = probe.icon_font_size;
        let text_width = style
            .show_text
            .then(|| self.measurer.measure(status_label(muted), probe.text_font_size));
        BadgeLayout::compute(scale, icon_width, text_width)
    }

    pub fn render(
        &self,
        style: &BadgeStyle,
        content: &BadgeContent,
        scale: f32,
    ) -> RenderResult<BadgeBitmap> {
        let pixmap = self.render_pixmap(style, content, scale)?;
        Ok(BadgeBitmap {
            width: pixmap.width(),
            height: pixmap.height(),
            bgra: rgba_to_bgra(pixmap.data()),
        })
    }

    pub fn render_pixmap(
        &self,
        style: &BadgeStyle,
        content: &BadgeContent,
        scale: f32,
    ) -> RenderResult<Pixmap> {
        let layout = self.layout(style, content.muted, scale);
        let size = layout.size;
        let invalid = || RenderError::InvalidSize {
            width: size.width,
            height: size.height,
        };
        if size.is_empty() {
            return Err(invalid());
        }

        let mut pixmap = Pixmap::new(size.width as u32, size.height as u32).ok_or_else(invalid)?;
        let (w, h) = (size.width as f32, size.height as f32);

        let background = style
            .background
            .color()
            .with_alpha(percent_to_alpha(style.opacity));
        if background.a > 0
            && let Some(path) = rounded_rect(0.0, 0.0, w, h, layout.corner_radius)
        {
            pixmap.fill_path(
                &path,
                &solid(background),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }

        if content.highlight {
            let inset = layout.border_width / 2.0;
            if let Some(path) = rounded_rect(
                inset,
                inset,
                w - layout.border_width,
                h - layout.border_width,
                (layout.corner_radius - inset).max(0.0),
            ) {
                let stroke = Stroke {
                    width: layout.border_width,
                    ..Stroke::default()
                };
                pixmap.stroke_path(
                    &path,
                    &solid(HIGHLIGHT_BORDER),
                    &stroke,
                    Transform::identity(),
                    None,
                );
            }
        }

        let content_alpha = f32::from(style.content_opacity.min(100)) / 100.0
            * content.content_alpha.clamp(0.0, 1.0);
        if content_alpha > 0.0 {
            let layer = self.render_content(style, content.muted, &layout)?;
            pixmap.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint {
                    opacity: content_alpha,
                    ..PixmapPaint::default()
                },
                Transform::identity(),
                None,
            );
        }

        Ok(pixmap)
    }

    fn render_content(
        &self,
        style: &BadgeStyle,
        muted: bool,
        layout: &BadgeLayout,
    ) -> RenderResult<Pixmap> {
        let size = layout.size;
        let mut layer = Pixmap::new(size.width as u32, size.height as u32).ok_or(
            RenderError::InvalidSize {
                width: size.width,
                height: size.height,
            },
        )?;

        let icon = usvg::Tree::from_str(
            &microphone_svg(muted, style.icon_color(muted), layout.icon_font_size),
            &usvg::Options::default(),
        )?;
        resvg::render(
            &icon,
            Transform::from_translate(layout.icon_rect.x as f32, layout.icon_rect.y as f32),
            &mut layer.as_mut(),
        );

        if let Some(frame) = layout.text_rect {
            draw_label(
                &self.text,
                &mut layer,
                status_label(muted),
                layout.text_font_size,
                style.background.contrast(),
                frame,
            )?;
        }

        Ok(layer)
    }
}

fn draw_label(
    engine: &SvgTextEngine,
    layer: &mut Pixmap,
    label: &str,
    font_size: f32,
    color: Color,
    frame: Rectangle,
) -> RenderResult<()> {
    if engine.face_count() == 0 {
        return Ok(());
    }
    let tree = engine.layout(label, font_size, color, frame)?;
    resvg::render(&tree, Transform::identity(), &mut layer.as_mut());
    Ok(())
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }

    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if r == 0.0 {
        return Rect::from_xywh(x, y, w, h).map(PathBuilder::from_rect);
    }

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::alpha_at;
    use crate::text::FixedAdvanceMeasurer;

    fn renderer() -> BadgeRenderer<FixedAdvanceMeasurer> {
        BadgeRenderer::with_measurer(FixedAdvanceMeasurer::new(0.5))
    }

    #[test]
    fn icon_only_badge_is_48_square() {
        let bitmap = renderer()
            .render(&BadgeStyle::default(), &BadgeContent::steady(true), 1.0)
            .expect("render");
        assert_eq!((bitmap.width, bitmap.height), (48, 48));
        assert_eq!(bitmap.bgra.len(), 48 * 48 * 4);
    }

    #[test]
    fn label_width_depends_on_mute_state() {
        let style = BadgeStyle {
            show_text: true,
            ..BadgeStyle::default()
        };
        let r = renderer();
        // 19 chars * 14 * 0.5 = 133 -> 6 + 28 + 2 + 133 + 6
        assert_eq!(r.layout(&style, true, 1.0).size, Size::new(175, 48));
        // 21 chars * 14 * 0.5 = 147
        assert_eq!(r.layout(&style, false, 1.0).size, Size::new(189, 48));
    }

    #[test]
    fn background_alpha_follows_opacity_when_content_hidden() {
        let style = BadgeStyle {
            opacity: 80,
            ..BadgeStyle::default()
        };
        let content = BadgeContent {
            content_alpha: 0.0,
            ..BadgeContent::steady(false)
        };
        let bitmap = renderer().render(&style, &content, 1.0).expect("render");
        assert_eq!(alpha_at(&bitmap.bgra, bitmap.width, 24, 24), Some(204));
        // Rounded corner leaves the extreme pixel mostly transparent.
        let corner = alpha_at(&bitmap.bgra, bitmap.width, 0, 0).unwrap_or(255);
        assert!(corner < 204);
    }

    #[test]
    fn highlight_border_is_blue() {
        let style = BadgeStyle {
            opacity: 100,
            ..BadgeStyle::default()
        };
        let content = BadgeContent {
            highlight: true,
            content_alpha: 0.0,
            muted: false,
        };
        let bitmap = renderer().render(&style, &content, 1.0).expect("render");
        let idx = ((bitmap.width + 24) * 4) as usize; // (24, 1)
        let (b, _g, r) = (bitmap.bgra[idx], bitmap.bgra[idx + 1], bitmap.bgra[idx + 2]);
        assert!(b > 150);
        assert!(r < 60);
    }

    #[test]
    fn glyph_adds_coverage_over_transparent_background() {
        let style = BadgeStyle {
            opacity: 0,
            ..BadgeStyle::default()
        };
        let bitmap = renderer()
            .render(&style, &BadgeContent::steady(false), 1.0)
            .expect("render");
        let covered = bitmap.bgra.chunks_exact(4).filter(|px| px[3] > 0).count();
        assert!(covered > 0);

        let hidden = renderer()
            .render(
                &style,
                &BadgeContent {
                    content_alpha: 0.0,
                    ..BadgeContent::steady(false)
                },
                1.0,
            )
            .expect("render");
        assert!(hidden.bgra.chunks_exact(4).all(|px| px[3] == 0));
    }

    #[test]
    fn icon_colors() {
        let mono_dark = BadgeStyle::default();
        assert_eq!(mono_dark.icon_color(true), Color::WHITE);

        let mono_light = BadgeStyle {
            background: BackgroundStyle::Light,
            ..BadgeStyle::default()
        };
        assert_eq!(mono_light.icon_color(false), Color::BLACK);

        let colored = BadgeStyle {
            icon: IconStyle::Colored,
            ..BadgeStyle::default()
        };
        assert_eq!(colored.icon_color(true), MUTED_ICON);
        assert_eq!(colored.icon_color(false), UNMUTED_ICON);
    }

    #[test]
    fn percent_to_alpha_truncates() {
        assert_eq!(percent_to_alpha(0), 0);
        assert_eq!(percent_to_alpha(50), 127);
        assert_eq!(percent_to_alpha(100), 255);
        assert_eq!(percent_to_alpha(250), 255);
    }
}
