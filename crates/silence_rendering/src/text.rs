//! Label measurement and rasterization.

use std::sync::Arc;

use crate::error::RenderResult;
use crate::types::{Color, Rectangle};

pub const FONT_FAMILY: &str = "Segoe UI, Arial, sans-serif";

/// Measures the horizontal advance of a single line of text.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> f32;
}

/// Text engine backed by `usvg` layout and the system font database.
#[derive(Clone)]
pub struct SvgTextEngine {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgTextEngine {
    /// Create an engine with system fonts loaded.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Create an engine with no fonts; labels measure as zero width and draw nothing.
    pub fn empty() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    fn options(&self) -> usvg::Options {
        usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        }
    }

    fn text_svg(text: &str, font_size: f32, color: Color, frame: Rectangle) -> String {
        // Baseline sits slightly below the vertical center for Latin text.
        let baseline = frame.y as f32 + frame.height as f32 / 2.0 + font_size * 0.35;
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><text x="{x}" y="{baseline}" font-family="{FONT_FAMILY}" font-size="{font_size}" fill="{fill}">{body}</text></svg>"#,
            w = (frame.right()).max(1),
            h = (frame.bottom()).max(1),
            x = frame.x,
            fill = color.to_hex(),
            body = escape_xml(text),
        )
    }

    /// Parse the label into a render tree positioned inside `frame`.
    pub fn layout(
        &self,
        text: &str,
        font_size: f32,
        color: Color,
        frame: Rectangle,
    ) -> RenderResult<usvg::Tree> {
        let svg = Self::text_svg(text, font_size, color, frame);
        Ok(usvg::Tree::from_str(&svg, &self.options())?)
    }
}

impl TextMeasurer for SvgTextEngine {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let frame = Rectangle::new(0, 0, 4096, (font_size * 2.0).ceil() as i32);
        let Ok(tree) = self.layout(text, font_size, Color::BLACK, frame) else {
            return 0.0;
        };

        if !tree.root().has_children() {
            return 0.0;
        }

        tree.root().abs_bounding_box().right().max(0.0)
    }
}

impl std::fmt::Debug for SvgTextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgTextEngine")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

/// Deterministic measurer: every character advances `em` times the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasurer {
    pub em: f32,
}

impl FixedAdvanceMeasurer {
    pub const fn new(em: f32) -> Self {
        Self { em }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.em
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_advance_scales_with_font_size() {
        let m = FixedAdvanceMeasurer::new(0.5);
        assert_eq!(m.measure("abcd", 14.0), 28.0);
        assert_eq!(m.measure("abcd", 28.0), 56.0);
        assert_eq!(m.measure("", 28.0), 0.0);
    }

    #[test]
    fn empty_font_database_measures_zero() {
        let engine = SvgTextEngine::empty();
        assert_eq!(engine.face_count(), 0);
        assert_eq!(engine.measure("Microphone is muted", 14.0), 0.0);
    }

    #[test]
    fn label_markup_is_escaped() {
        let svg = SvgTextEngine::text_svg("a<b & \"c\"", 14.0, Color::WHITE, Rectangle::new(36, 0, 80, 48));
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(svg.contains(r#"x="36""#));
        assert!(usvg::Tree::from_str(&svg, &usvg::Options::default()).is_ok());
    }
}
