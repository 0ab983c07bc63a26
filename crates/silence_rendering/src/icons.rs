//! Microphone glyphs as inline SVG.

use crate::types::Color;

const MIC_PATH: &str = "M12 14c1.66 0 2.99-1.34 2.99-3L15 5c0-1.66-1.34-3-3-3S9 3.34 9 5v6c0 1.66 \
1.34 3 3 3zm5.3-3c0 3-2.54 5.1-5.3 5.1S6.7 14 6.7 11H5c0 3.41 2.72 6.23 6 6.72V21h2v-3.28c3.28-.48 \
6-3.3 6-6.72h-1.7z";

const MIC_OFF_PATH: &str = "M19 11h-1.7c0 .74-.16 1.43-.43 2.05l1.23 1.23c.56-.98.9-2.09.9-3.28zm-4.02\
.17c0-.06.02-.11.02-.17V5c0-1.66-1.34-3-3-3S9 3.34 9 5v.18l5.98 5.99zM4.27 3L3 4.27l6.01 6.01V11c0 \
1.66 1.33 3 2.99 3 .22 0 .44-.03.65-.08l1.66 1.66c-.71.33-1.5.52-2.31.52-2.76 0-5.3-2.1-5.3-5.1H5c0 \
3.41 2.72 6.23 6 6.72V21h2v-3.28c.91-.13 1.77-.45 2.54-.9L19.73 21 21 19.73 4.27 3z";

/// SVG document for the microphone glyph, scaled to a `size`×`size` box.
pub fn microphone_svg(muted: bool, color: Color, size: f32) -> String {
    let path = if muted { MIC_OFF_PATH } else { MIC_PATH };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 24 24"><path fill="{fill}" d="{path}"/></svg>"#,
        fill = color.to_hex(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_and_unmuted_glyphs_differ() {
        let on = microphone_svg(false, Color::WHITE, 28.0);
        let off = microphone_svg(true, Color::WHITE, 28.0);
        assert_ne!(on, off);
        assert!(on.contains(r##"fill="#ffffff""##));
        assert!(on.contains(r#"width="28""#));
    }

    #[test]
    fn glyphs_parse() {
        for muted in [false, true] {
            let svg = microphone_svg(muted, Color::rgb(220, 53, 69), 35.0);
            assert!(usvg::Tree::from_str(&svg, &usvg::Options::default()).is_ok());
        }
    }
}
