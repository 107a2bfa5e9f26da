//! Blended text: render coverage into a mask, then stamp a solid color
//! through it onto whatever the canvas already holds.

use rootclock_config::Color;
use rootclock_fonts::{FontMatcher, FontSet, TextBox, TextShaper};

use crate::blend::BlendOp;
use crate::canvas::Canvas;
use crate::error::CompositeError;
use crate::geometry::{MAX_DIMENSION, Rect};
use crate::mask::AlphaMask;

/// Composite `text` into `rect` of `canvas` through `op`.
///
/// The canvas must already hold the background; nothing is filled first. The
/// text is laid out in `rect` exactly as a plain draw would lay it out, so
/// truncation and vertical centring match.
///
/// # Errors
/// Any [`CompositeError`] leaves the canvas untouched; the caller is expected
/// to fall back to drawing the text plainly.
pub fn composite_text<M: FontMatcher>(
    canvas: &mut Canvas,
    shaper: &mut TextShaper<M>,
    fonts: &mut FontSet,
    text: &str,
    rect: Rect,
    color: Color,
    op: BlendOp,
) -> Result<(), CompositeError> {
    if text.is_empty() || rect.is_empty() {
        return Err(CompositeError::EmptyText);
    }
    if rect.intersect(&canvas.bounds()).is_none() {
        return Err(CompositeError::OutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width as u32,
            height: rect.height as u32,
        });
    }
    if rect.width > MAX_DIMENSION || rect.height > MAX_DIMENSION {
        return Err(CompositeError::MaskTooLarge {
            width: rect.width as u32,
            height: rect.height as u32,
        });
    }

    let (w, h) = (rect.width as u32, rect.height as u32);
    let mut mask = AlphaMask::new(w, h)?;
    shaper.render(fonts, &mut mask, TextBox::new(0, 0, w, h), 0, text);
    canvas.composite(rect.x, rect.y, &mask, color, op);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootclock_fonts::FontPattern;
    use rootclock_fonts::testing::{FakeFace, FakeMatcher};

    fn fonts() -> FontSet {
        FontSet::new(
            Box::new(FakeFace::new("Latin", 4).covering(0x20..=0x7E)),
            FontPattern::parse("Latin:pixelsize=20").unwrap(),
        )
    }

    #[test]
    fn test_difference_inverts_under_glyphs_only() {
        let mut canvas = Canvas::new(40, 30).unwrap();
        canvas.fill_rect(canvas.bounds(), Color::new(0x33, 0x66, 0x99));
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = fonts();

        // FakeFace glyphs are solid 4x16 boxes sitting on the baseline
        let rect = Rect::new(10, 5, 8, 20);
        composite_text(
            &mut canvas,
            &mut shaper,
            &mut fonts,
            "ab",
            rect,
            Color::WHITE,
            BlendOp::Difference,
        )
        .unwrap();

        // baseline = 5 + (20 - 20) / 2 + 16 = 21, glyph rows 5..21
        assert_eq!(canvas.pixel(10, 5), Some(0xCC9966));
        assert_eq!(canvas.pixel(17, 20), Some(0xCC9966));
        assert_eq!(canvas.pixel(9, 10), Some(0x336699));
        assert_eq!(canvas.pixel(18, 10), Some(0x336699));
        assert_eq!(canvas.pixel(12, 22), Some(0x336699));
    }

    #[test]
    fn test_empty_inputs_fail() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = fonts();
        let err = composite_text(
            &mut canvas,
            &mut shaper,
            &mut fonts,
            "",
            Rect::new(0, 0, 5, 5),
            Color::WHITE,
            BlendOp::Multiply,
        );
        assert_eq!(err, Err(CompositeError::EmptyText));
        let err = composite_text(
            &mut canvas,
            &mut shaper,
            &mut fonts,
            "a",
            Rect::new(0, 0, 0, 5),
            Color::WHITE,
            BlendOp::Multiply,
        );
        assert_eq!(err, Err(CompositeError::EmptyText));
    }

    #[test]
    fn test_outside_canvas_fails() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = fonts();
        let err = composite_text(
            &mut canvas,
            &mut shaper,
            &mut fonts,
            "a",
            Rect::new(50, 50, 5, 5),
            Color::WHITE,
            BlendOp::Screen,
        );
        assert!(matches!(err, Err(CompositeError::OutOfBounds { .. })));
    }
}
