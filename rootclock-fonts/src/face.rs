//! The glyph-level interface the shaper needs from a loaded font.

use std::rc::Rc;

/// An 8-bit coverage bitmap for one glyph.
///
/// `left`/`top` follow the usual convention: offset of the bitmap's top-left
/// corner from the pen position, with `top` measured upwards from the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Coverage at `(x, y)`, 0 outside the bitmap.
    #[inline]
    pub fn at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[(y * self.width + x) as usize]
    }
}

/// One font at one pixel size.
///
/// Implemented by the swash-backed `ScaledFace` for real fonts and by fakes in
/// `crate::testing`.
pub trait Face {
    /// Whether the face has a real glyph for `codepoint` (not `.notdef`).
    fn has_glyph(&self, codepoint: u32) -> bool;

    /// Horizontal advance of `codepoint` in whole pixels.
    fn advance(&self, codepoint: u32) -> u32;

    /// Pixels above the baseline.
    fn ascent(&self) -> i32;

    /// Pixels below the baseline (positive).
    fn descent(&self) -> i32;

    /// Line height, ascent plus descent.
    fn height(&self) -> u32 {
        (self.ascent() + self.descent()).max(0) as u32
    }

    /// Rasterize `codepoint`; `None` for glyphs with no outline (e.g. space).
    fn rasterize(&self, codepoint: u32) -> Option<Rc<GlyphBitmap>>;

    /// Human readable name for logs.
    fn name(&self) -> &str;
}
