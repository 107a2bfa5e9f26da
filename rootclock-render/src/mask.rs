//! 8-bit coverage masks for blended text.

use rootclock_fonts::{GlyphBitmap, GlyphSink};

use crate::blend::mix;
use crate::error::CompositeError;

/// A cleared coverage buffer the shaper renders into.
///
/// Coordinates are local to the mask; glyphs falling partly outside are
/// clipped.
#[derive(Debug)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaMask {
    /// Allocate a zeroed `width` x `height` mask.
    ///
    /// # Errors
    /// [`CompositeError::MaskTooLarge`] if the buffer cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self, CompositeError> {
        let too_large = || CompositeError::MaskTooLarge { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at `(x, y)`, 0 outside the mask.
    #[inline]
    pub fn at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y * self.width) as usize;
        &self.data[start..start + self.width as usize]
    }
}

impl GlyphSink for AlphaMask {
    fn draw_glyph(&mut self, x: i32, baseline: i32, _codepoint: u32, glyph: &GlyphBitmap) {
        let ox = x + glyph.left;
        let oy = baseline - glyph.top;
        for gy in 0..glyph.height {
            let my = oy + gy as i32;
            if my < 0 || my >= self.height as i32 {
                continue;
            }
            for gx in 0..glyph.width {
                let mx = ox + gx as i32;
                if mx < 0 || mx >= self.width as i32 {
                    continue;
                }
                let g = glyph.at(gx, gy);
                if g == 0 {
                    continue;
                }
                let idx = my as usize * self.width as usize + mx as usize;
                // OVER: a = g + a * (1 - g)
                self.data[idx] = mix(self.data[idx], 255, g);
            }
        }
    }
}
