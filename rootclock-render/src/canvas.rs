//! Client-side pixel buffer covering the whole virtual display.
//!
//! Every frame is assembled here (background, then text) and only finished
//! regions are copied to the draw target, so nothing half-drawn is ever
//! visible.

use rootclock_config::Color;
use rootclock_fonts::{GlyphBitmap, GlyphSink};

use crate::blend::{BlendOp, mix};
use crate::error::RenderError;
use crate::geometry::{MAX_DIMENSION, Rect};
use crate::mask::AlphaMask;

/// `0x00RRGGBB` pixels, row-major, no padding.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

fn check_size(width: u32, height: u32) -> Result<(), RenderError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION as u32 || height > MAX_DIMENSION as u32
    {
        return Err(RenderError::InvalidSize { width, height });
    }
    Ok(())
}

impl Canvas {
    /// A black canvas of the given size.
    ///
    /// # Errors
    /// [`RenderError::InvalidSize`] for a zero dimension or one above 32767.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        check_size(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        })
    }

    /// Reallocate for a new display size. Contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        check_size(width, height)?;
        log::debug!(
            "Resizing canvas {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize];
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = rect.intersect(&self.bounds()) else {
            return;
        };
        let px = color.to_pixel();
        for y in r.y..r.bottom() {
            let start = self.index(r.x, y);
            self.pixels[start..start + r.width as usize].fill(px);
        }
    }

    /// Copy a `rect`-sized block of pixels (row-major) into `rect`.
    ///
    /// Rows and columns outside the canvas are skipped. A short `src` fills
    /// as many rows as it holds.
    pub fn write_rect(&mut self, rect: Rect, src: &[u32]) {
        let Some(clip) = rect.intersect(&self.bounds()) else {
            return;
        };
        let src_stride = rect.width as usize;
        for y in clip.y..clip.bottom() {
            let from = (y - rect.y) as usize * src_stride + (clip.x - rect.x) as usize;
            let Some(row) = src.get(from..from + clip.width as usize) else {
                break;
            };
            let start = self.index(clip.x, y);
            self.pixels[start..start + row.len()].copy_from_slice(row);
        }
    }

    /// Copy out the pixels of `rect`, clipped to the canvas.
    ///
    /// Returns the clipped rectangle and its pixels, row-major.
    pub fn read_rect(&self, rect: Rect) -> Option<(Rect, Vec<u32>)> {
        let clip = rect.intersect(&self.bounds())?;
        let mut out = Vec::with_capacity(clip.area());
        for y in clip.y..clip.bottom() {
            let start = self.index(clip.x, y);
            out.extend_from_slice(&self.pixels[start..start + clip.width as usize]);
        }
        Some((clip, out))
    }

    /// A sink that paints glyphs in `color`, clipped to `clip`.
    pub fn painter(&mut self, color: Color, clip: Rect) -> Painter<'_> {
        let clip = clip.intersect(&self.bounds()).unwrap_or_default();
        Painter {
            canvas: self,
            color,
            clip,
        }
    }

    /// Stamp `color` through `mask` placed at `(x, y)` using `op`.
    pub fn composite(&mut self, x: i32, y: i32, mask: &AlphaMask, color: Color, op: BlendOp) {
        let area = Rect::new(x, y, mask.width() as i32, mask.height() as i32);
        let Some(clip) = area.intersect(&self.bounds()) else {
            return;
        };
        for cy in clip.y..clip.bottom() {
            let row = mask.row((cy - y) as u32);
            for cx in clip.x..clip.right() {
                let m = row[(cx - x) as usize];
                if m == 0 {
                    continue;
                }
                let idx = self.index(cx, cy);
                self.pixels[idx] = op.pixel(self.pixels[idx], color, m);
            }
        }
    }
}

/// Paints glyph coverage straight onto a [`Canvas`].
pub struct Painter<'a> {
    canvas: &'a mut Canvas,
    color: Color,
    clip: Rect,
}

impl GlyphSink for Painter<'_> {
    fn draw_glyph(&mut self, x: i32, baseline: i32, _codepoint: u32, glyph: &GlyphBitmap) {
        let area = Rect::new(
            x + glyph.left,
            baseline - glyph.top,
            glyph.width as i32,
            glyph.height as i32,
        );
        let Some(r) = area.intersect(&self.clip) else {
            return;
        };
        let c = self.color;
        for py in r.y..r.bottom() {
            for px in r.x..r.right() {
                let g = glyph.at((px - area.x) as u32, (py - area.y) as u32);
                if g == 0 {
                    continue;
                }
                let idx = self.canvas.index(px, py);
                let d = Color::from_pixel(self.canvas.pixels[idx]);
                self.canvas.pixels[idx] =
                    Color::new(mix(d.r, c.r, g), mix(d.g, c.g, g), mix(d.b, c.b, g)).to_pixel();
            }
        }
    }
}
