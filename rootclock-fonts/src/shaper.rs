//! Single-line text shaping over a fallback chain.
//!
//! The shaper walks a byte string, groups consecutive codepoints that the
//! same font renders into runs, and either measures them or hands their glyphs
//! to a [`GlyphSink`]. A codepoint no font in the chain covers triggers one
//! fallback query; a successful match is appended to the chain for good, a
//! failure is remembered in the chain's absence cache and drawn with the
//! primary font.
//!
//! When the text does not fit, the cut point is found before anything is
//! painted: the longest prefix that still leaves room for `"..."` is drawn,
//! followed directly by the ellipsis. Invalid UTF-8 ends the current run and
//! is drawn as one U+FFFD glyph.

use crate::face::{Face, GlyphBitmap};
use crate::font_manager::{FontMatcher, FontSet};
use crate::utf8::{self, decode};

const ELLIPSIS: &str = "...";
const REPLACEMENT: &str = "\u{FFFD}";

/// Destination for rasterized glyphs.
pub trait GlyphSink {
    /// Paint `glyph` with its origin at pen position `x` on baseline `baseline`.
    fn draw_glyph(&mut self, x: i32, baseline: i32, codepoint: u32, glyph: &GlyphBitmap);
}

/// The rectangle a line is drawn into. Text is vertically centred in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl TextBox {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Widths of the fixed strings, zero while they are being measured.
#[derive(Debug, Clone, Copy, Default)]
struct FixedWidths {
    ellipsis: u32,
    invalid: u32,
}

/// How much of a line fits its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    Whole,
    /// Byte length and width of the prefix drawn before the ellipsis.
    Prefix(usize, u32),
    Nothing,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    End,
    Overflow,
    Invalid,
    Switch(usize),
    Missing(u32),
}

/// Measures and draws lines of text, resolving fallback fonts through `M`.
pub struct TextShaper<M> {
    matcher: M,
}

impl<M: FontMatcher> TextShaper<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    pub fn matcher_mut(&mut self) -> &mut M {
        &mut self.matcher
    }

    /// Width of `text` in pixels.
    pub fn measure(&mut self, fonts: &mut FontSet, text: impl AsRef<[u8]>) -> u32 {
        let widths = self.fixed_widths(fonts);
        let end = self.shape(fonts, None, TextBox::new(0, 0, u32::MAX, 0), text.as_ref(), widths);
        end.max(0) as u32
    }

    /// Width of `text`, never more than `clamp`.
    pub fn measure_clamped(
        &mut self,
        fonts: &mut FontSet,
        text: impl AsRef<[u8]>,
        clamp: u32,
    ) -> u32 {
        let widths = self.fixed_widths(fonts);
        let end = self.shape(fonts, None, TextBox::new(0, 0, clamp, 0), text.as_ref(), widths);
        (end.max(0) as u32).min(clamp)
    }

    /// Draw `text` into `bx`, indented by `lpad`.
    ///
    /// Returns the x coordinate just past the box, the way the caller chains
    /// several boxes on one line.
    pub fn render(
        &mut self,
        fonts: &mut FontSet,
        sink: &mut dyn GlyphSink,
        bx: TextBox,
        lpad: u32,
        text: impl AsRef<[u8]>,
    ) -> i32 {
        if bx.w == 0 {
            return bx.x;
        }
        if bx.w < lpad {
            return bx.x + bx.w as i32;
        }
        let widths = self.fixed_widths(fonts);
        let text = until_nul(text.as_ref());
        let inner = TextBox::new(bx.x + lpad as i32, bx.y, bx.w - lpad, bx.h);
        let unbounded = TextBox { w: u32::MAX, ..inner };

        match self.fit(fonts, text, inner.w, widths) {
            Fit::Whole => {
                self.shape(fonts, Some(sink), unbounded, text, widths);
            }
            Fit::Prefix(len, width) => {
                self.shape(fonts, Some(&mut *sink), unbounded, &text[..len], widths);
                draw_fixed(fonts, sink, inner.x + width as i32, inner.y, inner.h, ELLIPSIS);
            }
            Fit::Nothing => {}
        }
        bx.x + bx.w as i32
    }

    /// Decide how much of `text` is drawn in `limit` pixels.
    fn fit(&mut self, fonts: &mut FontSet, text: &[u8], limit: u32, widths: FixedWidths) -> Fit {
        if self.width_of(fonts, text, widths) <= limit {
            return Fit::Whole;
        }
        if widths.ellipsis > limit {
            return Fit::Nothing;
        }

        let mut best = (0, 0);
        for (offset, d) in utf8::decode_all(text) {
            let end = offset + d.len;
            let width = self.width_of(fonts, &text[..end], widths);
            if width.saturating_add(widths.ellipsis) > limit {
                break;
            }
            best = (end, width);
        }
        Fit::Prefix(best.0, best.1)
    }

    fn width_of(&mut self, fonts: &mut FontSet, text: &[u8], widths: FixedWidths) -> u32 {
        let end = self.shape(fonts, None, TextBox::new(0, 0, u32::MAX, 0), text, widths);
        end.max(0) as u32
    }

    /// Measure `"..."` and U+FFFD once per chain.
    fn fixed_widths(&mut self, fonts: &mut FontSet) -> FixedWidths {
        let unbounded = TextBox::new(0, 0, u32::MAX, 0);
        if fonts.ellipsis_width.is_none() {
            let w = self.shape(fonts, None, unbounded, ELLIPSIS.as_bytes(), FixedWidths::default());
            fonts.ellipsis_width = Some(w.max(0) as u32);
        }
        if fonts.invalid_width.is_none() {
            let w = self.shape(fonts, None, unbounded, REPLACEMENT.as_bytes(), FixedWidths::default());
            fonts.invalid_width = Some(w.max(0) as u32);
        }
        FixedWidths {
            ellipsis: fonts.ellipsis_width.unwrap_or(0),
            invalid: fonts.invalid_width.unwrap_or(0),
        }
    }

    /// The shaping loop shared by measuring and drawing.
    ///
    /// `bx.w` is the overflow limit: shaping stops at the first glyph that
    /// does not fit. Returns the pen position after the last shaped glyph,
    /// including the one that overflowed. Callers that paint pass an
    /// unbounded box.
    fn shape(
        &mut self,
        fonts: &mut FontSet,
        mut sink: Option<&mut dyn GlyphSink>,
        bx: TextBox,
        text: &[u8],
        widths: FixedWidths,
    ) -> i32 {
        let text = until_nul(text);

        let TextBox { mut x, y, mut w, h } = bx;
        let mut pos = 0;
        let mut active = 0;
        // Draw the next codepoint with the primary font without looking it up.
        let mut forced = false;

        loop {
            let run_start = pos;
            let mut run_len = 0;
            let mut ew = 0u32;
            let mut stop = Stop::End;

            while pos < text.len() {
                let d = decode(&text[pos..]);
                if !d.valid {
                    pos += d.len;
                    stop = Stop::Invalid;
                    break;
                }

                let found = if forced { Some(0) } else { fonts.find(d.codepoint) };
                let Some(index) = found else {
                    stop = Stop::Missing(d.codepoint);
                    break;
                };

                let advance = fonts.face(index).advance(d.codepoint);
                if ew.saturating_add(advance) > w {
                    x = x.saturating_add(advance as i32);
                    stop = Stop::Overflow;
                    break;
                }
                if index != active {
                    stop = Stop::Switch(index);
                    break;
                }

                pos += d.len;
                run_len += d.len;
                ew += advance;
                forced = false;
            }

            if run_len > 0 {
                if let Some(sink) = sink.as_deref_mut() {
                    let run = &text[run_start..run_start + run_len];
                    draw_run(fonts.face(active), sink, x, y, h, run);
                }
                x = x.saturating_add(ew as i32);
                w -= ew;
            }

            match stop {
                Stop::End | Stop::Overflow => break,
                Stop::Invalid => {
                    if let Some(sink) = sink.as_deref_mut() {
                        draw_fixed(fonts, sink, x, y, h, REPLACEMENT);
                    }
                    x = x.saturating_add(widths.invalid as i32);
                    w = w.saturating_sub(widths.invalid);
                }
                Stop::Switch(index) => active = index,
                Stop::Missing(codepoint) => {
                    match self.resolve(fonts, codepoint) {
                        Some(index) => active = index,
                        None => {
                            active = 0;
                            forced = true;
                        }
                    }
                }
            }
        }

        x
    }

    /// Find a font for `codepoint` outside the chain.
    ///
    /// Returns the index of the appended font, or `None` when the codepoint is
    /// (now) recorded absent.
    fn resolve(&mut self, fonts: &mut FontSet, codepoint: u32) -> Option<usize> {
        if fonts.absent.contains(codepoint) {
            return None;
        }

        let matched = self
            .matcher
            .match_codepoint(fonts.primary_pattern(), codepoint)
            .filter(|face| face.has_glyph(codepoint));

        match matched {
            Some(face) => {
                log::debug!(
                    "Appending fallback font '{}' for U+{:04X} (chain length {})",
                    face.name(),
                    codepoint,
                    fonts.len() + 1
                );
                Some(fonts.push(face))
            }
            None => {
                log::debug!("No installed font covers U+{:04X}", codepoint);
                fonts.absent.insert(codepoint);
                None
            }
        }
    }
}

fn until_nul(text: &[u8]) -> &[u8] {
    match text.iter().position(|&b| b == 0) {
        Some(nul) => &text[..nul],
        None => text,
    }
}

fn baseline(face: &dyn Face, y: i32, h: u32) -> i32 {
    y + (h as i32 - face.height() as i32) / 2 + face.ascent()
}

/// Draw one single-font run, pen starting at `x`.
fn draw_run(face: &dyn Face, sink: &mut dyn GlyphSink, x: i32, y: i32, h: u32, run: &[u8]) {
    let ty = baseline(face, y, h);
    let mut pen = x;
    for (_, d) in utf8::decode_all(run) {
        if let Some(glyph) = face.rasterize(d.codepoint) {
            sink.draw_glyph(pen, ty, d.codepoint, &glyph);
        }
        pen += face.advance(d.codepoint) as i32;
    }
}

/// Draw a short fixed string with whichever chain font has each glyph,
/// falling back to the primary font. Never queries the matcher.
fn draw_fixed(fonts: &FontSet, sink: &mut dyn GlyphSink, x: i32, y: i32, h: u32, text: &str) {
    let mut pen = x;
    for ch in text.chars() {
        let cp = u32::from(ch);
        let face = fonts.face(fonts.find(cp).unwrap_or(0));
        if let Some(glyph) = face.rasterize(cp) {
            sink.draw_glyph(pen, baseline(face, y, h), cp, &glyph);
        }
        pen += face.advance(cp) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFace, FakeMatcher, RecordingSink};

    fn latin_set(advance: u32) -> FontSet {
        FontSet::new(
            Box::new(FakeFace::new("Latin", advance).covering(0x20..=0x7E)),
            crate::font_manager::FontPattern::parse("Latin:pixelsize=20").unwrap(),
        )
    }

    #[test]
    fn test_measure_sums_advances() {
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = latin_set(10);
        assert_eq!(shaper.measure(&mut fonts, "12:34"), 50);
        assert_eq!(shaper.measure(&mut fonts, ""), 0);
    }

    #[test]
    fn test_measure_clamped() {
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = latin_set(10);
        assert_eq!(shaper.measure_clamped(&mut fonts, "abcdef", 35), 35);
        assert_eq!(shaper.measure_clamped(&mut fonts, "abc", 35), 30);
    }

    #[test]
    fn test_fixed_widths_measured_once() {
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = latin_set(7);
        shaper.measure(&mut fonts, "x");
        assert_eq!(fonts.ellipsis_width, Some(21));
        // U+FFFD is not in the fake chain; it is drawn with the primary font
        assert_eq!(fonts.invalid_width, Some(7));
    }

    #[test]
    fn test_render_returns_box_edge() {
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = latin_set(10);
        let mut sink = RecordingSink::default();
        let edge = shaper.render(&mut fonts, &mut sink, TextBox::new(5, 0, 100, 30), 0, "ab");
        assert_eq!(edge, 105);
        assert_eq!(sink.text(), "ab");
        assert_eq!(sink.xs(), vec![5, 15]);
    }

    #[test]
    fn test_render_with_zero_width_draws_nothing() {
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = latin_set(10);
        let mut sink = RecordingSink::default();
        shaper.render(&mut fonts, &mut sink, TextBox::new(0, 0, 0, 30), 0, "ab");
        assert!(sink.glyphs.is_empty());
    }

    #[test]
    fn test_lpad_shifts_pen() {
        let mut shaper = TextShaper::new(FakeMatcher::default());
        let mut fonts = latin_set(10);
        let mut sink = RecordingSink::default();
        shaper.render(&mut fonts, &mut sink, TextBox::new(0, 0, 100, 30), 8, "a");
        assert_eq!(sink.xs(), vec![8]);
    }

    #[test]
    fn test_baseline_centres_line() {
        let mut shaper = TextShaper::new(FakeMatcher::default());
        // FakeFace: ascent 16, descent 4, height 20
        let mut fonts = latin_set(10);
        let mut sink = RecordingSink::default();
        shaper.render(&mut fonts, &mut sink, TextBox::new(0, 100, 50, 40), 0, "a");
        assert_eq!(sink.glyphs[0].1, 100 + (40 - 20) / 2 + 16);
    }
}
