//! Fakes for exercising the shaper without system fonts.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! downstream crates' tests.

use std::ops::RangeInclusive;
use std::rc::Rc;

use crate::error::FontError;
use crate::face::{Face, GlyphBitmap};
use crate::font_manager::{FontMatcher, FontPattern};
use crate::shaper::GlyphSink;

/// A face where every glyph has the same advance and a solid box bitmap.
#[derive(Debug, Clone)]
pub struct FakeFace {
    name: String,
    advance: u32,
    ascent: i32,
    descent: i32,
    ranges: Vec<RangeInclusive<u32>>,
}

impl FakeFace {
    /// A face covering nothing yet, ascent 16 and descent 4.
    pub fn new(name: impl Into<String>, advance: u32) -> Self {
        Self {
            name: name.into(),
            advance,
            ascent: 16,
            descent: 4,
            ranges: Vec::new(),
        }
    }

    pub fn covering(mut self, range: RangeInclusive<u32>) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn with_metrics(mut self, ascent: i32, descent: i32) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }
}

impl Face for FakeFace {
    fn has_glyph(&self, codepoint: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(&codepoint))
    }

    fn advance(&self, _codepoint: u32) -> u32 {
        self.advance
    }

    fn ascent(&self) -> i32 {
        self.ascent
    }

    fn descent(&self) -> i32 {
        self.descent
    }

    fn rasterize(&self, _codepoint: u32) -> Option<Rc<GlyphBitmap>> {
        let width = self.advance;
        let height = self.ascent.max(0) as u32;
        Some(Rc::new(GlyphBitmap {
            width,
            height,
            left: 0,
            top: self.ascent,
            coverage: vec![255; (width * height) as usize],
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A matcher over a fixed list of fake faces that records every query.
#[derive(Debug, Default)]
pub struct FakeMatcher {
    families: Vec<FakeFace>,
    fallbacks: Vec<FakeFace>,
    opens: Vec<Option<String>>,
    queries: Vec<u32>,
}

impl FakeMatcher {
    /// Make `face` openable by its name. A face named `sans-serif` answers
    /// patterns without a family.
    pub fn with_family(mut self, face: FakeFace) -> Self {
        self.families.push(face);
        self
    }

    /// Make `face` a candidate for codepoint matching.
    pub fn with_fallback(mut self, face: FakeFace) -> Self {
        self.fallbacks.push(face);
        self
    }

    /// Families passed to `open`, in order.
    pub fn opens(&self) -> &[Option<String>] {
        &self.opens
    }

    /// Codepoints passed to `match_codepoint`, in order.
    pub fn queries(&self) -> &[u32] {
        &self.queries
    }

    pub fn query_count(&self, codepoint: u32) -> usize {
        self.queries.iter().filter(|&&cp| cp == codepoint).count()
    }
}

impl FontMatcher for FakeMatcher {
    fn open(&mut self, pattern: &FontPattern) -> Result<Box<dyn Face>, FontError> {
        self.opens.push(pattern.family.clone());
        let wanted = pattern.family.as_deref().unwrap_or("sans-serif");
        self.families
            .iter()
            .find(|face| face.name.eq_ignore_ascii_case(wanted))
            .map(|face| Box::new(face.clone()) as Box<dyn Face>)
            .ok_or_else(|| FontError::NotFound(pattern.spec().to_string()))
    }

    fn match_codepoint(&mut self, _base: &FontPattern, codepoint: u32) -> Option<Box<dyn Face>> {
        self.queries.push(codepoint);
        self.fallbacks
            .iter()
            .find(|face| face.has_glyph(codepoint))
            .map(|face| Box::new(face.clone()) as Box<dyn Face>)
    }
}

/// A sink that records where each glyph went.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// `(pen x, baseline, codepoint)` per drawn glyph.
    pub glyphs: Vec<(i32, i32, u32)>,
}

impl RecordingSink {
    /// The drawn codepoints as a string.
    pub fn text(&self) -> String {
        self.glyphs
            .iter()
            .filter_map(|&(_, _, cp)| char::from_u32(cp))
            .collect()
    }

    /// Pen positions of the drawn glyphs.
    pub fn xs(&self) -> Vec<i32> {
        self.glyphs.iter().map(|&(x, _, _)| x).collect()
    }
}

impl GlyphSink for RecordingSink {
    fn draw_glyph(&mut self, x: i32, baseline: i32, codepoint: u32, _glyph: &GlyphBitmap) {
        self.glyphs.push((x, baseline, codepoint));
    }
}
