//! Font chains with on-demand fallback for full Unicode coverage.
//!
//! This module provides font loading and the fallback chain the shaper walks.
//! It supports:
//! - Fontconfig-style font names with style and size
//! - An ordered list of configured fonts per line of text
//! - Fallback fonts appended when a codepoint needs one
//! - A per-chain cache of codepoints no installed font covers

mod loader;
mod matcher;
mod pattern;
mod types;

use crate::absence::GlyphAbsenceCache;
use crate::error::FontError;
use crate::face::Face;

pub use matcher::{FontMatcher, SystemFontMatcher};
pub use pattern::{DEFAULT_DPI, DEFAULT_POINT_SIZE, FontPattern};
pub use types::{FontData, ScaledFace};

/// One entry of a [`FontSet`].
pub struct Font {
    face: Box<dyn Face>,
    /// The parsed name, for fonts loaded from the config. Fallbacks found by
    /// codepoint matching have none.
    pattern: Option<FontPattern>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("face", &self.face.name())
            .field("pattern", &self.pattern.as_ref().map(FontPattern::spec))
            .finish()
    }
}

impl Font {
    pub fn new(face: Box<dyn Face>, pattern: Option<FontPattern>) -> Self {
        Self { face, pattern }
    }

    pub fn face(&self) -> &dyn Face {
        self.face.as_ref()
    }

    pub fn pattern(&self) -> Option<&FontPattern> {
        self.pattern.as_ref()
    }

    /// Line height in pixels.
    pub fn height(&self) -> u32 {
        self.face.height()
    }
}

/// The fallback chain for one line of text.
///
/// Indices are stable: index 0 is the primary font and the chain only ever
/// grows by [`push`](Self::push). The absence cache and the lazily measured
/// ellipsis/replacement widths belong to the chain because they depend on
/// which fonts it holds.
#[derive(Debug)]
pub struct FontSet {
    fonts: Vec<Font>,
    primary_pattern: FontPattern,
    pub(crate) absent: GlyphAbsenceCache,
    pub(crate) ellipsis_width: Option<u32>,
    pub(crate) invalid_width: Option<u32>,
}

impl FontSet {
    /// A chain holding only `primary`.
    pub fn new(primary: Box<dyn Face>, pattern: FontPattern) -> Self {
        Self {
            fonts: vec![Font::new(primary, Some(pattern.clone()))],
            primary_pattern: pattern,
            absent: GlyphAbsenceCache::new(),
            ellipsis_width: None,
            invalid_width: None,
        }
    }

    /// Load every name in `specs` that resolves, in order.
    ///
    /// The first loadable name becomes the primary font. If the first name's
    /// family is not installed, the generic sans-serif family is tried in the
    /// same style before giving up on it. Names that fail to parse or load are
    /// skipped with a warning.
    ///
    /// # Errors
    /// [`FontError::EmptyChain`] when no name could be loaded.
    pub fn load(
        matcher: &mut dyn FontMatcher,
        specs: &[String],
        dpi: f32,
    ) -> Result<Self, FontError> {
        let mut fonts: Vec<Font> = Vec::new();

        for (i, spec) in specs.iter().enumerate() {
            let pattern = match FontPattern::parse_with_dpi(spec, dpi) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };

            let opened = match matcher.open(&pattern) {
                Ok(face) => Ok(face),
                Err(e) if i == 0 && pattern.family.is_some() => {
                    log::warn!("{}, trying the default sans-serif family", e);
                    matcher.open(&pattern.without_family())
                }
                Err(e) => Err(e),
            };

            match opened {
                Ok(face) => fonts.push(Font::new(face, Some(pattern))),
                Err(e) => log::warn!("{}", e),
            }
        }

        let primary_pattern = fonts
            .first()
            .and_then(|font| font.pattern.clone())
            .ok_or_else(|| FontError::EmptyChain(specs.to_vec()))?;

        Ok(Self {
            fonts,
            primary_pattern,
            absent: GlyphAbsenceCache::new(),
            ellipsis_width: None,
            invalid_width: None,
        })
    }

    /// Append a fallback face, returning its index.
    pub fn push(&mut self, face: Box<dyn Face>) -> usize {
        self.fonts.push(Font::new(face, None));
        self.fonts.len() - 1
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Always false; a chain has at least its primary font.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Font> {
        self.fonts.get(index)
    }

    pub fn primary(&self) -> &Font {
        &self.fonts[0]
    }

    /// Pattern of the primary font, used to synthesise fallback queries.
    pub fn primary_pattern(&self) -> &FontPattern {
        &self.primary_pattern
    }

    pub fn iter(&self) -> impl Iterator<Item = &Font> {
        self.fonts.iter()
    }

    /// Line height of the primary font.
    pub fn height(&self) -> u32 {
        self.primary().height()
    }

    /// Index of the first font in the chain with a glyph for `codepoint`.
    pub fn find(&self, codepoint: u32) -> Option<usize> {
        self.fonts
            .iter()
            .position(|font| font.face.has_glyph(codepoint))
    }

    pub fn absent(&self) -> &GlyphAbsenceCache {
        &self.absent
    }

    /// Face at `index`, the primary face for an out-of-range index.
    pub(crate) fn face(&self, index: usize) -> &dyn Face {
        self.fonts
            .get(index)
            .unwrap_or_else(|| self.primary())
            .face()
    }
}
