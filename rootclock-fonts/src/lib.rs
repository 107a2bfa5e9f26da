//! Font fallback chains and text shaping for the rootclock desktop clock.
//!
//! This crate provides:
//! - A strict UTF-8 codepoint decoder that always makes progress on bad input
//! - Font loading from fontconfig-style names through the system font database
//! - Append-only fallback chains that grow when a codepoint needs a new font
//! - A small absence cache so hopeless codepoints are not re-matched every frame
//! - A single-line shaper that measures text or paints glyphs into a sink
//!
//! # Architecture
//!
//! A [`FontSet`] owns the chain of [`Font`]s for one line of text. The
//! [`TextShaper`] walks a byte string, splits it into runs per font, asks its
//! [`FontMatcher`] for new fallback fonts on demand, and hands rasterized
//! glyphs to a [`GlyphSink`] (a color painter or an alpha mask, provided by
//! the render crate).

pub mod absence;
pub mod error;
pub mod face;
pub mod font_manager;
pub mod shaper;
pub mod utf8;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types for convenience
pub use absence::GlyphAbsenceCache;
pub use error::FontError;
pub use face::{Face, GlyphBitmap};
pub use font_manager::{
    Font, FontData, FontMatcher, FontPattern, FontSet, ScaledFace, SystemFontMatcher,
};
pub use shaper::{GlyphSink, TextBox, TextShaper};
pub use utf8::{Decoded, REPLACEMENT, decode};
