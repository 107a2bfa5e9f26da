//! Resolving font names and single codepoints to faces.

use fontdb::{Database, FaceInfo};

use super::loader;
use super::pattern::FontPattern;
use super::types::ScaledFace;
use crate::error::FontError;
use crate::face::Face;

/// Source of faces for a [`FontSet`](super::FontSet).
///
/// [`SystemFontMatcher`] is the real implementation; tests use the fakes in
/// `crate::testing`.
pub trait FontMatcher {
    /// Open the face named by `pattern`.
    fn open(&mut self, pattern: &FontPattern) -> Result<Box<dyn Face>, FontError>;

    /// Find a scalable face that renders `codepoint`, as close in style to
    /// `base` as possible. `None` when nothing installed covers it.
    fn match_codepoint(&mut self, base: &FontPattern, codepoint: u32) -> Option<Box<dyn Face>>;
}

/// Matches against the fonts installed on the system, via `fontdb`.
pub struct SystemFontMatcher {
    db: Database,
}

impl Default for SystemFontMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFontMatcher {
    /// Create a matcher over all system fonts.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::info!("Loaded {} system fonts", db.len());
        Self::with_database(db)
    }

    pub fn with_database(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Ranking for fallback candidates: preferred family first, then slant,
    /// then weight distance.
    fn rank(base: &FontPattern, face: &FaceInfo) -> (bool, bool, u16) {
        let family_miss = match base.family.as_deref() {
            Some(family) => !face
                .families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family)),
            None => true,
        };
        let slant_miss = (face.style != fontdb::Style::Normal) != base.italic;
        (family_miss, slant_miss, face.weight.0.abs_diff(base.weight))
    }
}

impl FontMatcher for SystemFontMatcher {
    fn open(&mut self, pattern: &FontPattern) -> Result<Box<dyn Face>, FontError> {
        let (name, data) = loader::load_font_from_db(&mut self.db, pattern)
            .ok_or_else(|| FontError::NotFound(pattern.spec().to_string()))?;
        log::info!(
            "Loaded font '{}' for '{}' at {:.1}px",
            name,
            pattern.spec(),
            pattern.size_px
        );
        Ok(Box::new(ScaledFace::new(name, data, pattern.size_px)))
    }

    fn match_codepoint(&mut self, base: &FontPattern, codepoint: u32) -> Option<Box<dyn Face>> {
        let mut candidates: Vec<&FaceInfo> = self.db.faces().collect();
        candidates.sort_by_key(|face| Self::rank(base, face));

        let id = candidates
            .into_iter()
            .map(|face| face.id)
            .find(|&id| loader::face_covers(&self.db, id, codepoint))?;

        let (name, data) = loader::load_face_by_id(&mut self.db, id)?;
        log::debug!(
            "Fallback font '{}' covers U+{:04X} for '{}'",
            name,
            codepoint,
            base.spec()
        );
        Some(Box::new(ScaledFace::new(name, data, base.size_px)))
    }
}
