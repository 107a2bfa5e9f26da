//! Font loading utilities for the system font database.

use fontdb::{Database, Family, ID, Query};

use super::pattern::FontPattern;
use super::types::FontData;

/// Load the face best matching `pattern` from the system font database.
///
/// A pattern without a family asks for the database's sans-serif family.
///
/// # Returns
/// `Some((family_name, FontData))` if a face was found and parsed.
pub fn load_font_from_db(db: &mut Database, pattern: &FontPattern) -> Option<(String, FontData)> {
    let family = match pattern.family.as_deref() {
        Some(name) => Family::Name(name),
        None => Family::SansSerif,
    };
    let query = Query {
        families: &[family],
        weight: pattern.fontdb_weight(),
        style: pattern.fontdb_style(),
        ..Query::default()
    };

    let id = db.query(&query)?;
    load_face_by_id(db, id)
}

/// Load the face with a known database ID.
pub fn load_face_by_id(db: &mut Database, id: ID) -> Option<(String, FontData)> {
    let name = db
        .face(id)
        .and_then(|info| info.families.first())
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| "unknown".to_string());

    // SAFETY: make_shared_face_data is safe when called with a valid ID from the database
    let (data, face_index) = unsafe { db.make_shared_face_data(id)? };

    // Pass face_index for TTC (TrueType Collection) files where multiple fonts
    // share the same data but have different face indices.
    let bytes = data.as_ref().as_ref();
    let font = FontData::new_with_index(bytes.to_vec(), face_index as usize)?;
    Some((name, font))
}

/// Whether the face `id` maps `codepoint` to a real glyph, read without
/// copying the face data.
pub fn face_covers(db: &Database, id: ID, codepoint: u32) -> bool {
    db.with_face_data(id, |data, index| {
        swash::FontRef::from_index(data, index as usize)
            .map(|font| font.charmap().map(codepoint) != 0)
            .unwrap_or(false)
    })
    .unwrap_or(false)
}
