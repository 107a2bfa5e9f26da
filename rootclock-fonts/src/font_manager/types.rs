//! Font data types and the swash-backed [`Face`] implementation.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::sync::Arc;

use lru::LruCache;
use swash::FontRef;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;

use crate::face::{Face, GlyphBitmap};

/// Rasterized glyphs kept per face. A clock redraws the same dozen glyphs
/// every second, so this is plenty.
const GLYPH_CACHE_SIZE: usize = 256;

/// Stores font data with lifetime management.
///
/// This struct owns the font data bytes and provides a `FontRef` that can be used
/// for glyph lookups and rasterization. The `FontRef` is guaranteed to be valid
/// for the lifetime of this struct.
#[derive(Clone)]
pub struct FontData {
    /// Raw font data bytes (TTF/OTF)
    pub data: Arc<Vec<u8>>,
    /// Swash font reference for glyph operations
    pub font_ref: FontRef<'static>,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontData {
    /// Create a new FontData from bytes using face index 0.
    pub fn new(data: Vec<u8>) -> Option<Self> {
        Self::new_with_index(data, 0)
    }

    /// Create a new FontData from bytes with a specific face index.
    ///
    /// This is needed for TrueType Collection (.ttc) files where multiple
    /// font faces share the same data but have different face indices.
    pub fn new_with_index(data: Vec<u8>, face_index: usize) -> Option<Self> {
        let data_arc = Arc::new(data);

        // SAFETY: We ensure the data outlives the FontRef by storing it in an Arc.
        // The FontRef will never outlive the FontData struct because they are stored
        // together and dropped together.
        let font_ref = unsafe {
            let bytes = data_arc.as_slice();
            let static_bytes: &'static [u8] = std::mem::transmute(bytes);
            FontRef::from_index(static_bytes, face_index)?
        };

        Some(FontData {
            data: data_arc,
            font_ref,
        })
    }

    /// Whether the character map has a real glyph for `codepoint`.
    pub fn covers(&self, codepoint: u32) -> bool {
        self.font_ref.charmap().map(codepoint) != 0
    }
}

/// A [`FontData`] bound to a pixel size, with cached rasterization.
pub struct ScaledFace {
    name: String,
    font: FontData,
    size_px: f32,
    ascent: i32,
    descent: i32,
    context: RefCell<ScaleContext>,
    glyphs: RefCell<LruCache<u16, Option<Rc<GlyphBitmap>>>>,
}

impl std::fmt::Debug for ScaledFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaledFace")
            .field("name", &self.name)
            .field("size_px", &self.size_px)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .finish()
    }
}

impl ScaledFace {
    pub fn new(name: impl Into<String>, font: FontData, size_px: f32) -> Self {
        let metrics = font.font_ref.metrics(&[]).scale(size_px);
        Self {
            name: name.into(),
            size_px,
            ascent: metrics.ascent.ceil() as i32,
            descent: metrics.descent.abs().ceil() as i32,
            font,
            context: RefCell::new(ScaleContext::new()),
            glyphs: RefCell::new(LruCache::new(
                NonZeroUsize::new(GLYPH_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    fn render_glyph(&self, glyph_id: u16) -> Option<GlyphBitmap> {
        let mut context = self.context.borrow_mut();
        let mut scaler = context
            .builder(self.font.font_ref)
            .size(self.size_px)
            .hint(true)
            .build();

        let image = Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .render(&mut scaler, glyph_id)?;

        if !matches!(image.content, Content::Mask)
            || image.placement.width == 0
            || image.placement.height == 0
        {
            return None;
        }

        Some(GlyphBitmap {
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            coverage: image.data,
        })
    }
}

impl Face for ScaledFace {
    fn has_glyph(&self, codepoint: u32) -> bool {
        self.font.covers(codepoint)
    }

    fn advance(&self, codepoint: u32) -> u32 {
        let glyph_id = self.font.font_ref.charmap().map(codepoint);
        let advance = self
            .font
            .font_ref
            .glyph_metrics(&[])
            .scale(self.size_px)
            .advance_width(glyph_id);
        advance.round().max(0.0) as u32
    }

    fn ascent(&self) -> i32 {
        self.ascent
    }

    fn descent(&self) -> i32 {
        self.descent
    }

    fn rasterize(&self, codepoint: u32) -> Option<Rc<GlyphBitmap>> {
        let glyph_id = self.font.font_ref.charmap().map(codepoint);
        if let Some(cached) = self.glyphs.borrow_mut().get(&glyph_id) {
            return cached.clone();
        }
        let bitmap = self.render_glyph(glyph_id).map(Rc::new);
        self.glyphs.borrow_mut().put(glyph_id, bitmap.clone());
        bitmap
    }

    fn name(&self) -> &str {
        &self.name
    }
}
