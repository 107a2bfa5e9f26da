//! Software rendering for the rootclock desktop clock.
//!
//! This crate provides the drawing half of the clock:
//!
//! - A client-side [`Canvas`] covering the whole display
//! - PDF separable blend operators and 8-bit coverage masks
//! - Blended text compositing with plain-text fallback
//! - Layout of the time/date block inside each monitor region
//! - The per-region draw sequence behind the [`Surface`] seam

pub mod blend;
pub mod canvas;
pub mod compositor;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mask;
pub mod region;
pub mod scheme;

// Re-export main public types
pub use blend::BlendOp;
pub use canvas::{Canvas, Painter};
pub use compositor::composite_text;
pub use error::{CompositeError, RenderError};
pub use geometry::{MAX_DIMENSION, Rect};
pub use layout::{BlockLayout, BlockStyle, LineMetrics, compute_block};
pub use mask::AlphaMask;
pub use region::{Line, RegionRenderer, Surface};
pub use scheme::{ColorScheme, Schemes};

// Re-export shared types from dependencies for convenience
pub use rootclock_config::{BackgroundMode, Color};
