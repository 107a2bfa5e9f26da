//! Typed error types for rootclock-render.
//!
//! Callers at the crate boundary match on these instead of opaque strings:
//! a [`CompositeError`] only costs one region its blend effect, while most
//! [`RenderError`]s are reported and the frame continues.

use thiserror::Error;

/// Errors from creating the canvas or moving pixels to and from the display.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The display reported a size the canvas cannot represent.
    #[error("invalid display dimensions {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// The display's pixel format cannot back a drawing surface.
    #[error("failed to create drawing surface: {0}")]
    UnsupportedFormat(String),

    /// Reading the desktop image (wallpaper pixmap or root window) failed.
    #[error("cannot read desktop background: {0}")]
    Fetch(String),

    /// Copying the canvas to the draw target failed.
    #[error("cannot present region: {0}")]
    Present(String),
}

/// Reasons a blended text draw did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// Nothing to draw: empty text or a zero-sized text box.
    #[error("empty text box")]
    EmptyText,

    /// The text box lies entirely outside the canvas.
    #[error("text box ({x}, {y}) {width}x{height} is outside the canvas")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// The coverage mask could not be allocated.
    #[error("cannot allocate a {width}x{height} coverage mask")]
    MaskTooLarge { width: u32, height: u32 },
}
