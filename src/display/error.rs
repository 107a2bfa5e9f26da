//! Errors from the display connection.

use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

#[derive(Debug, Error)]
pub enum DisplayError {
    /// No X server could be reached.
    #[error("cannot open display: {0}")]
    Connect(#[from] ConnectError),

    /// The connection broke while sending or receiving.
    #[error("X11 connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The server answered a request with an error.
    #[error("X11 request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("X11 request failed: {0}")]
    ReplyOrId(#[from] ReplyOrIdError),

    #[error("invalid display dimensions {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// The root visual is not a 24-bit TrueColor visual with 32-bit pixels.
    #[error("unsupported visual: {0}")]
    UnsupportedVisual(String),

    /// A query returned something unusable.
    #[error("query failed: {0}")]
    Query(String),

    #[error("waiting for the display failed: {0}")]
    Io(#[from] std::io::Error),
}
