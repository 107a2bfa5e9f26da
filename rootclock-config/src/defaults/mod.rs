//! Default value functions for configuration.
//!
//! Each sub-module groups related `default_*` free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.

mod colors;
mod font;
mod layout;
mod misc;

// ── Fonts & formats ────────────────────────────────────────────────────────
pub use font::{date_fonts, date_format, dpi, show_date, time_fonts, time_format};

// ── Colors ─────────────────────────────────────────────────────────────────
pub use colors::{bg_color, date_color, time_color};

// ── Block layout ───────────────────────────────────────────────────────────
pub use layout::{block_padding_x, block_padding_y, block_y_offset, line_spacing};

// ── Scheduling & misc ──────────────────────────────────────────────────────
pub use misc::refresh_sec;
