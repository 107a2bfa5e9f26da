//! Core `Config` struct and its `Default` impl.

use serde::{Deserialize, Serialize};

use crate::types::{BackgroundMode, LogLevel};

/// Everything the clock reads from `config.yaml`.
///
/// Missing fields take their value from `crate::defaults`, so a partial file
/// (or an empty one) is always valid YAML input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========================================================================
    // Background
    // ========================================================================
    /// How the area behind the block is prepared and how text is applied
    #[serde(default)]
    pub background_mode: BackgroundMode,

    /// Fill color for `solid` mode and for the solid fallback of other modes
    #[serde(default = "crate::defaults::bg_color")]
    pub bg_color: String,

    /// Horizontal padding around the text block (pixels)
    #[serde(default = "crate::defaults::block_padding_x")]
    pub block_padding_x: i32,

    /// Vertical padding around the text block (pixels)
    #[serde(default = "crate::defaults::block_padding_y")]
    pub block_padding_y: i32,

    // ========================================================================
    // Time line
    // ========================================================================
    /// Fallback chain for the time line, primary font first.
    ///
    /// Entries use fontconfig-style names, e.g. `Inter:style=Bold:size=120`.
    #[serde(default = "crate::defaults::time_fonts")]
    pub time_fonts: Vec<String>,

    #[serde(default = "crate::defaults::time_color")]
    pub time_color: String,

    /// `strftime`-style format of the time line
    #[serde(default = "crate::defaults::time_format")]
    pub time_format: String,

    // ========================================================================
    // Date line
    // ========================================================================
    #[serde(default = "crate::defaults::show_date")]
    pub show_date: bool,

    #[serde(default = "crate::defaults::date_fonts")]
    pub date_fonts: Vec<String>,

    #[serde(default = "crate::defaults::date_color")]
    pub date_color: String,

    #[serde(default = "crate::defaults::date_format")]
    pub date_format: String,

    // ========================================================================
    // Scheduling & layout
    // ========================================================================
    /// Refresh granularity in seconds (1 = every second, 60 = every minute, ...)
    #[serde(default = "crate::defaults::refresh_sec")]
    pub refresh_sec: u32,

    /// Shift of the whole block after centering (pixels, positive = down)
    #[serde(default = "crate::defaults::block_y_offset")]
    pub block_y_offset: i32,

    /// Gap between the time and date lines (pixels)
    #[serde(default = "crate::defaults::line_spacing")]
    pub line_spacing: i32,

    /// Resolution used to turn point sizes into pixel sizes
    #[serde(default = "crate::defaults::dpi")]
    pub dpi: f32,

    /// Locale for day and month names (e.g. `de_DE`); `None` reads the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background_mode: BackgroundMode::default(),
            bg_color: crate::defaults::bg_color(),
            block_padding_x: crate::defaults::block_padding_x(),
            block_padding_y: crate::defaults::block_padding_y(),
            time_fonts: crate::defaults::time_fonts(),
            time_color: crate::defaults::time_color(),
            time_format: crate::defaults::time_format(),
            show_date: crate::defaults::show_date(),
            date_fonts: crate::defaults::date_fonts(),
            date_color: crate::defaults::date_color(),
            date_format: crate::defaults::date_format(),
            refresh_sec: crate::defaults::refresh_sec(),
            block_y_offset: crate::defaults::block_y_offset(),
            line_spacing: crate::defaults::line_spacing(),
            dpi: crate::defaults::dpi(),
            locale: None,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background_mode(mut self, mode: BackgroundMode) -> Self {
        self.background_mode = mode;
        self
    }

    pub fn with_show_date(mut self, show: bool) -> Self {
        self.show_date = show;
        self
    }

    pub fn with_refresh_sec(mut self, secs: u32) -> Self {
        self.refresh_sec = secs;
        self
    }

    pub fn with_padding(mut self, x: i32, y: i32) -> Self {
        self.block_padding_x = x;
        self.block_padding_y = y;
        self
    }

    /// Whether the date line participates in layout and drawing.
    pub fn date_enabled(&self) -> bool {
        self.show_date && !self.date_fonts.is_empty()
    }
}
