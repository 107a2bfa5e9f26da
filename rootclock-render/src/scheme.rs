//! Foreground/background/border color triples.

use rootclock_config::{Color, Palette};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub fg: Color,
    pub bg: Color,
    pub border: Color,
}

impl ColorScheme {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg, border: bg }
    }
}

/// The three schemes a frame is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schemes {
    /// Foreground is the background color, used for region fills.
    pub background: ColorScheme,
    pub time: ColorScheme,
    pub date: ColorScheme,
}

impl From<Palette> for Schemes {
    fn from(palette: Palette) -> Self {
        let bg = palette.background;
        Self {
            background: ColorScheme::new(bg, bg),
            time: ColorScheme::new(palette.time, bg),
            date: ColorScheme::new(palette.date, bg),
        }
    }
}
