//! Background fill / blend mode.

use serde::{Deserialize, Serialize};

/// How the area behind the clock block is prepared and how text is applied.
///
/// `Solid` and `Copy` draw text normally on top of the prepared background;
/// the remaining six modes stamp the text through a blend operator onto the
/// desktop image instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    /// Fill with `bg_color`
    #[default]
    Solid,
    /// Copy the desktop wallpaper (or live root content) behind the text
    Copy,
    /// Difference blend of the text color against the wallpaper
    Invert,
    /// Multiply blend
    Multiply,
    /// Screen blend
    Screen,
    /// Overlay blend
    Overlay,
    /// Darken blend
    Darken,
    /// Lighten blend
    Lighten,
}

impl BackgroundMode {
    /// Whether text is composited through a blend operator in this mode.
    pub fn is_blend(self) -> bool {
        !matches!(self, BackgroundMode::Solid | BackgroundMode::Copy)
    }

    /// Whether the desktop image has to be sourced before drawing.
    pub fn needs_wallpaper(self) -> bool {
        self != BackgroundMode::Solid
    }

    /// All available modes, in configuration order.
    pub fn all() -> &'static [BackgroundMode] {
        &[
            BackgroundMode::Solid,
            BackgroundMode::Copy,
            BackgroundMode::Invert,
            BackgroundMode::Multiply,
            BackgroundMode::Screen,
            BackgroundMode::Overlay,
            BackgroundMode::Darken,
            BackgroundMode::Lighten,
        ]
    }
}
