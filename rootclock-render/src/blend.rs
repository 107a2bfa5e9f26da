//! Separable blend operators.
//!
//! These follow the PDF separable blend formulas (the ones the X RENDER
//! extension implements) for an opaque source over an opaque destination with
//! mask coverage `m`:
//!
//! ```text
//! result = (1 - m) * D + m * B(D, S)
//! ```

use rootclock_config::{BackgroundMode, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    Difference,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
}

impl BlendOp {
    /// The operator a background mode composites text with.
    ///
    /// `Invert` maps to `Difference`, not a bitwise inversion: a white text
    /// color inverts the wallpaper under the glyphs, other colors shift it.
    pub fn for_mode(mode: BackgroundMode) -> Option<BlendOp> {
        match mode {
            BackgroundMode::Solid | BackgroundMode::Copy => None,
            BackgroundMode::Invert => Some(BlendOp::Difference),
            BackgroundMode::Multiply => Some(BlendOp::Multiply),
            BackgroundMode::Screen => Some(BlendOp::Screen),
            BackgroundMode::Overlay => Some(BlendOp::Overlay),
            BackgroundMode::Darken => Some(BlendOp::Darken),
            BackgroundMode::Lighten => Some(BlendOp::Lighten),
        }
    }

    /// `B(d, s)` for one 8-bit channel.
    #[inline]
    pub fn channel(self, d: u8, s: u8) -> u8 {
        let (d32, s32) = (u32::from(d), u32::from(s));
        match self {
            BlendOp::Difference => d.abs_diff(s),
            BlendOp::Multiply => div255(d32 * s32) as u8,
            BlendOp::Screen => (d32 + s32 - div255(d32 * s32)) as u8,
            BlendOp::Overlay => {
                if 2 * d32 <= 255 {
                    div255(2 * s32 * d32) as u8
                } else {
                    (255 - div255(2 * (255 - s32) * (255 - d32))) as u8
                }
            }
            BlendOp::Darken => d.min(s),
            BlendOp::Lighten => d.max(s),
        }
    }

    /// Blend `src` into the `0x00RRGGBB` pixel `dst` with coverage `m`.
    #[inline]
    pub fn pixel(self, dst: u32, src: Color, m: u8) -> u32 {
        if m == 0 {
            return dst;
        }
        let d = Color::from_pixel(dst);
        Color::new(
            mix(d.r, self.channel(d.r, src.r), m),
            mix(d.g, self.channel(d.g, src.g), m),
            mix(d.b, self.channel(d.b, src.b), m),
        )
        .to_pixel()
    }
}

/// `(1 - m) * d + m * b` in 8-bit fixed point.
#[inline]
pub fn mix(d: u8, b: u8, m: u8) -> u8 {
    let m = u32::from(m);
    div255(u32::from(d) * (255 - m) + u32::from(b) * m) as u8
}

/// Rounded `x / 255` for `x <= 255 * 255 * 2`.
#[inline]
fn div255(x: u32) -> u32 {
    let t = x + 128;
    (t + (t >> 8)) >> 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_is_difference() {
        assert_eq!(
            BlendOp::for_mode(BackgroundMode::Invert),
            Some(BlendOp::Difference)
        );
        assert_eq!(BlendOp::for_mode(BackgroundMode::Solid), None);
        assert_eq!(BlendOp::for_mode(BackgroundMode::Copy), None);
    }

    #[test]
    fn test_every_blend_mode_has_an_operator() {
        for &mode in BackgroundMode::all() {
            assert_eq!(BlendOp::for_mode(mode).is_some(), mode.is_blend(), "{mode:?}");
        }
    }

    #[test]
    fn test_difference_with_white_inverts() {
        let white = Color::WHITE;
        assert_eq!(BlendOp::Difference.pixel(0x000000, white, 255), 0xFFFFFF);
        assert_eq!(BlendOp::Difference.pixel(0x336699, white, 255), 0xCC9966);
    }

    #[test]
    fn test_identities() {
        let px = 0x80_40_C0;
        assert_eq!(BlendOp::Multiply.pixel(px, Color::WHITE, 255), px);
        assert_eq!(BlendOp::Screen.pixel(px, Color::BLACK, 255), px);
        assert_eq!(BlendOp::Darken.pixel(px, Color::WHITE, 255), px);
        assert_eq!(BlendOp::Lighten.pixel(px, Color::BLACK, 255), px);
    }

    #[test]
    fn test_multiply_and_screen_extremes() {
        assert_eq!(BlendOp::Multiply.pixel(0xFFFFFF, Color::BLACK, 255), 0x000000);
        assert_eq!(BlendOp::Screen.pixel(0x000000, Color::WHITE, 255), 0xFFFFFF);
    }

    #[test]
    fn test_overlay_keeps_destination_extremes() {
        let s = Color::new(200, 50, 128);
        assert_eq!(BlendOp::Overlay.pixel(0x000000, s, 255), 0x000000);
        assert_eq!(BlendOp::Overlay.pixel(0xFFFFFF, s, 255), 0xFFFFFF);
        // Mid-grey destination: 2 * s * d with d just under one half
        assert_eq!(BlendOp::Overlay.channel(127, 100), 100);
    }

    #[test]
    fn test_zero_coverage_leaves_destination() {
        for op in [
            BlendOp::Difference,
            BlendOp::Multiply,
            BlendOp::Screen,
            BlendOp::Overlay,
            BlendOp::Darken,
            BlendOp::Lighten,
        ] {
            assert_eq!(op.pixel(0x123456, Color::WHITE, 0), 0x123456);
        }
    }

    #[test]
    fn test_partial_coverage_interpolates() {
        // Half coverage of white-difference over black lands mid-grey
        let px = BlendOp::Difference.pixel(0x000000, Color::WHITE, 128);
        assert_eq!(Color::from_pixel(px), Color::new(128, 128, 128));
    }
}
