//! Fontconfig-style font names.
//!
//! Accepts the subset of the fontconfig name syntax that font lists in the
//! config actually use:
//!
//! ```text
//! Inter:style=ExtraBold:size=120
//! monospace:pixelsize=32:bold
//! Noto Sans:weight=600:slant=italic
//! ```
//!
//! Unknown properties (`antialias=true`, `hinting=…`) are ignored.

use crate::error::FontError;

/// Point size used when a name gives neither `size=` nor `pixelsize=`.
pub const DEFAULT_POINT_SIZE: f32 = 12.0;

/// Resolution used when none is configured.
pub const DEFAULT_DPI: f32 = 96.0;

const WEIGHT_NORMAL: u16 = 400;
const WEIGHT_BOLD: u16 = 700;

#[derive(Debug, Clone, PartialEq)]
pub struct FontPattern {
    /// Family name; `None` asks for the generic sans-serif family.
    pub family: Option<String>,
    /// CSS-style weight, 100..=900.
    pub weight: u16,
    pub italic: bool,
    /// Resolved pixel size.
    pub size_px: f32,
    spec: String,
}

impl FontPattern {
    /// Parse `spec` at the default resolution.
    pub fn parse(spec: &str) -> Result<Self, FontError> {
        Self::parse_with_dpi(spec, DEFAULT_DPI)
    }

    /// Parse `spec`, converting point sizes to pixels at `dpi`.
    pub fn parse_with_dpi(spec: &str, dpi: f32) -> Result<Self, FontError> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(FontError::InvalidPattern(spec.to_string()));
        }

        let mut parts = trimmed.split(':');
        let family = parts
            .next()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let mut weight = WEIGHT_NORMAL;
        let mut italic = false;
        let mut points: Option<f32> = None;
        let mut pixels: Option<f32> = None;

        for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                // Bare constants such as `:bold` or `:italic`
                apply_style_word(part, &mut weight, &mut italic);
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "size" => points = Some(parse_size(spec, value)?),
                "pixelsize" => pixels = Some(parse_size(spec, value)?),
                "style" => {
                    for word in value.split_whitespace() {
                        apply_style_word(word, &mut weight, &mut italic);
                    }
                }
                "weight" => {
                    weight = match value.parse::<u16>() {
                        Ok(w) => w.clamp(1, 1000),
                        Err(_) => weight_for_name(value)
                            .ok_or_else(|| FontError::InvalidPattern(spec.to_string()))?,
                    }
                }
                "slant" => {
                    italic = match value.to_ascii_lowercase().as_str() {
                        "roman" | "0" => false,
                        "italic" | "oblique" | "100" | "110" => true,
                        _ => return Err(FontError::InvalidPattern(spec.to_string())),
                    }
                }
                other => log::debug!("Ignoring font property '{}' in '{}'", other, spec),
            }
        }

        let size_px = match (pixels, points) {
            (Some(px), _) => px,
            (None, Some(pt)) => pt * dpi / 72.0,
            (None, None) => DEFAULT_POINT_SIZE * dpi / 72.0,
        };

        Ok(Self {
            family,
            weight,
            italic,
            size_px,
            spec: trimmed.to_string(),
        })
    }

    /// The name this pattern was parsed from.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Same style and size, generic sans-serif family.
    pub fn without_family(&self) -> Self {
        Self {
            family: None,
            ..self.clone()
        }
    }

    pub fn fontdb_weight(&self) -> fontdb::Weight {
        fontdb::Weight(self.weight)
    }

    pub fn fontdb_style(&self) -> fontdb::Style {
        if self.italic {
            fontdb::Style::Italic
        } else {
            fontdb::Style::Normal
        }
    }
}

fn parse_size(spec: &str, value: &str) -> Result<f32, FontError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| FontError::InvalidPattern(spec.to_string()))
}

fn apply_style_word(word: &str, weight: &mut u16, italic: &mut bool) {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "italic" | "oblique" => *italic = true,
        "roman" => *italic = false,
        _ => {
            if let Some(w) = weight_for_name(&lower) {
                *weight = w;
            } else {
                log::debug!("Ignoring unknown font style word '{}'", word);
            }
        }
    }
}

fn weight_for_name(name: &str) -> Option<u16> {
    let w = match name.to_ascii_lowercase().replace(['-', ' '], "").as_str() {
        "thin" | "hairline" => 100,
        "extralight" | "ultralight" => 200,
        "light" => 300,
        "regular" | "normal" | "book" => WEIGHT_NORMAL,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => WEIGHT_BOLD,
        "extrabold" | "ultrabold" => 800,
        "black" | "heavy" => 900,
        _ => return None,
    };
    Some(w)
}
