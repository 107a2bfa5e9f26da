//! Default values for fonts and time/date formats.

pub fn time_fonts() -> Vec<String> {
    vec![
        "Inter:style=ExtraBold:size=120".to_string(),
        "Liberation Sans:style=Bold:size=120".to_string(),
        // Carries the RATIO glyph used by the default time format
        "Noto Sans Math:style=Regular:size=120".to_string(),
    ]
}

pub fn date_fonts() -> Vec<String> {
    vec![
        "Inter:style=Regular:size=26".to_string(),
        "Liberation Sans:style=Regular:size=26".to_string(),
        "Noto Sans:style=Regular:size=26".to_string(),
    ]
}

pub fn time_format() -> String {
    "%-H\u{2236}%M".to_string()
}

pub fn date_format() -> String {
    "%A, %-d %B %Y".to_string()
}

pub fn show_date() -> bool {
    true
}

pub fn dpi() -> f32 {
    96.0
}
