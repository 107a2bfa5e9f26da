//! Default colors.

pub fn bg_color() -> String {
    "#000000".to_string()
}

pub fn time_color() -> String {
    "#ffffff".to_string()
}

pub fn date_color() -> String {
    "#333333".to_string()
}
