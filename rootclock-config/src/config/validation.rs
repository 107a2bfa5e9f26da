//! Semantic validation and color resolution for `Config`.

use super::config_struct::Config;
use crate::error::ConfigError;
use crate::types::Color;

/// Resolved colors of the three schemes the renderer builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub time: Color,
    pub date: Color,
}

impl Config {
    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_fonts.iter().all(|f| f.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "time_fonts must name at least one font".to_string(),
            ));
        }
        if self.show_date && self.date_fonts.iter().all(|f| f.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "date_fonts must name at least one font when show_date is enabled".to_string(),
            ));
        }
        if self.refresh_sec == 0 {
            return Err(ConfigError::Validation(
                "refresh_sec must be at least 1".to_string(),
            ));
        }
        if self.block_padding_x < 0 || self.block_padding_y < 0 {
            return Err(ConfigError::Validation(format!(
                "block padding must not be negative (got {}x{})",
                self.block_padding_x, self.block_padding_y
            )));
        }
        if self.line_spacing < 0 {
            return Err(ConfigError::Validation(format!(
                "line_spacing must not be negative (got {})",
                self.line_spacing
            )));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(ConfigError::Validation(format!(
                "dpi must be a positive number (got {})",
                self.dpi
            )));
        }
        self.palette()?;
        Ok(())
    }

    /// Parse the three configured colors.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette {
            background: self.bg_color.parse()?,
            time: self.time_color.parse()?,
            date: self.date_color.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let config = Config::default().with_refresh_sec(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_date_fonts_only_matter_when_shown() {
        let mut config = Config::default();
        config.date_fonts.clear();
        assert!(config.validate().is_err());
        config.show_date = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_color_rejected() {
        let mut config = Config::default();
        config.time_color = "white".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_palette_resolution() {
        let palette = Config::default().palette().unwrap();
        assert_eq!(palette.background, Color::BLACK);
        assert_eq!(palette.time, Color::WHITE);
        assert_eq!(palette.date, Color::new(0x33, 0x33, 0x33));
    }
}
