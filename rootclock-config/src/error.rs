//! Typed error variants for the rootclock-config crate.
//!
//! Provides structured error types for config I/O and validation operations.
//! `Config::load_from` and `Config::validate` return these directly; the binary
//! wraps them in `anyhow` with additional context.

use thiserror::Error;

/// Errors that can occur when loading, printing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A color string is not of the form `#rgb` or `#rrggbb`.
    #[error("invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Config validation error: {0}")]
    Validation(String),
}
