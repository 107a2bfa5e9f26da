//! Configuration system for the rootclock desktop clock.
//!
//! This crate provides configuration loading, saving, validation and default
//! values. It includes:
//!
//! - The [`Config`] struct and its YAML persistence
//! - Background fill / blend mode selection
//! - Hex color parsing for the three color schemes
//! - Log level selection shared with the binary's logger

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::{Config, Palette};
pub use error::ConfigError;
pub use types::{BackgroundMode, Color, LogLevel};
