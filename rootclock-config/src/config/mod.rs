//! Clock configuration management.
//!
//! # Sub-modules
//!
//! - [`config_struct`]: Core `Config` struct and its `Default` impl
//! - [`persistence`]: `impl Config` methods for load/save/path-resolution
//! - [`validation`]: `impl Config` methods for semantic validation and color resolution

pub mod config_struct;
pub mod persistence;
pub mod validation;

pub use config_struct::Config;
pub use validation::Palette;
