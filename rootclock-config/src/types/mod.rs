//! Configuration value types.

mod background;
mod color;
mod log_level;

pub use background::BackgroundMode;
pub use color::Color;
pub use log_level::LogLevel;
