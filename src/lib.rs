// Library exports for testing and potential library use
//
// The binary is a thin wrapper: it parses the command line, installs the
// logger and signal handlers, connects to X11 and hands everything to
// `app::App`. The loop itself only talks to the display through the
// `display::DisplayBackend` trait so it can be driven by a fake in tests.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod app;
pub mod cli;
pub mod clock;
pub mod display;
pub mod monitor;
pub mod scheduler;
pub mod signal;
