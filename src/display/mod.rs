//! The display server seam.
//!
//! [`DisplayBackend`] is everything the clock loop needs from the X server:
//! events, compositor detection, the desktop window, and moving pixels
//! between the canvas and the screen. [`x11::X11Display`] is the real
//! implementation; tests drive the loop with a fake.

mod error;
pub mod x11;

use std::time::Duration;

use rootclock_render::Surface;

use crate::monitor::MonitorSource;

pub use error::DisplayError;
pub use x11::X11Display;

/// X resource id of a window.
pub type WindowId = u32;

/// Where finished regions are copied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawTarget {
    /// The root window. Used while no compositing manager runs.
    #[default]
    Root,
    /// The desktop-type window created below all others while a compositing
    /// manager runs.
    Desktop(WindowId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Part of `window` needs repainting.
    Expose { window: WindowId },
    /// The root window changed size.
    Configure { width: u32, height: u32 },
    /// Anything the clock does not act on.
    Other,
}

/// Result of waiting on the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Events are ready to be read.
    Ready,
    /// The timeout elapsed with nothing to read.
    TimedOut,
    /// A signal arrived.
    Interrupted,
}

pub trait DisplayBackend: Surface + MonitorSource {
    fn root(&self) -> WindowId;

    /// Next queued event without blocking.
    fn poll_event(&mut self) -> Result<Option<DisplayEvent>, DisplayError>;

    /// Whether a compositing manager owns the screen's `_NET_WM_CM_S<n>`
    /// selection.
    fn compositor_active(&mut self) -> bool;

    /// Create, map and lower a full-size desktop window.
    fn create_desktop_window(&mut self, width: u32, height: u32)
    -> Result<WindowId, DisplayError>;

    fn destroy_window(&mut self, window: WindowId);

    /// Resize `window` and push it back to the bottom of the stack.
    fn resize_and_lower(
        &mut self,
        window: WindowId,
        width: u32,
        height: u32,
    ) -> Result<(), DisplayError>;

    /// Direct later presents to `target`.
    fn set_target(&mut self, target: DrawTarget);

    /// Block until an event arrives, `timeout` elapses or a signal lands.
    fn wait(&mut self, timeout: Duration) -> Result<WaitOutcome, DisplayError>;

    fn flush(&mut self) -> Result<(), DisplayError>;
}
