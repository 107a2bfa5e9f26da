//! Shared integration test helpers for rootclock.
//!
//! A scripted display backend and a settable clock, so the clock loop can be
//! driven without an X server.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{FakeDisplay, FakeClock, test_config};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers are used per file.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use rootclock::app::App;
use rootclock::clock::{Clock, ClockError};
use rootclock::display::{
    DisplayBackend, DisplayError, DisplayEvent, DrawTarget, WaitOutcome, WindowId,
};
use rootclock::monitor::MonitorSource;
use rootclock_config::{Color, Config};
use rootclock_fonts::testing::{FakeFace, FakeMatcher};
use rootclock_render::{Canvas, Rect, RenderError, Surface};

pub const ROOT: WindowId = 0x100;
pub const WALLPAPER: Color = Color::new(0x20, 0x40, 0x60);

/// Everything the fake display was asked to do, plus knobs for what it
/// reports.
#[derive(Debug)]
pub struct DisplayState {
    pub size: (u32, u32),
    pub compositor: bool,
    pub fail_create: bool,
    pub monitors: Option<Vec<Rect>>,
    pub events: VecDeque<DisplayEvent>,
    pub wait_outcomes: VecDeque<WaitOutcome>,
    /// Clear the flag once this many waits happened.
    pub stop_after: Option<(usize, Arc<AtomicBool>)>,

    pub monitor_queries: usize,
    pub created: Vec<WindowId>,
    pub destroyed: Vec<WindowId>,
    pub resized: Vec<(WindowId, u32, u32)>,
    pub presents: Vec<(DrawTarget, Rect)>,
    pub waits: Vec<Duration>,
    pub target: DrawTarget,
    next_window: WindowId,
}

impl DisplayState {
    pub fn presents_to(&self, target: DrawTarget) -> usize {
        self.presents.iter().filter(|(t, _)| *t == target).count()
    }
}

pub struct FakeDisplay {
    state: Rc<RefCell<DisplayState>>,
}

impl FakeDisplay {
    pub fn new(width: u32, height: u32) -> (Self, Rc<RefCell<DisplayState>>) {
        let state = Rc::new(RefCell::new(DisplayState {
            size: (width, height),
            compositor: false,
            fail_create: false,
            monitors: None,
            events: VecDeque::new(),
            wait_outcomes: VecDeque::new(),
            stop_after: None,
            monitor_queries: 0,
            created: Vec::new(),
            destroyed: Vec::new(),
            resized: Vec::new(),
            presents: Vec::new(),
            waits: Vec::new(),
            target: DrawTarget::Root,
            next_window: 0x400_001,
        }));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl Surface for FakeDisplay {
    fn fetch_background(&mut self, canvas: &mut Canvas, rect: Rect) -> Result<(), RenderError> {
        canvas.fill_rect(rect, WALLPAPER);
        Ok(())
    }

    fn present(&mut self, _canvas: &Canvas, rect: Rect) -> Result<(), RenderError> {
        let mut s = self.state.borrow_mut();
        let target = s.target;
        s.presents.push((target, rect));
        Ok(())
    }
}

impl MonitorSource for FakeDisplay {
    fn size(&self) -> (u32, u32) {
        self.state.borrow().size
    }

    fn monitors(&mut self) -> Result<Option<Vec<Rect>>, DisplayError> {
        let mut s = self.state.borrow_mut();
        s.monitor_queries += 1;
        Ok(s.monitors.clone())
    }
}

impl DisplayBackend for FakeDisplay {
    fn root(&self) -> WindowId {
        ROOT
    }

    fn poll_event(&mut self) -> Result<Option<DisplayEvent>, DisplayError> {
        let mut s = self.state.borrow_mut();
        let event = s.events.pop_front();
        if let Some(DisplayEvent::Configure { width, height }) = event {
            s.size = (width, height);
        }
        Ok(event)
    }

    fn compositor_active(&mut self) -> bool {
        self.state.borrow().compositor
    }

    fn create_desktop_window(
        &mut self,
        _width: u32,
        _height: u32,
    ) -> Result<WindowId, DisplayError> {
        let mut s = self.state.borrow_mut();
        if s.fail_create {
            return Err(DisplayError::Query("BadAlloc".to_string()));
        }
        let window = s.next_window;
        s.next_window += 1;
        s.created.push(window);
        Ok(window)
    }

    fn destroy_window(&mut self, window: WindowId) {
        self.state.borrow_mut().destroyed.push(window);
    }

    fn resize_and_lower(
        &mut self,
        window: WindowId,
        width: u32,
        height: u32,
    ) -> Result<(), DisplayError> {
        self.state.borrow_mut().resized.push((window, width, height));
        Ok(())
    }

    fn set_target(&mut self, target: DrawTarget) {
        self.state.borrow_mut().target = target;
    }

    fn wait(&mut self, timeout: Duration) -> Result<WaitOutcome, DisplayError> {
        let mut s = self.state.borrow_mut();
        s.waits.push(timeout);
        let count = s.waits.len();
        if let Some((after, flag)) = &s.stop_after
            && count >= *after
        {
            flag.store(false, Ordering::SeqCst);
        }
        Ok(s.wait_outcomes.pop_front().unwrap_or(WaitOutcome::Ready))
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// A clock that only moves when told to.
#[derive(Clone)]
pub struct FakeClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl FakeClock {
    /// 2024-06-01 12:00:00.200 UTC.
    pub fn new() -> Self {
        let start = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .unwrap()
            + TimeDelta::milliseconds(200);
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Result<DateTime<FixedOffset>, ClockError> {
        Ok(self.now.get())
    }
}

/// Defaults with fonts the fake matcher knows.
pub fn test_config() -> Config {
    Config {
        time_fonts: vec!["Latin:pixelsize=40".to_string()],
        date_fonts: vec!["Latin:pixelsize=20".to_string()],
        time_format: "%H:%M:%S".to_string(),
        locale: Some("C".to_string()),
        ..Config::default()
    }
}

pub fn matcher() -> FakeMatcher {
    FakeMatcher::default().with_family(FakeFace::new("Latin", 12).covering(0x20..=0x7E))
}

pub type TestApp = App<FakeDisplay, FakeClock, FakeMatcher>;

/// An app over a fresh 1920x1080 fake display.
pub fn test_app(
    config: Config,
    setup: impl FnOnce(&mut DisplayState),
) -> (TestApp, Rc<RefCell<DisplayState>>, FakeClock) {
    let (display, state) = FakeDisplay::new(1920, 1080);
    setup(&mut state.borrow_mut());
    let clock = FakeClock::new();
    let app = App::new(config, display, clock.clone(), matcher()).unwrap();
    (app, state, clock)
}
