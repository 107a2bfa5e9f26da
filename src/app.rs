//! The clock loop.
//!
//! Each iteration drains pending display events, follows the compositing
//! manager (creating or destroying the desktop window), redraws when
//! something asked for it, then sleeps until the next update is due.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use rootclock_config::Config;
use rootclock_fonts::{FontMatcher, FontSet, TextShaper};
use rootclock_render::{Canvas, Line, RegionRenderer};

use crate::clock::{Clock, TimeFormatter};
use crate::display::{DisplayBackend, DisplayEvent, DrawTarget, WaitOutcome, WindowId};
use crate::monitor::MonitorCache;
use crate::scheduler::compute_wait;

pub struct App<B: DisplayBackend, C: Clock, M: FontMatcher> {
    config: Config,
    display: B,
    clock: C,
    shaper: TextShaper<M>,
    time_fonts: FontSet,
    date_fonts: Option<FontSet>,
    renderer: RegionRenderer,
    formatter: TimeFormatter,
    canvas: Canvas,
    monitors: MonitorCache,
    /// Display size as of the last configure notification.
    size: (u32, u32),
    desktop: Option<WindowId>,
    warned_desktop: bool,
    need_redraw: bool,
    /// Epoch second shown by the last frame.
    last_second: Option<i64>,
    frames: u64,
}

impl<B: DisplayBackend, C: Clock, M: FontMatcher> App<B, C, M> {
    /// Set everything up and, if a compositor is already running, move to a
    /// desktop window so the first frame lands there.
    ///
    /// # Errors
    /// Invalid config values, colors, display sizes and font lists are fatal.
    pub fn new(config: Config, display: B, clock: C, matcher: M) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let renderer = RegionRenderer::from_config(&config).context("failed to allocate colors")?;

        let size = display.size();
        let canvas =
            Canvas::new(size.0, size.1).context("failed to create drawing context")?;

        let mut shaper = TextShaper::new(matcher);
        let time_fonts = FontSet::load(shaper.matcher_mut(), &config.time_fonts, config.dpi)
            .context("failed to load time fonts")?;
        let date_fonts = if config.date_enabled() {
            Some(
                FontSet::load(shaper.matcher_mut(), &config.date_fonts, config.dpi)
                    .context("failed to load date fonts")?,
            )
        } else {
            None
        };
        let formatter = TimeFormatter::from_environment(config.locale.as_deref());

        let mut app = Self {
            config,
            display,
            clock,
            shaper,
            time_fonts,
            date_fonts,
            renderer,
            formatter,
            canvas,
            monitors: MonitorCache::new(),
            size,
            desktop: None,
            warned_desktop: false,
            need_redraw: true,
            last_second: None,
            frames: 0,
        };
        app.sync_compositor();
        Ok(app)
    }

    pub fn display(&self) -> &B {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut B {
        &mut self.display
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn draw_target(&self) -> DrawTarget {
        self.desktop.map_or(DrawTarget::Root, DrawTarget::Desktop)
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run until `running` is cleared.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        log::info!(
            "Clock running: refresh {}s, background {:?}",
            self.config.refresh_sec,
            self.renderer.mode()
        );
        while running.load(Ordering::SeqCst) {
            self.step()?;
            if !running.load(Ordering::SeqCst) {
                break;
            }
            let timeout = self.next_wait();
            log::trace!("Sleeping {:?}", timeout);
            match self.display.wait(timeout).context("waiting for X events failed")? {
                WaitOutcome::TimedOut => self.need_redraw = true,
                WaitOutcome::Ready | WaitOutcome::Interrupted => {}
            }
        }
        log::info!("Stop requested after {} frames", self.frames);
        Ok(())
    }

    /// One pass over events, the compositor and the clock. Returns whether a
    /// frame was drawn.
    pub fn step(&mut self) -> Result<bool> {
        self.drain_events()?;
        self.sync_compositor();

        let now = self.clock.now().context("cannot read the system clock")?;
        if self.last_second != Some(now.timestamp()) {
            self.need_redraw = true;
        }
        if !self.need_redraw {
            return Ok(false);
        }

        let time_text = self.formatter.format_time(&now, &self.config.time_format);
        let date_text = self
            .date_fonts
            .is_some()
            .then(|| self.formatter.format_date(&now, &self.config.date_format));
        self.render(&time_text, date_text.as_deref())?;

        self.last_second = Some(now.timestamp());
        self.need_redraw = false;
        Ok(true)
    }

    /// Time until the next update is due.
    pub fn next_wait(&self) -> Duration {
        compute_wait(self.clock.now().ok().as_ref(), self.config.refresh_sec)
    }

    fn drain_events(&mut self) -> Result<()> {
        while let Some(event) = self.display.poll_event().context("reading X events failed")? {
            match event {
                DisplayEvent::Expose { window } => {
                    if window == self.display.root() || Some(window) == self.desktop {
                        self.need_redraw = true;
                    }
                }
                DisplayEvent::Configure { width, height } => self.on_configure(width, height),
                DisplayEvent::Other => {}
            }
        }
        Ok(())
    }

    fn on_configure(&mut self, width: u32, height: u32) {
        if let Err(e) = self.canvas.resize(width, height) {
            log::warn!("Keeping the old canvas: {}", e);
        }
        if let Some(window) = self.desktop
            && (width, height) != self.size
            && let Err(e) = self.display.resize_and_lower(window, width, height)
        {
            log::warn!("Failed to resize the desktop window: {}", e);
        }
        self.size = (width, height);
        self.monitors.invalidate();
        self.need_redraw = true;
    }

    /// Follow the compositing manager: desktop window while one runs, root
    /// window otherwise.
    fn sync_compositor(&mut self) {
        let active = self.display.compositor_active();
        match (active, self.desktop) {
            (true, None) => {
                let (width, height) = self.size;
                match self.display.create_desktop_window(width, height) {
                    Ok(window) => {
                        log::info!("Compositor detected, drawing on desktop window 0x{:x}", window);
                        self.desktop = Some(window);
                        self.display.set_target(DrawTarget::Desktop(window));
                        self.warned_desktop = false;
                        self.need_redraw = true;
                    }
                    Err(e) if !self.warned_desktop => {
                        log::warn!(
                            "Compositor detected but failed to create the desktop window, \
                             drawing on the root window: {}",
                            e
                        );
                        self.warned_desktop = true;
                    }
                    Err(e) => log::debug!("Desktop window still unavailable: {}", e),
                }
            }
            (false, Some(window)) => {
                log::info!("Compositor gone, drawing on the root window");
                self.display.destroy_window(window);
                self.desktop = None;
                self.display.set_target(DrawTarget::Root);
                self.need_redraw = true;
            }
            _ => {}
        }
    }

    fn render(&mut self, time_text: &str, date_text: Option<&str>) -> Result<()> {
        let regions = self.monitors.regions(&mut self.display).to_vec();

        let mut time = Line::new(&mut self.time_fonts, time_text);
        let mut date = match (self.date_fonts.as_mut(), date_text) {
            (Some(fonts), Some(text)) => Some(Line::new(fonts, text)),
            _ => None,
        };

        let presented = self.renderer.draw_regions(
            &mut self.canvas,
            &mut self.shaper,
            &mut time,
            date.as_mut(),
            &regions,
            &mut self.display,
        );
        self.display.flush().context("flushing the display failed")?;
        self.frames += 1;
        log::debug!(
            "Frame {}: '{}' on {} of {} regions",
            self.frames,
            time_text,
            presented,
            regions.len()
        );
        Ok(())
    }
}

impl<B: DisplayBackend, C: Clock, M: FontMatcher> Drop for App<B, C, M> {
    fn drop(&mut self) {
        if let Some(window) = self.desktop.take() {
            self.display.destroy_window(window);
        }
    }
}
