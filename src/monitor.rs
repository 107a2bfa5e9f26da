//! Cached monitor layout.
//!
//! The Xinerama screen list is fetched once and reused until a configure
//! notification marks it stale.

use rootclock_render::Rect;

use crate::display::DisplayError;

/// More screens than this is treated as a bogus reply.
pub const MAX_MONITORS: usize = 64;

/// Where the monitor layout comes from.
pub trait MonitorSource {
    /// Current size of the whole display.
    fn size(&self) -> (u32, u32);

    /// Per-monitor rectangles, `None` when Xinerama is absent or inactive.
    fn monitors(&mut self) -> Result<Option<Vec<Rect>>, DisplayError>;
}

#[derive(Debug, Default)]
pub struct MonitorCache {
    regions: Vec<Rect>,
    dirty: bool,
}

impl MonitorCache {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            dirty: true,
        }
    }

    /// Refetch on the next [`MonitorCache::regions`] call.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.regions.is_empty()
    }

    /// The cached regions, refreshed from `source` first if stale.
    pub fn regions(&mut self, source: &mut dyn MonitorSource) -> &[Rect] {
        if self.is_dirty() {
            self.regions = resolve(source);
            self.dirty = false;
            log::debug!("Monitor regions: {:?}", self.regions);
        }
        &self.regions
    }
}

fn resolve(source: &mut dyn MonitorSource) -> Vec<Rect> {
    let (width, height) = source.size();
    let whole = vec![Rect::new(0, 0, width as i32, height as i32)];

    match source.monitors() {
        Ok(Some(screens)) if (1..=MAX_MONITORS).contains(&screens.len()) => screens,
        Ok(Some(screens)) => {
            log::debug!(
                "Xinerama reported {} screens, using the whole display",
                screens.len()
            );
            whole
        }
        Ok(None) => whole,
        Err(e) => {
            log::warn!("Xinerama query failed, using the whole display: {}", e);
            whole
        }
    }
}
