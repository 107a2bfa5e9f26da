//! Drawing the clock block for each monitor region.

use rootclock_config::{BackgroundMode, Color, Config, ConfigError};
use rootclock_fonts::{FontMatcher, FontSet, TextBox, TextShaper};

use crate::blend::BlendOp;
use crate::canvas::Canvas;
use crate::compositor::composite_text;
use crate::error::RenderError;
use crate::geometry::Rect;
use crate::layout::{BlockLayout, BlockStyle, LineMetrics, compute_block};
use crate::scheme::{ColorScheme, Schemes};

/// Where the canvas gets its background from and where it goes when done.
///
/// Implemented by the display backend.
pub trait Surface {
    /// Fill `rect` of `canvas` with the current desktop image: the wallpaper
    /// pixmap when one is declared, else the live root window contents.
    ///
    /// # Errors
    /// [`RenderError::Fetch`] when neither source can be read.
    fn fetch_background(&mut self, canvas: &mut Canvas, rect: Rect) -> Result<(), RenderError>;

    /// Copy `rect` of `canvas` to the current draw target.
    fn present(&mut self, canvas: &Canvas, rect: Rect) -> Result<(), RenderError>;
}

/// One line of the block: its text and the chain it is drawn with.
pub struct Line<'a> {
    pub fonts: &'a mut FontSet,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(fonts: &'a mut FontSet, text: &'a str) -> Self {
        Self { fonts, text }
    }
}

/// Draws the block into each region. Holds only settings plus the
/// warned-once flag for a missing desktop image.
#[derive(Debug)]
pub struct RegionRenderer {
    mode: BackgroundMode,
    blend: Option<BlendOp>,
    schemes: Schemes,
    style: BlockStyle,
    warned_no_background: bool,
}

impl RegionRenderer {
    pub fn new(mode: BackgroundMode, schemes: Schemes, style: BlockStyle) -> Self {
        Self {
            mode,
            blend: BlendOp::for_mode(mode),
            schemes,
            style,
            warned_no_background: false,
        }
    }

    /// Build from a validated config.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let style = BlockStyle {
            padding_x: config.block_padding_x,
            padding_y: config.block_padding_y,
            y_offset: config.block_y_offset,
            line_spacing: config.line_spacing,
        };
        Ok(Self::new(
            config.background_mode,
            Schemes::from(config.palette()?),
            style,
        ))
    }

    pub fn mode(&self) -> BackgroundMode {
        self.mode
    }

    /// Draw every drawable region and present it.
    ///
    /// Regions with a non-positive size or a dimension above 32767 are
    /// skipped. Errors are logged per region and the frame continues.
    /// Returns the number of regions presented.
    pub fn draw_regions<M: FontMatcher>(
        &mut self,
        canvas: &mut Canvas,
        shaper: &mut TextShaper<M>,
        time: &mut Line<'_>,
        mut date: Option<&mut Line<'_>>,
        regions: &[Rect],
        surface: &mut dyn Surface,
    ) -> usize {
        let mut presented = 0;
        for region in regions.iter().filter(|r| r.is_drawable()) {
            match self.draw_region(canvas, shaper, time, date.as_deref_mut(), *region, surface) {
                Ok(()) => presented += 1,
                Err(e) => log::warn!("Region {:?}: {}", region, e),
            }
        }
        presented
    }

    /// Draw the block for one region and present it.
    pub fn draw_region<M: FontMatcher>(
        &mut self,
        canvas: &mut Canvas,
        shaper: &mut TextShaper<M>,
        time: &mut Line<'_>,
        mut date: Option<&mut Line<'_>>,
        region: Rect,
        surface: &mut dyn Surface,
    ) -> Result<(), RenderError> {
        if !region.is_drawable() {
            return Ok(());
        }

        let time_metrics = LineMetrics::new(
            shaper.measure(time.fonts, time.text),
            time.fonts.height(),
        );
        let date_metrics = date.as_deref_mut().map(|line| {
            LineMetrics::new(shaper.measure(line.fonts, line.text), line.fonts.height())
        });
        let layout = compute_block(region, &self.style, time_metrics, date_metrics);

        let used_solid = self.prepare_background(canvas, region, surface);

        let mut date = date.filter(|line| !line.text.is_empty());
        let blended = match self.blend {
            Some(op) if !layout.block.is_empty() => {
                self.composite_lines(canvas, shaper, time, date.as_deref_mut(), &layout, op)
            }
            _ => false,
        };

        if !blended {
            let fill = used_solid.then_some(self.schemes.background.fg);
            draw_plain(canvas, shaper, time, layout.time, region, &self.schemes.time, fill);
            if let (Some(line), Some(rect)) = (date.as_deref_mut(), layout.date) {
                draw_plain(canvas, shaper, line, rect, region, &self.schemes.date, fill);
            }
        }

        surface.present(canvas, region)
    }

    /// Fill the whole region with the background. Returns whether the solid
    /// color was used.
    fn prepare_background(
        &mut self,
        canvas: &mut Canvas,
        region: Rect,
        surface: &mut dyn Surface,
    ) -> bool {
        if self.mode.needs_wallpaper() {
            match surface.fetch_background(canvas, region) {
                Ok(()) => return false,
                Err(e) => {
                    if !self.warned_no_background {
                        log::warn!("{}; falling back to solid background", e);
                        self.warned_no_background = true;
                    } else {
                        log::debug!("{}", e);
                    }
                }
            }
        }
        canvas.fill_rect(region, self.schemes.background.fg);
        true
    }

    /// Composite both lines. True only if every shown line succeeded.
    fn composite_lines<M: FontMatcher>(
        &self,
        canvas: &mut Canvas,
        shaper: &mut TextShaper<M>,
        time: &mut Line<'_>,
        date: Option<&mut Line<'_>>,
        layout: &BlockLayout,
        op: BlendOp,
    ) -> bool {
        let time_done = composite_text(
            canvas,
            shaper,
            time.fonts,
            time.text,
            layout.time,
            self.schemes.time.fg,
            op,
        )
        .inspect_err(|e| log::debug!("Blending time text failed: {}", e))
        .is_ok();

        let date_done = match (date, layout.date) {
            (Some(line), Some(rect)) => composite_text(
                canvas,
                shaper,
                line.fonts,
                line.text,
                rect,
                self.schemes.date.fg,
                op,
            )
            .inspect_err(|e| log::debug!("Blending date text failed: {}", e))
            .is_ok(),
            _ => true,
        };

        time_done && date_done
    }
}

/// Draw one line normally, optionally filling its box first.
fn draw_plain<M: FontMatcher>(
    canvas: &mut Canvas,
    shaper: &mut TextShaper<M>,
    line: &mut Line<'_>,
    rect: Rect,
    clip: Rect,
    scheme: &ColorScheme,
    fill: Option<Color>,
) {
    if rect.is_empty() {
        return;
    }
    if let Some(color) = fill {
        canvas.fill_rect(rect, color);
    }
    let bx = TextBox::new(rect.x, rect.y, rect.width as u32, rect.height as u32);
    let mut painter = canvas.painter(scheme.fg, clip);
    shaper.render(line.fonts, &mut painter, bx, 0, line.text);
}
