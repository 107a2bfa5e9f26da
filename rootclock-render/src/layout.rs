//! Placement of the time/date block inside one monitor region.
//!
//! Pure arithmetic, no drawing: the block is centred in the region, shifted
//! by the configured vertical offset, padded, and clamped so it never leaves
//! the region.

use crate::geometry::Rect;

/// Spacing settings for the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockStyle {
    pub padding_x: i32,
    pub padding_y: i32,
    pub y_offset: i32,
    pub line_spacing: i32,
}

/// Measured size of one line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMetrics {
    pub width: u32,
    pub height: u32,
}

impl LineMetrics {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// The padded block, inside the region.
    pub block: Rect,
    /// Where the time line is drawn. Its width is cut at the region's right
    /// edge, so over-long text is truncated rather than spilling over.
    pub time: Rect,
    /// Where the date line is drawn, when one is shown.
    pub date: Option<Rect>,
}

/// Lay out the block for `region`.
///
/// `date` is `None` when dates are disabled. A date line with zero width
/// still reserves its height and spacing but does not extend the block.
pub fn compute_block(
    region: Rect,
    style: &BlockStyle,
    time: LineMetrics,
    date: Option<LineMetrics>,
) -> BlockLayout {
    let time_h = time.height as i32;
    let total_h = time_h
        + date
            .map(|d| style.line_spacing + d.height as i32)
            .unwrap_or(0);

    let time_top = region.y + (region.height - total_h) / 2 + style.y_offset;
    let date_top = time_top + time_h + style.line_spacing;

    let mut block_top = time_top;
    let mut block_bottom = time_top + time_h;
    let shown_date = date.filter(|d| d.width > 0);
    if let Some(d) = shown_date {
        block_top = block_top.min(date_top);
        block_bottom = block_bottom.max(date_top + d.height as i32);
    }

    let text_w = time.width.max(shown_date.map(|d| d.width).unwrap_or(0));
    let padded = i64::from(text_w) + 2 * i64::from(style.padding_x);
    let mut block_w = padded.min(i64::from(region.width)) as i32;
    let mut block_x = (region.x + (region.width - block_w) / 2).max(region.x);
    if block_x + block_w > region.right() {
        block_x = region.x;
        block_w = region.width;
    }

    let block_y = (block_top - style.padding_y).clamp(region.y, region.bottom());
    let block_end = (block_bottom + style.padding_y).clamp(region.y, region.bottom());
    let block = Rect::new(block_x, block_y, block_w, (block_end - block_y).max(0));

    let line_box = |width: u32, top: i32, height: u32| {
        let x = (block_x + (block_w - width as i32) / 2).max(region.x);
        let visible = (width as i32).min(region.right() - x).max(0);
        Rect::new(x, top, visible, height as i32)
    };

    BlockLayout {
        block,
        time: line_box(time.width, time_top, time.height),
        date: date.map(|d| line_box(d.width, date_top, d.height)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> BlockStyle {
        BlockStyle {
            padding_x: 48,
            padding_y: 24,
            y_offset: 0,
            line_spacing: 12,
        }
    }

    #[test]
    fn test_centred_block() {
        let region = Rect::new(0, 0, 1920, 1080);
        let l = compute_block(
            region,
            &style(),
            LineMetrics::new(400, 160),
            Some(LineMetrics::new(300, 40)),
        );
        // total height 160 + 12 + 40 = 212
        assert_eq!(l.time.y, (1080 - 212) / 2);
        assert_eq!(l.date.unwrap().y, l.time.y + 160 + 12);
        assert_eq!(l.block.width, 400 + 96);
        assert_eq!(l.block.x, (1920 - 496) / 2);
        assert_eq!(l.block.y, l.time.y - 24);
        assert_eq!(l.block.bottom(), l.date.unwrap().bottom() + 24);
        assert_eq!(l.time.x, l.block.x + 48);
        assert_eq!(l.date.unwrap().x, l.block.x + (496 - 300) / 2);
    }

    #[test]
    fn test_offset_region() {
        let region = Rect::new(1920, 200, 1280, 1024);
        let l = compute_block(region, &style(), LineMetrics::new(100, 50), None);
        assert!(region.contains(&l.block));
        assert_eq!(l.time.y, 200 + (1024 - 50) / 2);
        assert!(l.date.is_none());
    }

    #[test]
    fn test_narrow_region_clamps_block_and_text() {
        let region = Rect::new(100, 0, 300, 400);
        let l = compute_block(region, &style(), LineMetrics::new(600, 100), None);
        assert_eq!(l.block.x, 100);
        assert_eq!(l.block.width, 300);
        assert_eq!(l.time.x, 100);
        assert_eq!(l.time.width, 300);
    }

    #[test]
    fn test_large_offset_is_clamped_vertically() {
        let region = Rect::new(0, 0, 800, 600);
        let s = BlockStyle {
            y_offset: 1000,
            ..style()
        };
        let l = compute_block(region, &s, LineMetrics::new(100, 50), None);
        assert!(l.block.y >= region.y);
        assert!(l.block.bottom() <= region.bottom());
    }

    #[test]
    fn test_short_region_clamps_padding_and_keeps_text_centred() {
        let region = Rect::new(0, 500, 800, 100);
        let l = compute_block(
            region,
            &style(),
            LineMetrics::new(100, 60),
            Some(LineMetrics::new(80, 20)),
        );
        // 92px of text, the 24px padding only partly fits above and below
        assert_eq!(l.block.y, 500);
        assert_eq!(l.block.bottom(), 600);
        assert_eq!(l.time.y, 500 + 4);
        assert_eq!(l.date.unwrap().bottom(), 600 - 4);
    }

    #[test]
    fn test_empty_date_reserves_height_only() {
        let region = Rect::new(0, 0, 800, 600);
        let l = compute_block(
            region,
            &style(),
            LineMetrics::new(100, 50),
            Some(LineMetrics::new(0, 20)),
        );
        assert_eq!(l.time.y, (600 - 82) / 2);
        assert_eq!(l.block.bottom(), l.time.bottom() + 24);
    }

    #[test]
    fn test_containment_and_centring_property() {
        let s = style();
        let min_width = 2 * s.padding_x + 1;
        for rw in [min_width, 200, 641, 1366, 3840] {
            for rh in [120, 480, 1081] {
                for tw in [0u32, 1, 57, 300, 2000] {
                    for dw in [0u32, 80, 1200] {
                        let region = Rect::new(37, -400, rw, rh);
                        let l = compute_block(
                            region,
                            &s,
                            LineMetrics::new(tw, 60),
                            Some(LineMetrics::new(dw, 20)),
                        );
                        assert!(region.contains(&l.block), "{rw}x{rh} {tw} {dw}: {l:?}");
                        assert!(l.time.x >= region.x && l.time.right() <= region.right());
                        let centre = |r: &Rect| 2 * r.x + r.width;
                        assert!((centre(&l.block) - centre(&region)).abs() <= 2);
                        if (tw as i32) <= l.block.width {
                            assert!((centre(&l.time) - centre(&l.block)).abs() <= 2);
                        }

                        let middle = |r: &Rect| 2 * r.y + r.height;
                        let text_top = l.time.y;
                        let text_bottom = l.date.map_or(l.time.bottom(), |d| d.bottom());
                        assert!((text_top + text_bottom - middle(&region)).abs() <= 2);
                        if dw > 0 {
                            // 60 + 12 + 20 of text plus 2 * 24 of padding
                            if rh >= 140 {
                                assert!(
                                    (middle(&l.block) - middle(&region)).abs() <= 2,
                                    "{rw}x{rh} {tw} {dw}: {l:?}"
                                );
                            } else {
                                assert_eq!((l.block.y, l.block.height), (region.y, region.height));
                            }
                        }
                    }
                }
            }
        }
    }
}
