//! Pixel-to-cell mapping for the terminal feed.
//!
//! Layout runs in pixels. The terminal renders every cell as a fixed
//! `cell_width_px` x `cell_height_px` block, so the container width handed to
//! the layout engine is the terminal width times the cell width.

use crate::feed::ScrollMetrics;
use crate::model::Rect;

/// Pixel width of one terminal column.
pub const CELL_WIDTH_PX: u32 = 8;
/// Pixel height of one terminal row.
pub const CELL_HEIGHT_PX: u32 = 16;

/// Visible window onto the laid-out feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    cell_width_px: u32,
    cell_height_px: u32,
    width_cells: u16,
    height_cells: u16,
    scroll_top_px: u32,
}

impl Viewport {
    /// Viewport of `width_cells` x `height_cells` at the top of the feed.
    pub fn new(width_cells: u16, height_cells: u16) -> Self {
        Self {
            cell_width_px: CELL_WIDTH_PX,
            cell_height_px: CELL_HEIGHT_PX,
            width_cells,
            height_cells,
            scroll_top_px: 0,
        }
    }

    /// Change the visible area. The scroll offset is kept.
    pub fn resize(&mut self, width_cells: u16, height_cells: u16) {
        self.width_cells = width_cells;
        self.height_cells = height_cells;
    }

    /// Width in cells.
    pub fn width_cells(&self) -> u16 {
        self.width_cells
    }

    /// Height in cells.
    pub fn height_cells(&self) -> u16 {
        self.height_cells
    }

    /// Width the layout engine should place cards in.
    pub fn container_width_px(&self) -> u32 {
        u32::from(self.width_cells) * self.cell_width_px
    }

    /// Visible height in pixels.
    pub fn height_px(&self) -> u32 {
        u32::from(self.height_cells) * self.cell_height_px
    }

    /// Pixel height of one terminal row.
    pub fn row_px(&self) -> u32 {
        self.cell_height_px
    }

    /// Offset of the top edge from the top of the content.
    pub fn scroll_top(&self) -> u32 {
        self.scroll_top_px
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll(&self, content_height: u32) -> u32 {
        content_height.saturating_sub(self.height_px())
    }

    /// Scroll to `offset`, clamped to the content.
    pub fn scroll_to(&mut self, offset: u32, content_height: u32) {
        self.scroll_top_px = offset.min(self.max_scroll(content_height));
    }

    /// Scroll by `delta` pixels, clamped to the content.
    pub fn scroll_by(&mut self, delta: i64, content_height: u32) {
        let target = i64::from(self.scroll_top_px).saturating_add(delta).max(0);
        let target = u32::try_from(target).unwrap_or(u32::MAX);
        self.scroll_to(target, content_height);
    }

    /// Scroll the minimum amount that brings `rect` fully into view.
    ///
    /// Rects taller than the viewport are aligned to their top edge.
    pub fn reveal(&mut self, rect: &Rect, content_height: u32) {
        if rect.top < self.scroll_top_px || rect.height > self.height_px() {
            self.scroll_to(rect.top, content_height);
        } else if rect.bottom() > self.scroll_top_px + self.height_px() {
            self.scroll_to(rect.bottom() - self.height_px(), content_height);
        }
    }

    /// Scroll snapshot for the pagination controller.
    pub fn metrics(&self, content_height: u32) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top_px,
            viewport_height: self.height_px(),
            content_height,
        }
    }

    /// Whether any part of `rect` is inside the viewport.
    pub fn is_visible(&self, rect: &Rect) -> bool {
        rect.bottom() > self.scroll_top_px && rect.top < self.scroll_top_px + self.height_px()
    }

    /// Cell area of `rect` inside `area`, clipped to the viewport.
    ///
    /// Edges round down to the containing cell, so cards separated by at
    /// least one cell of gap never share a cell. Returns `None` when nothing
    /// of `rect` is visible.
    pub fn cell_area(&self, rect: &Rect, area: ratatui::layout::Rect) -> Option<ratatui::layout::Rect> {
        let cw = i64::from(self.cell_width_px);
        let ch = i64::from(self.cell_height_px);
        let scroll = i64::from(self.scroll_top_px);

        let top = (i64::from(rect.top) - scroll).div_euclid(ch).max(0);
        let bottom = (i64::from(rect.bottom()) - scroll)
            .div_euclid(ch)
            .min(i64::from(area.height));
        let left = (i64::from(rect.left) / cw).min(i64::from(area.width));
        let right = (i64::from(rect.right()) / cw).min(i64::from(area.width));

        if bottom <= top || right <= left {
            return None;
        }

        // All four values are clamped to the area's u16 bounds above.
        Some(ratatui::layout::Rect::new(
            area.x + left as u16,
            area.y + top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(width: u16, height: u16) -> ratatui::layout::Rect {
        ratatui::layout::Rect::new(0, 0, width, height)
    }

    #[test]
    fn container_width_is_columns_times_cell_width() {
        let viewport = Viewport::new(80, 24);
        assert_eq!(viewport.container_width_px(), 640);
        assert_eq!(viewport.height_px(), 384);
    }

    #[test]
    fn scroll_clamps_to_content() {
        let mut viewport = Viewport::new(80, 10);
        viewport.scroll_by(1000, 500);
        assert_eq!(viewport.scroll_top(), 340);
        viewport.scroll_by(-5000, 500);
        assert_eq!(viewport.scroll_top(), 0);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut viewport = Viewport::new(80, 24);
        viewport.scroll_by(100, 200);
        assert_eq!(viewport.scroll_top(), 0);
    }

    #[test]
    fn square_card_maps_to_whole_cells() {
        let viewport = Viewport::new(80, 24);
        let cells = viewport
            .cell_area(&Rect::new(152, 20, 160, 160), area(80, 24))
            .unwrap();
        assert_eq!(cells, ratatui::layout::Rect::new(19, 1, 20, 10));
    }

    #[test]
    fn cards_one_gap_apart_do_not_share_rows() {
        let viewport = Viewport::new(80, 24);
        let upper = viewport
            .cell_area(&Rect::new(152, 20, 160, 160), area(80, 24))
            .unwrap();
        let lower = viewport
            .cell_area(&Rect::new(152, 196, 160, 160), area(80, 24))
            .unwrap();
        assert!(upper.bottom() <= lower.top());
    }

    #[test]
    fn card_above_the_viewport_is_clipped() {
        let mut viewport = Viewport::new(80, 24);
        viewport.scroll_to(100, 2000);
        let cells = viewport
            .cell_area(&Rect::new(152, 20, 160, 160), area(80, 24))
            .unwrap();
        assert_eq!(cells.y, 0);
        assert_eq!(cells.height, 5);

        assert!(viewport
            .cell_area(&Rect::new(152, 20, 160, 60), area(80, 24))
            .is_none());
    }

    #[test]
    fn card_below_the_viewport_is_hidden() {
        let viewport = Viewport::new(80, 10);
        let rect = Rect::new(0, 400, 160, 160);
        assert!(!viewport.is_visible(&rect));
        assert!(viewport.cell_area(&rect, area(80, 10)).is_none());
    }

    #[test]
    fn reveal_scrolls_down_just_enough() {
        let mut viewport = Viewport::new(80, 10);
        viewport.reveal(&Rect::new(0, 300, 160, 160), 2000);
        assert_eq!(viewport.scroll_top(), 300);

        viewport.scroll_to(0, 2000);
        viewport.reveal(&Rect::new(0, 100, 160, 100), 2000);
        assert_eq!(viewport.scroll_top(), 40);

        viewport.reveal(&Rect::new(0, 20, 160, 10), 2000);
        assert_eq!(viewport.scroll_top(), 20);
    }

    #[test]
    fn metrics_report_pixels() {
        let mut viewport = Viewport::new(80, 10);
        viewport.scroll_to(64, 1000);
        assert_eq!(
            viewport.metrics(1000),
            ScrollMetrics {
                scroll_top: 64,
                viewport_height: 160,
                content_height: 1000,
            }
        );
    }
}
