//! Scroll position reported by the rendering shell.

/// Snapshot of the scroll container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Offset of the viewport's top edge from the top of the content.
    pub scroll_top: u32,
    /// Visible height.
    pub viewport_height: u32,
    /// Total height of the laid-out content.
    pub content_height: u32,
}

impl ScrollMetrics {
    /// Pixels of content below the viewport's bottom edge.
    pub fn distance_to_bottom(&self) -> u32 {
        self.content_height
            .saturating_sub(self.scroll_top.saturating_add(self.viewport_height))
    }

    /// Whether the viewport is strictly within `threshold` px of the bottom.
    ///
    /// Content shorter than the viewport is always near the bottom.
    pub fn is_near_bottom(&self, threshold: u32) -> bool {
        self.distance_to_bottom() < threshold
    }
}
