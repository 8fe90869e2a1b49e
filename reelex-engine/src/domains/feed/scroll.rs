//! Scroll position tracking and feed virtualization.
//!
//! Maps the host surface's continuous scroll offset onto a logical item
//! index, bounds how many items are mounted at all, and decides when
//! motion has settled enough to commit an index change.

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use reelex_config::ScrollConfig;

use crate::infra::time::TimeProvider;

/// Direction of current (or last) scroll motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    #[default]
    None,
    /// Toward higher indices (content moving up).
    Forward,
    /// Toward lower indices.
    Backward,
}

/// Snapshot of scroll motion for overlays and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub current_index: usize,
    /// Recency-weighted velocity, px/ms, positive toward higher indices.
    pub scroll_velocity: f32,
    pub is_scrolling: bool,
    pub direction: ScrollDirection,
}

/// Virtualized scroll state for the vertical feed.
pub struct ScrollController {
    item_count: usize,
    /// Height of each item; feed items are uniform full-viewport cells.
    item_height: f32,
    viewport_height: f32,
    offset: f32,
    overscan: usize,
    velocity_tau_ms: f32,
    velocity: f32,
    is_scrolling: bool,
    direction: ScrollDirection,
    last_sample: Option<Instant>,
    time: Arc<dyn TimeProvider>,
}

impl std::fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollController")
            .field("item_count", &self.item_count)
            .field("offset", &self.offset)
            .field("velocity", &self.velocity)
            .field("is_scrolling", &self.is_scrolling)
            .finish()
    }
}

impl ScrollController {
    pub fn new(config: &ScrollConfig, time: Arc<dyn TimeProvider>) -> Self {
        Self {
            item_count: 0,
            item_height: 0.0,
            viewport_height: 0.0,
            offset: 0.0,
            overscan: config.overscan,
            velocity_tau_ms: config.velocity_tau_ms.max(1) as f32,
            velocity: 0.0,
            is_scrolling: false,
            direction: ScrollDirection::None,
            last_sample: None,
            time,
        }
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn set_layout(&mut self, viewport_height: f32, item_height: f32) {
        self.viewport_height = viewport_height.max(0.0);
        self.item_height = item_height.max(0.0);
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            current_index: self.active_index(),
            scroll_velocity: self.velocity,
            is_scrolling: self.is_scrolling,
            direction: self.direction,
        }
    }

    /// Logical index nearest the current offset, clamped to the feed.
    pub fn active_index(&self) -> usize {
        if self.item_count == 0 || self.item_height <= 0.0 {
            return 0;
        }
        let index = (self.offset / self.item_height).round();
        (index.max(0.0) as usize).min(self.item_count - 1)
    }

    /// Which items should be mounted at all: the visible span plus
    /// `overscan` items on each side.
    pub fn mounted_range(&self) -> Range<usize> {
        if self.item_count == 0 || self.item_height <= 0.0 {
            return 0..0;
        }
        let first_visible =
            (self.offset / self.item_height).floor().max(0.0) as usize;
        let visible_count =
            (self.viewport_height / self.item_height).ceil().max(1.0) as usize;
        let last_visible =
            (first_visible + visible_count).min(self.item_count);

        let start = first_visible.saturating_sub(self.overscan);
        let end = (last_visible + self.overscan).min(self.item_count);
        start..end
    }

    /// Ingest a continuous scroll offset sample. Returns the active index
    /// after the sample; the engine re-arms the quiet timer on every call.
    pub fn handle_scroll(&mut self, offset: f32) -> usize {
        let now = self.time.now();
        let max_offset = self.max_offset();
        let clamped = offset.clamp(0.0, max_offset);

        if let Some(last) = self.last_sample {
            let dt_ms =
                now.saturating_duration_since(last).as_secs_f32() * 1_000.0;
            if dt_ms > 0.0 {
                // Time-delta instantaneous velocity blended with an
                // exponential recency weight, so a fling's tail does not
                // drown the current sample.
                let inst = (clamped - self.offset) / dt_ms;
                let alpha = 1.0 - (-dt_ms / self.velocity_tau_ms).exp();
                self.velocity += (inst - self.velocity) * alpha;
            }
        }
        self.last_sample = Some(now);

        self.direction = if clamped > self.offset {
            ScrollDirection::Forward
        } else if clamped < self.offset {
            ScrollDirection::Backward
        } else {
            self.direction
        };
        self.offset = clamped;
        self.is_scrolling = true;
        self.active_index()
    }

    /// The quiet period lapsed with no scroll samples: motion is over.
    /// Returns the rest index and the exact snap offset for it.
    pub fn settle(&mut self) -> (usize, f32) {
        let index = self.active_index();
        let rest = self.snap_offset(index);
        self.offset = rest;
        self.velocity = 0.0;
        self.is_scrolling = false;
        self.direction = ScrollDirection::None;
        self.last_sample = None;
        (index, rest)
    }

    /// Programmatic navigation: rest exactly on the item boundary.
    pub fn scroll_to_index(&mut self, index: usize) -> f32 {
        let clamped = if self.item_count == 0 {
            0
        } else {
            index.min(self.item_count - 1)
        };
        let rest = self.snap_offset(clamped);
        self.offset = rest;
        self.velocity = 0.0;
        self.is_scrolling = false;
        self.direction = ScrollDirection::None;
        self.last_sample = None;
        rest
    }

    fn snap_offset(&self, index: usize) -> f32 {
        index as f32 * self.item_height
    }

    fn max_offset(&self) -> f32 {
        if self.item_count == 0 {
            return 0.0;
        }
        ((self.item_count - 1) as f32 * self.item_height).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::time::VirtualTimeProvider;
    use std::time::Duration;

    fn controller(count: usize) -> (ScrollController, Arc<VirtualTimeProvider>) {
        let time = Arc::new(VirtualTimeProvider::new());
        let mut controller =
            ScrollController::new(&ScrollConfig::default(), time.clone());
        controller.set_item_count(count);
        controller.set_layout(800.0, 800.0);
        (controller, time)
    }

    #[test]
    fn offset_rounds_to_nearest_index() {
        let (mut controller, _) = controller(8);
        assert_eq!(controller.handle_scroll(0.0), 0);
        assert_eq!(controller.handle_scroll(350.0), 0);
        assert_eq!(controller.handle_scroll(450.0), 1);
        assert_eq!(controller.handle_scroll(4_000.0), 5);
    }

    #[test]
    fn offset_clamps_to_feed_bounds() {
        let (mut controller, _) = controller(3);
        assert_eq!(controller.handle_scroll(-500.0), 0);
        assert_eq!(controller.offset(), 0.0);
        assert_eq!(controller.handle_scroll(99_999.0), 2);
        assert_eq!(controller.offset(), 1_600.0);
    }

    #[test]
    fn mounted_range_applies_overscan() {
        let (mut controller, _) = controller(20);
        controller.handle_scroll(8_000.0); // index 10
        assert_eq!(controller.mounted_range(), 8..13);
    }

    #[test]
    fn mounted_range_clamps_at_edges() {
        let (mut controller, _) = controller(8);
        controller.handle_scroll(0.0);
        assert_eq!(controller.mounted_range(), 0..3);
        controller.handle_scroll(5_600.0); // last index
        assert_eq!(controller.mounted_range(), 5..8);
    }

    #[test]
    fn scroll_to_index_rests_exactly_on_boundary() {
        let (mut controller, _) = controller(8);
        let rest = controller.scroll_to_index(5);
        assert_eq!(rest, 4_000.0);
        assert_eq!(controller.offset(), 4_000.0);
        assert!(!controller.is_scrolling());
        assert_eq!(controller.active_index(), 5);

        // Out-of-range targets clamp.
        assert_eq!(controller.scroll_to_index(99), 5_600.0);
    }

    #[test]
    fn velocity_weights_recent_samples() {
        let (mut controller, time) = controller(100);
        let mut offset = 0.0;
        // A long slow phase...
        for _ in 0..20 {
            time.advance(Duration::from_millis(16));
            offset += 2.0;
            controller.handle_scroll(offset);
        }
        let slow = controller.state().scroll_velocity;
        // ...followed by a short fast burst must dominate the estimate.
        for _ in 0..6 {
            time.advance(Duration::from_millis(16));
            offset += 60.0;
            controller.handle_scroll(offset);
        }
        let fast = controller.state().scroll_velocity;
        assert!(fast > slow * 5.0, "slow {slow} fast {fast}");
        assert_eq!(controller.state().direction, ScrollDirection::Forward);
    }

    #[test]
    fn settle_snaps_and_stops() {
        let (mut controller, time) = controller(8);
        time.advance(Duration::from_millis(16));
        controller.handle_scroll(1_700.0);
        assert!(controller.is_scrolling());

        let (index, rest) = controller.settle();
        assert_eq!(index, 2);
        assert_eq!(rest, 1_600.0);
        assert!(!controller.is_scrolling());
        assert_eq!(controller.state().scroll_velocity, 0.0);
    }

    #[test]
    fn empty_feed_is_inert() {
        let (mut controller, _) = controller(0);
        assert_eq!(controller.handle_scroll(500.0), 0);
        assert_eq!(controller.mounted_range(), 0..0);
        assert_eq!(controller.scroll_to_index(3), 0.0);
    }
}
