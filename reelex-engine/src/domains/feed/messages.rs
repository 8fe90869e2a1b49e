//! Feed domain inputs: scroll position, layout, pagination results.

use reelex_contracts::content::{ContentError, FeedPage};

use crate::domains::gesture::recognizer::SeekBarRegion;

#[derive(Debug)]
pub enum FeedMessage {
    /// Continuous scroll offset from the host surface, px from the top.
    ScrollOffset { offset: f32 },
    /// Surface layout changed; all values in logical px.
    ViewportChanged {
        width: f32,
        height: f32,
        item_height: f32,
    },
    /// The seek bar moved or toggled; `None` removes the hit region.
    SeekBarChanged { region: Option<SeekBarRegion> },
    /// A load-more request resolved.
    PageLoaded(FeedPage),
    /// A load-more request failed; the feed stays navigable and the next
    /// threshold crossing re-requests.
    PageFailed(ContentError),
}
