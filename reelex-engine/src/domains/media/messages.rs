//! Media domain inputs: attach resolutions and element events.

use reelex_contracts::media::{MediaEvent, MediaMetadata};
use reelex_model::playback::PlaybackError;

#[derive(Debug)]
pub enum MediaMessage {
    /// An attach started by [`Effect::Attach`](crate::common::messages::Effect)
    /// resolved. Dropped unless `generation` still matches the slot.
    AttachResolved {
        index: usize,
        generation: u64,
        result: Result<MediaMetadata, PlaybackError>,
    },
    /// A low-level event from the host's media surface for one slot.
    Element { index: usize, event: MediaEvent },
}
