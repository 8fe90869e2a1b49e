//! Decodable media surface contract.
//!
//! A [`MediaElement`] stands in for whatever actually decodes video on the
//! host surface (a browser `<video>` element, a GStreamer pipeline, a test
//! double). The engine issues commands through the trait and receives
//! [`MediaEvent`]s back through its message loop; it never assumes more
//! than this surface.

use reelex_model::item::MediaSources;
use reelex_model::playback::{BufferedRange, PlaybackError};
use std::sync::Arc;
use url::Url;

use crate::adaptive::AdaptiveEngine;

/// Metadata available once a source has loaded far enough to play.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MediaMetadata {
    /// Duration in seconds. `None` for live/endless sources.
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Low-level events the host surface reports for an attached element.
///
/// The engine translates these into state-machine transitions; delivery
/// order follows the host's event loop and stale events (from a previous
/// attach of the same slot) are discarded by generation.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Decoding resumed (or started) and frames are being presented.
    Playing,
    /// The decoder ran out of buffered data.
    Waiting,
    /// Playhead progressed.
    TimeUpdate { position: f64 },
    /// Buffered ranges changed.
    Progress { buffered: Vec<BufferedRange> },
    /// Playback reached the end of the source.
    Ended,
    /// The element failed; classification per the error's kind.
    Failed { error: PlaybackError },
}

/// Command surface of a single decodable media element.
///
/// Implementations are expected to be internally synchronized (an `Arc`
/// facade over a locked backend), so all methods take `&self`.
#[cfg_attr(feature = "test-util", mockall::automock)]
#[async_trait::async_trait]
pub trait MediaElement: Send + Sync {
    /// Load a source and resolve once metadata is available.
    ///
    /// Cancellation is external: the engine drops the future and calls
    /// [`release`](Self::release) when the slot is reassigned mid-load.
    async fn load(&self, url: Url) -> Result<MediaMetadata, PlaybackError>;

    fn play(&self) -> Result<(), PlaybackError>;

    fn pause(&self);

    /// Seek to an absolute position in seconds.
    fn seek(&self, position: f64);

    fn set_muted(&self, muted: bool);

    fn set_volume(&self, volume: f64);

    fn current_time(&self) -> f64;

    fn buffered(&self) -> Vec<BufferedRange>;

    /// Drop decode resources. Must be idempotent; called on every release
    /// path, including mid-load cancellation.
    fn release(&self);
}

/// Factory for media elements and adaptive engines, plus the capability
/// probe that decides between native and adaptive playback for a source.
#[cfg_attr(feature = "test-util", mockall::automock)]
pub trait MediaBackend: Send + Sync {
    /// Whether the host surface can decode the progressive source
    /// directly, without an adaptive engine in front of it.
    fn supports_native(&self, sources: &MediaSources) -> bool;

    fn create_element(&self) -> Arc<dyn MediaElement>;

    /// Create an adaptive engine for manifest-driven sources. Backends
    /// without one return `None`, which surfaces as `not_supported` when a
    /// source cannot play natively.
    fn create_adaptive(&self) -> Option<Arc<dyn AdaptiveEngine>>;
}
