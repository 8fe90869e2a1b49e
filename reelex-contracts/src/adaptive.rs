//! Adaptive-bitrate engine contract.
//!
//! The streaming layer is a replaceable strategy: the engine depends only
//! on the ladder/level/buffer surface below, never on a concrete HLS
//! implementation.

use reelex_model::playback::{
    BufferedRange, PlaybackError, QualityLevel, QualitySelection,
};
use url::Url;

use crate::media::MediaMetadata;

/// One attached adaptive session feeding a media element.
#[cfg_attr(feature = "test-util", mockall::automock)]
#[async_trait::async_trait]
pub trait AdaptiveEngine: Send + Sync {
    /// Load a manifest and resolve once metadata is available.
    async fn load(
        &self,
        manifest: Url,
    ) -> Result<MediaMetadata, PlaybackError>;

    /// The renditions ladder parsed from the manifest.
    fn levels(&self) -> Vec<QualityLevel>;

    /// Currently selected ladder index, if known yet.
    fn current_level(&self) -> Option<usize>;

    /// Pin a level, or hand selection back to bandwidth estimation.
    fn set_level(&self, selection: QualitySelection);

    fn buffered(&self) -> Vec<BufferedRange>;

    /// Tear down the session. Idempotent.
    fn detach(&self);
}
