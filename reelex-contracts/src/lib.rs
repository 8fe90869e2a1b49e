//! Trait surfaces that describe the collaborators a Reelex engine is wired
//! to: content pagination, decodable media surfaces, adaptive-bitrate
//! strategies, and resume-hint persistence. The engine depends only on
//! these contracts and never reaches past them.

pub mod adaptive;
pub mod content;
pub mod media;
pub mod resume;

/// Frequently used contract surfaces for engine and host crates.
pub mod prelude {
    pub use super::adaptive::AdaptiveEngine;
    pub use super::content::{ContentError, ContentSource, FeedPage};
    pub use super::media::{
        MediaBackend, MediaElement, MediaEvent, MediaMetadata,
    };
    pub use super::resume::ResumeStore;
    #[cfg(feature = "test-util")]
    pub use super::{
        adaptive::MockAdaptiveEngine,
        content::MockContentSource,
        media::{MockMediaBackend, MockMediaElement},
        resume::MockResumeStore,
    };
}
