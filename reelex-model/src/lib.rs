//! Core data model definitions shared across Reelex crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod item;
pub mod playback;
pub mod prelude;
pub mod resume;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::{AuthorId, VideoId};
pub use item::{Author, EngagementStats, FeedItem, MediaSources};
pub use playback::{
    BufferedRange, PlaybackError, PlaybackErrorKind, PlaybackPhase,
    PlaybackSnapshot, QualityLevel, QualitySelection,
};
pub use resume::ResumeHint;
