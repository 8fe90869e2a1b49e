//! Engine/overlay focused snapshot of the types surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in reelex-engine or other presentation layers.

pub use super::error::{ModelError, Result as ModelResult};
pub use super::ids::{AuthorId, VideoId};
pub use super::item::{Author, EngagementStats, FeedItem, MediaSources};
pub use super::playback::{
    BufferedRange, PlaybackError, PlaybackErrorKind, PlaybackPhase,
    PlaybackSnapshot, QualityLevel, QualitySelection,
};
pub use super::resume::ResumeHint;
