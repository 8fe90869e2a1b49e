//! Persistence contract for per-video resume hints.

use reelex_model::ids::VideoId;
use reelex_model::resume::ResumeHint;

/// Host-owned store for last-known position and liked/saved flags.
///
/// The engine writes a hint whenever an item leaves the activation window
/// and reads one back on attach; hints are advisory, never authoritative.
pub trait ResumeStore: Send + Sync {
    fn load(&self, id: &VideoId) -> Option<ResumeHint>;

    fn store(&self, id: &VideoId, hint: ResumeHint);
}

#[cfg(feature = "test-util")]
mockall::mock! {
    pub ResumeStore {}

    impl ResumeStore for ResumeStore {
        fn load(&self, id: &VideoId) -> Option<ResumeHint>;
        fn store(&self, id: &VideoId, hint: ResumeHint);
    }
}
