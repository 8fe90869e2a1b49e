//! Opaque resume hints exchanged with the hosting application.
//!
//! The engine reports these when an item is released and accepts them back
//! on attach; it never treats them as authoritative playback state.

/// Last-known per-video state a caller may persist between sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResumeHint {
    /// Playhead position in seconds at release time.
    pub position: f64,
    pub is_liked: bool,
    pub is_saved: bool,
}

impl ResumeHint {
    pub fn at_position(position: f64) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}
