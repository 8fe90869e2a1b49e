//! Playback phase and snapshot types observed by overlay layers.

use std::time::Duration;

/// Discrete playback phase of a single video instance.
///
/// Transition rules live in the engine; this type is the shared vocabulary
/// between the engine and anything rendering overlays. `Stalled` is
/// buffering that has exceeded the configured grace period and warrants
/// user-visible feedback; `Error` and `Ended` are terminal for the instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Paused,
    Buffering,
    Stalled,
    Error,
    Ended,
}

impl PlaybackPhase {
    /// Terminal phases require a fresh load (retry) or disposal to leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackPhase::Error | PlaybackPhase::Ended)
    }

    /// Whether a seek command is meaningful in this phase.
    pub fn can_seek(&self) -> bool {
        matches!(
            self,
            PlaybackPhase::Ready
                | PlaybackPhase::Playing
                | PlaybackPhase::Paused
                | PlaybackPhase::Buffering
        )
    }

    /// Whether the instance currently holds decode resources.
    pub fn holds_resources(&self) -> bool {
        !matches!(self, PlaybackPhase::Idle | PlaybackPhase::Error)
    }
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlaybackPhase::Idle => "idle",
            PlaybackPhase::Loading => "loading",
            PlaybackPhase::Ready => "ready",
            PlaybackPhase::Playing => "playing",
            PlaybackPhase::Paused => "paused",
            PlaybackPhase::Buffering => "buffering",
            PlaybackPhase::Stalled => "stalled",
            PlaybackPhase::Error => "error",
            PlaybackPhase::Ended => "ended",
        };
        write!(f, "{name}")
    }
}

/// A contiguous buffered span of the timeline, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferedRange {
    pub start: f64,
    pub end: f64,
}

impl BufferedRange {
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One renditions ladder entry reported by the adaptive engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityLevel {
    pub height: u32,
    pub bitrate: u64,
    pub label: String,
}

/// Selected rendition: automatic (bandwidth-driven) or pinned to a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QualitySelection {
    #[default]
    Auto,
    Level(usize),
}

impl QualitySelection {
    /// Convention used on the wire and in config files: `-1` means auto.
    pub fn from_index(index: i64) -> Self {
        if index < 0 {
            QualitySelection::Auto
        } else {
            QualitySelection::Level(index as usize)
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, QualitySelection::Auto)
    }
}

/// Classification of a playback failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaybackErrorKind {
    /// Transient transport failure; the engine retries once before
    /// surfacing it.
    Network,
    /// The media was fetched but could not be decoded.
    Decode,
    /// Neither native nor adaptive playback is possible for the source.
    NotSupported,
    /// The load was cancelled (item released mid-attach).
    Aborted,
    /// Anything the media layer could not classify.
    Unknown,
}

impl PlaybackErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlaybackErrorKind::Network)
    }
}

/// A surfaced playback failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackError {
    pub kind: PlaybackErrorKind,
    pub message: String,
    /// Whether the caller should offer a retry action for this failure.
    pub recoverable: bool,
}

impl PlaybackError {
    pub fn new(kind: PlaybackErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            recoverable: kind.is_retryable(),
        }
    }
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Point-in-time view of one video's playback, consumed by overlays.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackSnapshot {
    pub phase: PlaybackPhase,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub buffered_ranges: Vec<BufferedRange>,
    pub quality: QualitySelection,
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub last_error: Option<PlaybackError>,
}

impl PlaybackSnapshot {
    /// Fraction of the timeline played, if the duration is known.
    pub fn progress(&self) -> Option<f64> {
        let duration = self.duration?;
        if duration <= 0.0 {
            return None;
        }
        Some((self.current_time / duration).clamp(0.0, 1.0))
    }

    /// Fraction of the timeline buffered past the playhead.
    pub fn buffered_fraction(&self) -> Option<f64> {
        let duration = self.duration?;
        if duration <= 0.0 {
            return None;
        }
        let end = self
            .buffered_ranges
            .iter()
            .filter(|r| r.start <= self.current_time)
            .map(|r| r.end)
            .fold(self.current_time, f64::max);
        Some((end / duration).clamp(0.0, 1.0))
    }

    pub fn position(&self) -> Duration {
        Duration::from_secs_f64(self.current_time.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases() {
        assert!(PlaybackPhase::Error.is_terminal());
        assert!(PlaybackPhase::Ended.is_terminal());
        assert!(!PlaybackPhase::Stalled.is_terminal());
    }

    #[test]
    fn quality_from_wire_index() {
        assert_eq!(QualitySelection::from_index(-1), QualitySelection::Auto);
        assert_eq!(
            QualitySelection::from_index(2),
            QualitySelection::Level(2)
        );
    }

    #[test]
    fn progress_clamps_and_requires_duration() {
        let mut snap = PlaybackSnapshot {
            current_time: 30.0,
            ..Default::default()
        };
        assert_eq!(snap.progress(), None);
        snap.duration = Some(20.0);
        assert_eq!(snap.progress(), Some(1.0));
    }

    #[test]
    fn buffered_fraction_uses_range_past_playhead() {
        let snap = PlaybackSnapshot {
            current_time: 5.0,
            duration: Some(10.0),
            buffered_ranges: vec![
                BufferedRange { start: 0.0, end: 8.0 },
                BufferedRange { start: 9.0, end: 10.0 },
            ],
            ..Default::default()
        };
        assert_eq!(snap.buffered_fraction(), Some(0.8));
    }

    #[test]
    fn network_errors_are_recoverable_by_default() {
        let err = PlaybackError::new(PlaybackErrorKind::Network, "timeout");
        assert!(err.recoverable);
        let err = PlaybackError::new(PlaybackErrorKind::Decode, "bad nal");
        assert!(!err.recoverable);
    }
}
