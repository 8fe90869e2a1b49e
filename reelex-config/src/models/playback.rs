use serde::{Deserialize, Serialize};

/// Playback failure and stall policy.
///
/// Stall threshold and retry backoff are part of the public configuration
/// surface so hosts tune them per network profile instead of re-deriving
/// magic numbers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Buffering longer than this (ms) is reported as `stalled`, an
    /// error-adjacent phase that warrants user-visible feedback.
    pub stall_threshold_ms: u64,
    /// Delay (ms) before the automatic retry of a network failure.
    pub retry_backoff_ms: u64,
    /// Automatic retries for network-classified failures before the
    /// error surfaces. Decode and unsupported failures never retry.
    pub max_network_retries: u32,
    /// Step (seconds) for seek-forward/seek-backward commands issued
    /// without an explicit delta.
    pub seek_step_secs: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            stall_threshold_ms: 1_000,
            retry_backoff_ms: 1_000,
            max_network_retries: 1,
            seek_step_secs: 10.0,
        }
    }
}
