use serde::{Deserialize, Serialize};

/// Scroll and virtualization tuning for the vertical feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Items kept mounted beyond the viewport on each side. Raising this
    /// smooths fast flings at the cost of DOM/memory churn.
    pub overscan: usize,
    /// Quiet window (ms) with no scroll events before the controller
    /// reports `is_scrolling = false` and commits the rest index.
    pub quiet_period_ms: u64,
    /// Time constant (ms) of the exponential recency weighting applied to
    /// instantaneous scroll velocity samples.
    pub velocity_tau_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            overscan: 2,
            quiet_period_ms: 150,
            velocity_tau_ms: 100,
        }
    }
}

/// Activation window policy: which mounted items may hold live decode
/// resources around the active index.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Indices ahead of the active item eligible for preload.
    pub preload_ahead: usize,
    /// Indices behind the active item eligible for preload.
    pub preload_behind: usize,
    /// Hard cap on concurrently live media resources. Mobile surfaces
    /// misbehave past a handful of decoders; exceeding this is a
    /// correctness bug, not a tuning choice.
    pub max_live_resources: usize,
    /// Remaining-items threshold at which the orchestrator requests the
    /// next page from the content source.
    pub load_more_threshold: usize,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            preload_ahead: 2,
            preload_behind: 1,
            max_live_resources: 3,
            load_more_threshold: 3,
        }
    }
}
