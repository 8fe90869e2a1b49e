pub mod feed;
pub mod gesture;
pub mod playback;

use feed::{ActivationConfig, ScrollConfig};
use gesture::GestureConfig;
use playback::PlaybackConfig;
use serde::{Deserialize, Serialize};

/// Process-wide playback preferences injected at engine construction.
///
/// This replaces any notion of a global mute singleton: the policy is a
/// plain value the host passes in and may swap by rebuilding the engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerPolicy {
    /// Whether the active item starts playing without a user gesture.
    pub autoplay: bool,
    /// Whether playback starts muted. Mobile surfaces generally require
    /// muted autoplay until the first user gesture.
    pub start_muted: bool,
    /// Initial volume, `0.0..=1.0`.
    pub default_volume: f64,
}

impl Default for PlayerPolicy {
    fn default() -> Self {
        Self {
            autoplay: true,
            start_muted: true,
            default_volume: 1.0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub scroll: ScrollConfig,
    pub activation: ActivationConfig,
    pub playback: PlaybackConfig,
    pub policy: PlayerPolicy,
}

impl EngineConfig {
    /// Run guard-rail validation, returning tuning warnings on success.
    pub fn validate(
        &self,
    ) -> Result<
        crate::validation::ConfigWarnings,
        crate::validation::ConfigGuardRailError,
    > {
        crate::validation::validate(self)
    }
}
