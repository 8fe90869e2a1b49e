//! Guard rails for engine configuration.
//!
//! Hard violations (a config the engine cannot run with) fail loading;
//! questionable-but-runnable tunings produce warnings the host can log.

use crate::models::EngineConfig;

/// A config the engine refuses to run with.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("activation.max_live_resources must be at least 1")]
    NoLiveResources,

    #[error("gesture.{field} must be positive")]
    NonPositiveThreshold { field: &'static str },

    #[error("policy.default_volume must be within 0.0..=1.0")]
    VolumeOutOfRange,
}

/// One advisory finding about a runnable config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

/// All advisory findings from a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigWarnings(pub Vec<ConfigWarning>);

impl ConfigWarnings {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(ConfigWarning {
            field,
            message: message.into(),
        });
    }

    /// Emit each warning through tracing at warn level.
    pub fn log(&self) {
        for warning in &self.0 {
            tracing::warn!(field = warning.field, "{}", warning.message);
        }
    }
}

pub fn validate(
    config: &EngineConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    if config.activation.max_live_resources == 0 {
        return Err(ConfigGuardRailError::NoLiveResources);
    }
    for (field, value) in [
        ("movement_threshold_px", config.gesture.movement_threshold_px),
        ("swipe_distance_px", config.gesture.swipe_distance_px),
        (
            "swipe_velocity_px_per_ms",
            config.gesture.swipe_velocity_px_per_ms,
        ),
    ] {
        if value <= 0.0 {
            return Err(ConfigGuardRailError::NonPositiveThreshold { field });
        }
    }
    if !(0.0..=1.0).contains(&config.policy.default_volume) {
        return Err(ConfigGuardRailError::VolumeOutOfRange);
    }

    let mut warnings = ConfigWarnings::default();

    let window = config.activation.preload_ahead.max(config.activation.preload_behind);
    if window > config.scroll.overscan {
        warnings.push(
            "activation.preload_ahead",
            format!(
                "preload window ({window}) exceeds scroll.overscan \
                 ({}); out-of-window items are never mounted, so the extra \
                 preload slots will sit unused",
                config.scroll.overscan
            ),
        );
    }
    if config.activation.max_live_resources
        > config.activation.preload_ahead + config.activation.preload_behind + 1
    {
        warnings.push(
            "activation.max_live_resources",
            "budget is larger than the preload window can ever fill",
        );
    }
    if !(150..=500).contains(&config.gesture.long_press_delay_ms) {
        warnings.push(
            "gesture.long_press_delay_ms",
            format!(
                "{} ms is outside the 150-500 ms range that tracks well on \
                 touch surfaces",
                config.gesture.long_press_delay_ms
            ),
        );
    }
    if config.scroll.quiet_period_ms < 50 {
        warnings.push(
            "scroll.quiet_period_ms",
            "quiet periods under 50 ms commit mid-gesture on most surfaces",
        );
    }

    Ok(warnings)
}
