use serde::{Deserialize, Serialize};

/// Gesture recognizer thresholds. Everything here is surface-tunable:
/// callers adjust for device class and DPI rather than relying on
/// hard-coded constants inside the recognizer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum pointer travel (px) for a press to still count as a tap or
    /// long-press. Beyond this the session becomes a swipe candidate.
    pub movement_threshold_px: f32,
    /// Window (ms) after a tap in which a second tap upgrades the pair to
    /// a double tap. The single tap is withheld until this lapses.
    pub double_tap_window_ms: u64,
    /// Maximum distance (px) between two taps for them to pair up.
    pub double_tap_radius_px: f32,
    /// Hold time (ms) before an unmoved press becomes a long press.
    /// Sensible range is 150–500 depending on surface; released or moved
    /// presses cancel the hold.
    pub long_press_delay_ms: u64,
    /// Net travel (px) that commits a swipe regardless of release speed.
    pub swipe_distance_px: f32,
    /// Release velocity (px/ms) that commits a swipe regardless of
    /// distance.
    pub swipe_velocity_px_per_ms: f32,
    /// Vertical grab slop around the seek bar, as a multiple of its
    /// visual height. Pointers landing inside it are owned exclusively by
    /// seek-drag recognition for the whole session.
    pub seek_bar_tolerance_multiplier: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            movement_threshold_px: 10.0,
            double_tap_window_ms: 300,
            double_tap_radius_px: 64.0,
            long_press_delay_ms: 400,
            swipe_distance_px: 50.0,
            swipe_velocity_px_per_ms: 0.3,
            seek_bar_tolerance_multiplier: 7.0,
        }
    }
}
