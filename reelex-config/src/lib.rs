//! Shared configuration library for Reelex.
//!
//! This crate centralizes every tunable the engine exposes: gesture
//! thresholds, scroll/snap tuning, activation window policy, playback
//! retry/stall policy, and the injected player policy (autoplay/mute).
//! Hosts construct an [`EngineConfig`] in code, load one from a TOML/JSON
//! file, or pull overrides from the environment; validation runs the same
//! guard rails in every case so there is a single source of truth for
//! defaults and limits.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoadError, ConfigSource, load_from_env};
pub use models::feed::{ActivationConfig, ScrollConfig};
pub use models::gesture::GestureConfig;
pub use models::playback::PlaybackConfig;
pub use models::{EngineConfig, PlayerPolicy};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
