//! Headless feed playback engine.
//!
//! Reelex decides, as a user scrolls or swipes through an unbounded list of
//! short vertical videos, which single video is active (decoding, playing),
//! which neighbors may hold live media resources, how pointer input becomes
//! discrete navigation with snap semantics, and how per-video playback state
//! is tracked and recovered from failure.
//!
//! The engine is deliberately rendering-free. Hosts feed it pointer, scroll,
//! and media events; it answers with [`EngineEvent`]s to render and
//! [`Effect`]s for the async driver ([`runtime::FeedRuntime`]) to execute
//! against the [`reelex_contracts`] collaborators.

pub mod common;
pub mod domains;
pub mod engine;
pub mod infra;
pub mod orchestrator;
pub mod runtime;

pub use common::messages::{
    Effect, EngineEvent, EngineMessage, EngineOutput, PlayerCommand, TimerId,
};
pub use domains::feed::messages::FeedMessage;
pub use domains::feed::scroll::{ScrollDirection, ScrollState};
pub use domains::gesture::messages::{
    GestureEvent, Point, PointerEvent, PointerEventKind, SwipeDirection,
    TapZone,
};
pub use domains::gesture::recognizer::SeekBarRegion;
pub use domains::media::messages::MediaMessage;
pub use domains::player::machine::{
    InvalidTransition, PlaybackEvent, PlayerStateMachine,
};
pub use engine::{EngineError, FeedEngine};
pub use infra::time::{SystemTimeProvider, TimeProvider, VirtualTimeProvider};
pub use orchestrator::Interaction;
pub use runtime::{FeedRuntime, RuntimeHandle};
