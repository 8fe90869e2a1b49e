pub mod machine;

pub use machine::{InvalidTransition, PlaybackEvent, PlayerStateMachine};
