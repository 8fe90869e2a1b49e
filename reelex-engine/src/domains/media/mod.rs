pub mod controller;
pub mod messages;

pub use controller::{AttachLoader, MediaResourceController};
