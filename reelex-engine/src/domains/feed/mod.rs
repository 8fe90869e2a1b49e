pub mod activation;
pub mod messages;
pub mod scroll;

pub use activation::{ActivationPlan, plan, target_set};
pub use scroll::{ScrollController, ScrollDirection, ScrollState};
