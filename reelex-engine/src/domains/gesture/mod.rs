pub mod messages;
pub mod recognizer;

pub use recognizer::{GestureRecognizer, RecognizerUpdate, SeekBarRegion};
