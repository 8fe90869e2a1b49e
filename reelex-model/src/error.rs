use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidItem(String),
    InvalidSource(String),
    InvalidRange(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidItem(msg) => write!(f, "invalid item: {msg}"),
            ModelError::InvalidSource(msg) => {
                write!(f, "invalid source: {msg}")
            }
            ModelError::InvalidRange(msg) => write!(f, "invalid range: {msg}"),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
