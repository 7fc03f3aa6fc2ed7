//! Course-store errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    CourseNotFound,
    InvalidQuery,
    Unavailable,
    Load,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Message matches what the tools report back to the model.
    pub fn course_not_found(name: &str) -> Self {
        Self::new(
            StoreErrorKind::CourseNotFound,
            format!("No course found matching '{name}'"),
        )
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidQuery, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Load, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::load(format!("invalid course catalog json: {error}"))
    }
}
