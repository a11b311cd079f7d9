//! Error types for board operations.

use crate::elements::{ElementId, ElementKind, ElementProperty};
use thiserror::Error;

/// Malformed operation input. The operation is rejected and the board is
/// left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Element not found: {0}")]
    UnknownElement(ElementId),
    #[error("Element already exists: {0}")]
    DuplicateElement(ElementId),
    #[error("Height is not a number: {0:?}")]
    NonNumericHeight(String),
    #[error("Unknown element property: {0}")]
    UnknownProperty(String),
    #[error("Property {property} is not supported by {kind} elements")]
    UnsupportedProperty {
        property: ElementProperty,
        kind: ElementKind,
    },
    #[error("Invalid value for {property}: {reason}")]
    InvalidValue {
        property: ElementProperty,
        reason: String,
    },
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

/// A history patch could not be applied to the current state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatchApplyError {
    #[error("Path not found: {0}")]
    PathNotFound(String),
    #[error("Parent of {0} is not an object or array")]
    NotAContainer(String),
    #[error("Invalid array index in {0}")]
    BadIndex(String),
    #[error("Patched snapshot is malformed: {0}")]
    Malformed(String),
}

/// Board errors.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    PatchApply(#[from] PatchApplyError),
    #[error("History invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
