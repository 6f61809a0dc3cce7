//! Error types for the dissection solver.

use thiserror::Error;

use crate::shapes::{Position, Primitive};

/// Errors raised by catalog lookups and slot mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DissectionError {
    /// A shape name outside the fixed catalog.
    #[error("invalid shape: {0:?}")]
    InvalidShape(String),

    /// A slot was asked to give up a piece it does not hold.
    #[error("{primitive} is not present in {position}")]
    PrimitiveNotPresent {
        position: Position,
        primitive: Primitive,
    },
}

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, DissectionError>;
