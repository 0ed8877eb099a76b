//! Error types for the grid data structures.

use thiserror::Error;

use crate::address::{CellPosition, RangePosition};

/// Errors raised by grid storage, headers and range registries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Operation would split merged range {0}")]
    RangeIntersection(RangePosition),

    #[error("Cell {0} is read-only")]
    ReadonlyViolation(CellPosition),

    #[error("Structural limit: {0}")]
    StructuralLimit(String),

    #[error("Name not found: {0}")]
    NameNotFound(String),

    #[error("Name already defined: {0}")]
    NameAlreadyDefined(String),

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("No outline group at {start} (+{count})")]
    OutlineNotFound { start: usize, count: usize },
}

impl GridError {
    /// Whether this error is a per-cell data failure that bulk actions forward
    /// instead of aborting.
    pub fn is_cell_level(&self) -> bool {
        matches!(self, GridError::ReadonlyViolation(_))
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
