//! Error types for the worksheet and action engine.

use thiserror::Error;

use gridstore_grid::GridError;

/// Errors that can occur while mutating a worksheet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Action {0} has not been done")]
    NotDone(&'static str),
}

impl SheetError {
    /// Structural-limit violations abort before anything changes.
    pub fn is_structural_limit(&self) -> bool {
        matches!(self, SheetError::Grid(GridError::StructuralLimit(_)))
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
