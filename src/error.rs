//! Error types for the gridstore command runner

use gridstore_core::SheetError;
use thiserror::Error;

/// Errors that can occur while running a command script
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Line {line}: {source}")]
    Sheet {
        line: usize,
        #[source]
        source: SheetError,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl ScriptError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ScriptError::Parse { line, .. } | ScriptError::Sheet { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;
