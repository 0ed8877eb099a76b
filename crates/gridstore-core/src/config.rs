//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Maximum number of undo entries kept by default
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Default upper bounds on sheet size.
pub const DEFAULT_MAX_ROWS: usize = 1_048_576;
pub const DEFAULT_MAX_COLUMNS: usize = 16_384;

/// Settings a worksheet and its action engine are created with.
///
/// Every field has a default, so a partial TOML table is enough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: usize,
    pub columns: usize,
    /// Inserts that would grow the sheet past these fail with `StructuralLimit`.
    pub max_rows: usize,
    pub max_columns: usize,
    pub default_row_height: u16,
    pub default_column_width: u16,
    pub undo_limit: usize,
    /// Whether the worksheet carries row/column outline groups.
    pub outlines: bool,
    /// Refit auto-size row heights when cell data changes.
    pub auto_row_height: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            columns: 100,
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
            default_row_height: 20,
            default_column_width: 70,
            undo_limit: DEFAULT_UNDO_LIMIT,
            outlines: true,
            auto_row_height: true,
        }
    }
}

impl EngineConfig {
    /// A default configuration with the given sheet size.
    pub fn with_size(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SheetError::Config(format!(
                "sheet must have at least one row and column (got {}x{})",
                self.rows, self.columns
            )));
        }
        if self.rows > self.max_rows || self.columns > self.max_columns {
            return Err(SheetError::Config(format!(
                "sheet of {}x{} exceeds the maximum of {}x{}",
                self.rows, self.columns, self.max_rows, self.max_columns
            )));
        }
        if self.default_row_height == 0 || self.default_column_width == 0 {
            return Err(SheetError::Config(
                "default header sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_sheet() {
        let config = EngineConfig::with_size(0, 5);
        assert!(matches!(config.validate(), Err(SheetError::Config(_))));
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_size_above_maximum() {
        let config = EngineConfig {
            max_rows: 50,
            ..EngineConfig::with_size(60, 5)
        };
        assert!(matches!(config.validate(), Err(SheetError::Config(_))));
    }
}
