//! Data actions: single cells, value blocks, clears and grid pastes.

use gridstore_grid::{CellInput, CellPosition, CellValue, GridContent, PartialGrid, RangePosition};

use super::{Doable, Reusable, Undoable, done};
use crate::error::{Result, SheetError};
use crate::worksheet::{CellDataBackup, Worksheet};

/// Write user input to one cell.
///
/// A read-only target is reported on the worksheet event channel and the
/// action completes without a change.
#[derive(Clone, Debug)]
pub struct SetCellData {
    pub pos: CellPosition,
    pub input: CellInput,
    backup: Option<Option<CellDataBackup>>,
}

impl SetCellData {
    pub fn new(pos: CellPosition, input: CellInput) -> Self {
        Self {
            pos,
            input,
            backup: None,
        }
    }

    /// Parse `text` the way typed input is parsed.
    pub fn from_text(pos: CellPosition, text: &str) -> Self {
        Self::new(pos, CellInput::parse(text))
    }
}

impl Doable for SetCellData {
    fn name(&self) -> &'static str {
        "SetCellData"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let backup = match sheet.set_cell_data(self.pos, self.input.clone()) {
            Ok(backup) => Some(backup),
            Err(SheetError::Grid(error)) if error.is_cell_level() => {
                sheet.report_cell_error(self.pos, error);
                None
            }
            Err(error) => return Err(error),
        };
        tracing::debug!(cell = %self.pos, "cell data set");
        self.backup = Some(backup);
        Ok(())
    }
}

impl Undoable for SetCellData {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        match done(&self.backup, self.name())? {
            Some(backup) => sheet.restore_cell_data(backup),
            None => Ok(()),
        }
    }
}

/// Write a block of values with its top-left corner at `origin`.
#[derive(Clone, Debug)]
pub struct SetRangeData {
    pub origin: CellPosition,
    pub values: Vec<Vec<Option<CellValue>>>,
    backup: Option<PartialGrid>,
}

impl SetRangeData {
    pub fn new(origin: CellPosition, values: Vec<Vec<Option<CellValue>>>) -> Self {
        Self {
            origin,
            values,
            backup: None,
        }
    }
}

impl Doable for SetRangeData {
    fn name(&self) -> &'static str {
        "SetRangeData"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.set_range_data(self.origin, &self.values)?);
        Ok(())
    }
}

impl Undoable for SetRangeData {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let backup = done(&self.backup, self.name())?;
        sheet.set_partial_grid(backup, backup.range().start(), GridContent::DATA)
    }
}

/// Clear values and formulas in a range.
#[derive(Clone, Debug)]
pub struct RemoveRangeData {
    pub range: RangePosition,
    backup: Option<PartialGrid>,
}

impl RemoveRangeData {
    pub fn new(range: RangePosition) -> Self {
        Self {
            range,
            backup: None,
        }
    }
}

impl Doable for RemoveRangeData {
    fn name(&self) -> &'static str {
        "RemoveRangeData"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.remove_range_data(self.range)?);
        Ok(())
    }
}

impl Undoable for RemoveRangeData {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let backup = done(&self.backup, self.name())?;
        sheet.set_partial_grid(backup, backup.range().start(), GridContent::DATA)
    }
}

impl Reusable for RemoveRangeData {
    fn range(&self) -> RangePosition {
        self.range
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range)
    }
}

/// Paste a [`PartialGrid`] onto `target`, tiling it when `target` is larger.
#[derive(Clone, Debug)]
pub struct SetPartialGrid {
    pub target: RangePosition,
    pub grid: PartialGrid,
    pub content: GridContent,
    backup: Option<PartialGrid>,
}

impl SetPartialGrid {
    pub fn new(target: RangePosition, grid: PartialGrid, content: GridContent) -> Self {
        Self {
            target,
            grid,
            content,
            backup: None,
        }
    }

    /// Paste at `at` without tiling.
    pub fn at(at: CellPosition, grid: PartialGrid) -> Self {
        let target = RangePosition::new(at.row, at.col, grid.rows(), grid.cols());
        Self::new(target, grid, GridContent::all())
    }
}

impl Doable for SetPartialGrid {
    fn name(&self) -> &'static str {
        "SetPartialGrid"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let target = sheet.fix_range(self.target)?;
        let widened = sheet.cells().expand_to_merges(target);
        let backup = sheet.partial_grid(widened, GridContent::all())?;
        if target.rows > self.grid.rows() || target.cols > self.grid.cols() {
            sheet.fill_partial_grid(&self.grid, target, self.content)?;
        } else {
            sheet.set_partial_grid(&self.grid, target.start(), self.content)?;
        }
        tracing::debug!(%target, "grid pasted");
        self.backup = Some(backup);
        Ok(())
    }
}

impl Undoable for SetPartialGrid {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let backup = done(&self.backup, self.name())?;
        sheet.restore_partial_grid(backup)
    }
}

impl Reusable for SetPartialGrid {
    fn range(&self) -> RangePosition {
        self.target
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range, self.grid.clone(), self.content)
    }
}
