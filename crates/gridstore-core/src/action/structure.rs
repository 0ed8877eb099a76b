use gridstore_grid::{Axis, GridContent, PartialGrid, RangePosition};

use super::{Doable, Reusable, Undoable, done};
use crate::error::{Result, SheetError};
use crate::worksheet::{StructuralBackup, Worksheet};

/// Insert `count` rows or columns before `at`.
#[derive(Clone, Debug)]
pub struct InsertAction {
    pub axis: Axis,
    pub at: usize,
    pub count: usize,
    done: bool,
}

impl InsertAction {
    pub fn new(axis: Axis, at: usize, count: usize) -> Self {
        Self {
            axis,
            at,
            count,
            done: false,
        }
    }

    pub fn rows(at: usize, count: usize) -> Self {
        Self::new(Axis::Row, at, count)
    }

    pub fn columns(at: usize, count: usize) -> Self {
        Self::new(Axis::Column, at, count)
    }
}

impl Doable for InsertAction {
    fn name(&self) -> &'static str {
        "Insert"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.insert(self.axis, self.at, self.count)?;
        tracing::debug!(axis = self.axis.name(), at = self.at, count = self.count, "insert done");
        self.done = true;
        Ok(())
    }
}

impl Undoable for InsertAction {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        if !self.done {
            return Err(SheetError::NotDone(self.name()));
        }
        if self.count > 0 {
            sheet.delete(self.axis, self.at, self.count)?;
        }
        Ok(())
    }
}

impl Reusable for InsertAction {
    fn range(&self) -> RangePosition {
        self.axis.band(self.at, self.count)
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        let (at, count) = self.axis.span(range);
        Self::new(self.axis, at, count)
    }
}

/// Delete `count` rows or columns from `at`.
///
/// Undo puts back the cells, merges, header metadata, named and highlight
/// ranges and outline groups the deletion removed or shrank.
#[derive(Clone, Debug)]
pub struct RemoveAction {
    pub axis: Axis,
    pub at: usize,
    pub count: usize,
    backup: Option<(PartialGrid, StructuralBackup)>,
}

impl RemoveAction {
    pub fn new(axis: Axis, at: usize, count: usize) -> Self {
        Self {
            axis,
            at,
            count,
            backup: None,
        }
    }

    pub fn rows(at: usize, count: usize) -> Self {
        Self::new(Axis::Row, at, count)
    }

    pub fn columns(at: usize, count: usize) -> Self {
        Self::new(Axis::Column, at, count)
    }
}

impl Doable for RemoveAction {
    fn name(&self) -> &'static str {
        "Remove"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        // Merges crossing the band shrink; the snapshot covers them whole.
        let band = sheet.fix_range(self.axis.band(self.at, self.count))?;
        let widened = sheet.cells().expand_to_merges(band);
        let cells = sheet.partial_grid(widened, GridContent::all())?;
        let structure = sheet.delete(self.axis, self.at, self.count)?;
        tracing::debug!(axis = self.axis.name(), at = self.at, count = self.count, "remove done");
        self.backup = Some((cells, structure));
        Ok(())
    }
}

impl Undoable for RemoveAction {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let (cells, structure) = done(&self.backup, self.name())?;
        sheet.insert(self.axis, self.at, self.count)?;
        sheet.restore_partial_grid(cells)?;
        sheet.restore_structure(self.axis, self.at, structure)
    }
}

impl Reusable for RemoveAction {
    fn range(&self) -> RangePosition {
        self.axis.band(self.at, self.count)
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        let (at, count) = self.axis.span(range);
        Self::new(self.axis, at, count)
    }
}
