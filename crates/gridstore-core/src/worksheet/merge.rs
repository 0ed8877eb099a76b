//! Merging and range transfer (move/copy).

use gridstore_grid::{CellPosition, GridContent, GridError, PartialGrid, RangePosition};

use super::Worksheet;
use crate::error::Result;
use crate::events::WorksheetEvent;

impl Worksheet {
    /// Merge `range` into one cell anchored at its top-left corner.
    ///
    /// Returns a full snapshot of the range, which interior cells lose their
    /// content to.
    pub fn merge_range(&mut self, range: RangePosition) -> Result<PartialGrid> {
        let range = self.fix_range(range)?;
        self.cells.check_no_partial_merge(range)?;
        let backup = self.partial_grid(range, GridContent::all())?;
        self.cells.merge(range)?;
        tracing::debug!(%range, "merged");
        self.emit(WorksheetEvent::CellsChanged { range });
        Ok(backup)
    }

    /// Split every merge touching `range`. Returns a full snapshot of the
    /// range widened to those merges.
    pub fn unmerge_range(&mut self, range: RangePosition) -> Result<PartialGrid> {
        let range = self.fix_range(range)?;
        let widened = self.cells.expand_to_merges(range);
        let backup = self.partial_grid(widened, GridContent::all())?;
        self.cells.unmerge(widened)?;
        self.emit(WorksheetEvent::CellsChanged { range: widened });
        Ok(backup)
    }

    /// Write a snapshot back over the region it was captured from.
    pub fn restore_partial_grid(&mut self, backup: &PartialGrid) -> Result<()> {
        let origin = backup.range().start();
        self.set_partial_grid(backup, origin, GridContent::all())
    }

    /// Check that `source` can be lifted and `dest` (same size, top-left at
    /// `to`) written. Returns the resolved destination.
    fn check_transfer(&self, source: RangePosition, to: CellPosition, clears_source: bool) -> Result<RangePosition> {
        self.cells.check_no_partial_merge(source)?;
        let dest = self.fix_range(source.moved_to(to))?;
        self.cells.check_no_partial_merge(dest)?;
        let guarded = if clears_source {
            vec![source, dest]
        } else {
            vec![dest]
        };
        for range in guarded {
            if let Some((pos, _)) = self.cells.cells_in(range).find(|(_, c)| c.readonly) {
                return Err(GridError::ReadonlyViolation(pos).into());
            }
        }
        Ok(dest)
    }

    /// Copy everything in `source` so its top-left lands on `to`. Returns
    /// the prior state of the destination.
    pub fn copy_range(&mut self, source: RangePosition, to: CellPosition) -> Result<PartialGrid> {
        let source = self.fix_range(source)?;
        let dest = self.check_transfer(source, to, false)?;
        let content = self.partial_grid(source, GridContent::all())?;
        let backup = self.partial_grid(dest, GridContent::all())?;
        self.set_partial_grid(&content, to, GridContent::all())?;
        Ok(backup)
    }

    /// Move everything in `source` so its top-left lands on `to`, leaving the
    /// source empty. Returns `(moved content, prior destination)`.
    pub fn move_range(&mut self, source: RangePosition, to: CellPosition) -> Result<(PartialGrid, PartialGrid)> {
        let source = self.fix_range(source)?;
        let dest = self.check_transfer(source, to, true)?;
        let content = self.partial_grid(source, GridContent::all())?;
        let backup = self.partial_grid(dest, GridContent::all())?;
        let blank = PartialGrid::blank(source.rows, source.cols, GridContent::all());
        self.set_partial_grid(&blank, source.start(), GridContent::all())?;
        self.set_partial_grid(&content, to, GridContent::all())?;
        tracing::debug!(%source, %dest, "moved");
        Ok((content, backup))
    }
}
