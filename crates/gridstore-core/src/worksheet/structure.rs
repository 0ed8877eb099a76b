//! Row/column insertion and deletion.
//!
//! One structural edit touches the cell store, the header table of its axis,
//! the range registries and the outlines; all of them are updated together.

use gridstore_grid::{
    Axis, GridError, Header, OutlineShiftBackup, RegistryShiftBackup,
};

use super::Worksheet;
use crate::error::Result;
use crate::events::WorksheetEvent;

/// What a deletion removed from the secondary structures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructuralBackup {
    pub headers: Vec<Header>,
    pub ranges: RegistryShiftBackup,
    pub outlines: Option<OutlineShiftBackup>,
}

impl Worksheet {
    /// Insert `count` rows or columns before index `at`.
    pub fn insert(&mut self, axis: Axis, at: usize, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let len = self.count(axis);
        let max = match axis {
            Axis::Row => self.config.max_rows,
            Axis::Column => self.config.max_columns,
        };
        if len.checked_add(count).is_none_or(|grown| grown > max) {
            return Err(GridError::StructuralLimit(format!(
                "cannot insert {} {}s into {} (maximum {})",
                count,
                axis.name(),
                len,
                max
            ))
            .into());
        }
        self.cells.insert(axis, at, count)?;
        self.headers_mut(axis).insert(at, count)?;
        self.ranges.adjust(axis, at, count, true);
        if let Some(outlines) = self.outlines.as_mut() {
            outlines.axis_mut(axis).adjust(at, count, true);
        }
        tracing::trace!(axis = axis.name(), at, count, "inserted");
        self.emit(WorksheetEvent::structural(axis, at, count, true));
        Ok(())
    }

    /// Delete `count` rows or columns starting at `at`.
    ///
    /// Deleting every remaining row or column is a `StructuralLimit` error
    /// raised before anything changes.
    pub fn delete(&mut self, axis: Axis, at: usize, count: usize) -> Result<StructuralBackup> {
        let len = self.count(axis);
        if count >= len {
            return Err(GridError::StructuralLimit(format!(
                "cannot delete all {} {}s",
                len,
                axis.name()
            ))
            .into());
        }
        self.headers(axis).check_band(at, count)?;

        self.cells.delete(axis, at, count)?;
        let headers = self.headers_mut(axis).delete(at, count)?;
        let ranges = self.ranges.adjust(axis, at, count, false);
        let outlines = self
            .outlines
            .as_mut()
            .map(|outlines| outlines.axis_mut(axis).adjust(at, count, false));
        tracing::trace!(axis = axis.name(), at, count, "deleted");
        self.emit(WorksheetEvent::structural(axis, at, count, false));
        Ok(StructuralBackup {
            headers,
            ranges,
            outlines,
        })
    }

    /// Put back what [`delete`](Self::delete) took from the secondary
    /// structures. The band must already be inserted again.
    pub fn restore_structure(
        &mut self,
        axis: Axis,
        at: usize,
        backup: &StructuralBackup,
    ) -> Result<()> {
        let count = backup.headers.len();
        self.headers_mut(axis).restore(at, backup.headers.clone())?;
        if let (Some(outlines), Some(saved)) = (self.outlines.as_mut(), &backup.outlines) {
            outlines.axis_mut(axis).restore(saved, at, count);
        }
        self.ranges.restore_named(&backup.ranges);
        self.ranges.restore_highlights(&backup.ranges);
        Ok(())
    }
}
