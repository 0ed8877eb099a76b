//! Sparse cell storage.
//!
//! Cells live in a row-major ordered map keyed by position, so a rectangular
//! query only walks the materialized cells of the rows it covers. Structural
//! edits re-key the cells after the edited band and keep merge spans and
//! back-references consistent.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use crate::address::{Axis, CellPosition, RangePosition};
use crate::cell::Cell;
use crate::error::{GridError, Result};

/// Sparse, resizable 2D container of cells.
#[derive(Clone, Debug, PartialEq)]
pub struct CellStore {
    cells: BTreeMap<CellPosition, Cell>,
    rows: usize,
    cols: usize,
}

impl CellStore {
    /// A store of `rows` x `cols`; both are raised to at least 1.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: BTreeMap::new(),
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// Count along `axis`.
    pub fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.cols,
        }
    }

    /// Number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn check_position(&self, pos: CellPosition) -> Result<()> {
        if pos.row < self.rows && pos.col < self.cols {
            Ok(())
        } else {
            Err(GridError::InvalidAddress(format!(
                "{} is outside a {}x{} grid",
                pos, self.rows, self.cols
            )))
        }
    }

    /// Resolve a range against the current bounds.
    pub fn fix_range(&self, range: RangePosition) -> Result<RangePosition> {
        range.clamp(self.rows, self.cols)
    }

    pub fn get(&self, pos: CellPosition) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn get_mut(&mut self, pos: CellPosition) -> Option<&mut Cell> {
        self.cells.get_mut(&pos)
    }

    /// Get the cell at `pos`, materializing it if needed.
    pub fn create_and_get(&mut self, pos: CellPosition) -> Result<&mut Cell> {
        self.check_position(pos)?;
        Ok(self.cells.entry(pos).or_default())
    }

    /// Store `cell` at `pos`, or release the slot when `cell` is default.
    pub fn put(&mut self, pos: CellPosition, cell: Cell) {
        if cell.is_default() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, cell);
        }
    }

    pub fn take(&mut self, pos: CellPosition) -> Option<Cell> {
        self.cells.remove(&pos)
    }

    /// Release the slot at `pos` if its cell no longer needs storage.
    pub fn release(&mut self, pos: CellPosition) {
        if self.cells.get(&pos).is_some_and(Cell::is_default) {
            self.cells.remove(&pos);
        }
    }

    /// Materialized cells inside `range`, row-major.
    pub fn cells_in(&self, range: RangePosition) -> impl Iterator<Item = (CellPosition, &Cell)> {
        let start = range.start();
        let end = range.end();
        self.cells
            .range(start..=end)
            .filter(move |(pos, _)| pos.col >= start.col && pos.col <= end.col)
            .map(|(pos, cell)| (*pos, cell))
    }

    /// Positions of materialized cells inside `range`.
    pub fn positions_in(&self, range: RangePosition) -> Vec<CellPosition> {
        self.cells_in(range).map(|(pos, _)| pos).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellPosition, &Cell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    /// Visit the cells of `range` row by row.
    ///
    /// With `skip_empty` only materialized cells are visited; otherwise every
    /// position is, with `None` for empty slots. Visiting a merge anchor
    /// advances the column cursor by its colspan, and merge interiors are never
    /// visited. The visitor stops the walk by returning `ControlFlow::Break`.
    pub fn iterate<F>(&self, range: RangePosition, skip_empty: bool, mut visitor: F) -> Result<()>
    where
        F: FnMut(CellPosition, Option<&Cell>) -> ControlFlow<()>,
    {
        let range = self.fix_range(range)?;
        if skip_empty {
            let mut skip_until: Option<CellPosition> = None;
            for (pos, cell) in self.cells_in(range) {
                if let Some(limit) = skip_until
                    && pos.row == limit.row
                    && pos.col < limit.col
                {
                    continue;
                }
                if cell.is_merge_interior() {
                    continue;
                }
                if visitor(pos, Some(cell)).is_break() {
                    return Ok(());
                }
                skip_until = (cell.colspan > 1)
                    .then(|| CellPosition::new(pos.row, pos.col + cell.colspan));
            }
            return Ok(());
        }

        for row in range.row..=range.end_row() {
            let mut col = range.col;
            while col <= range.end_col() {
                let cell = self.cells.get(&CellPosition::new(row, col));
                if cell.is_some_and(Cell::is_merge_interior) {
                    col += 1;
                    continue;
                }
                if visitor(CellPosition::new(row, col), cell).is_break() {
                    return Ok(());
                }
                col += cell.map_or(1, |c| c.colspan.max(1));
            }
        }
        Ok(())
    }

    /// The merge covering `pos`, if any.
    pub fn merge_at(&self, pos: CellPosition) -> Option<RangePosition> {
        let cell = self.cells.get(&pos)?;
        match cell.merge_anchor {
            Some(anchor) => self.cells.get(&anchor)?.merge_range(anchor),
            None => cell.merge_range(pos),
        }
    }

    /// Every merge intersecting `range` (full extents, deduplicated).
    pub fn merges_in(&self, range: RangePosition) -> Vec<RangePosition> {
        let mut merges: Vec<RangePosition> = Vec::new();
        for (pos, cell) in self.cells_in(range) {
            let merge = match cell.merge_anchor {
                Some(anchor) => self.cells.get(&anchor).and_then(|a| a.merge_range(anchor)),
                None => cell.merge_range(pos),
            };
            if let Some(merge) = merge
                && !merges.contains(&merge)
            {
                merges.push(merge);
            }
        }
        merges
    }

    /// Every merge in the sheet.
    pub fn all_merges(&self) -> Vec<RangePosition> {
        self.cells
            .iter()
            .filter_map(|(pos, cell)| cell.merge_range(*pos))
            .collect()
    }

    /// Grow `range` until no merge crosses its edge.
    pub fn expand_to_merges(&self, range: RangePosition) -> RangePosition {
        let mut range = range;
        loop {
            let grown = self
                .merges_in(range)
                .iter()
                .fold(range, |acc, merge| acc.union(merge));
            if grown == range {
                return range;
            }
            range = grown;
        }
    }

    /// Fail with `RangeIntersection` if a merge crosses the edge of `range`.
    pub fn check_no_partial_merge(&self, range: RangePosition) -> Result<()> {
        match self
            .merges_in(range)
            .into_iter()
            .find(|merge| !range.contains_range(merge))
        {
            Some(merge) => Err(GridError::RangeIntersection(merge)),
            None => Ok(()),
        }
    }

    /// Merge `range` into one cell anchored at its top-left corner.
    ///
    /// Merges fully inside `range` are absorbed; a merge crossing its edge is
    /// a `RangeIntersection`. Interior cells lose their data, style and borders.
    pub fn merge(&mut self, range: RangePosition) -> Result<()> {
        let range = self.fix_range(range)?;
        self.check_no_partial_merge(range)?;
        if range.is_single_cell() {
            return Ok(());
        }
        for merge in self.merges_in(range) {
            self.clear_merge_spans(merge);
        }
        for pos in self.positions_in(range) {
            if pos != range.start()
                && let Some(cell) = self.cells.get_mut(&pos)
            {
                let readonly = cell.readonly;
                *cell = Cell {
                    readonly,
                    ..Cell::default()
                };
            }
        }
        self.apply_merge_spans(range);
        Ok(())
    }

    /// Split every merge intersecting `range`. Returns the merges removed.
    pub fn unmerge(&mut self, range: RangePosition) -> Result<Vec<RangePosition>> {
        let range = self.fix_range(range)?;
        let merges = self.merges_in(range);
        for merge in &merges {
            self.clear_merge_spans(*merge);
        }
        Ok(merges)
    }

    /// Write span fields for `merge` without touching cell content.
    pub(crate) fn apply_merge_spans(&mut self, merge: RangePosition) {
        if merge.is_single_cell() {
            return;
        }
        let anchor = merge.start();
        for row in merge.row..=merge.end_row() {
            for col in merge.col..=merge.end_col() {
                let pos = CellPosition::new(row, col);
                let cell = self.cells.entry(pos).or_default();
                if pos == anchor {
                    cell.rowspan = merge.rows;
                    cell.colspan = merge.cols;
                    cell.merge_anchor = None;
                } else {
                    cell.rowspan = 0;
                    cell.colspan = 0;
                    cell.merge_anchor = Some(anchor);
                }
            }
        }
    }

    /// Reset span fields of every cell in `merge`, releasing emptied slots.
    pub(crate) fn clear_merge_spans(&mut self, merge: RangePosition) {
        for pos in self.positions_in(merge) {
            if let Some(cell) = self.cells.get_mut(&pos) {
                cell.clear_span();
            }
            self.release(pos);
        }
    }

    /// Insert `count` empty rows or columns before index `at`.
    ///
    /// Merges straddling `at` grow by `count`; the new cells inside them are
    /// created as interiors of the grown merge.
    pub fn insert(&mut self, axis: Axis, at: usize, count: usize) -> Result<()> {
        let len = self.count(axis);
        if at > len {
            return Err(GridError::InvalidAddress(format!(
                "cannot insert {} at {} of {}",
                axis.name(),
                at,
                len
            )));
        }
        if count == 0 {
            return Ok(());
        }
        let Some(grown) = len.checked_add(count) else {
            return Err(GridError::StructuralLimit(format!(
                "cannot insert {} {}s into {}",
                count,
                axis.name(),
                len
            )));
        };

        let straddling: Vec<RangePosition> = self
            .all_merges()
            .into_iter()
            .filter(|merge| {
                let (start, span) = axis.span(*merge);
                start < at && start + span > at
            })
            .collect();

        self.rekey(axis, at, |coord| coord + count);
        for cell in self.cells.values_mut() {
            if let Some(anchor) = cell.merge_anchor
                && axis.coord(anchor) >= at
            {
                cell.merge_anchor = Some(axis.with_coord(anchor, axis.coord(anchor) + count));
            }
        }
        match axis {
            Axis::Row => self.rows = grown,
            Axis::Column => self.cols = grown,
        }

        for merge in straddling {
            if let Some(grown) = merge.shifted(axis, at, count, true) {
                self.apply_merge_spans(grown);
            }
        }
        tracing::trace!(axis = axis.name(), at, count, "inserted band");
        Ok(())
    }

    /// Delete `count` rows or columns starting at `at`.
    ///
    /// Refuses (with `StructuralLimit`, before mutating) to delete every
    /// remaining row or column. Merges crossing the band are truncated to
    /// their surviving part.
    pub fn delete(&mut self, axis: Axis, at: usize, count: usize) -> Result<()> {
        let len = self.count(axis);
        if count == 0 {
            return Ok(());
        }
        if count >= len {
            return Err(GridError::StructuralLimit(format!(
                "cannot delete all {} {}s",
                len,
                axis.name()
            )));
        }
        if at >= len || at + count > len {
            return Err(GridError::InvalidRange(format!(
                "{}s {}..{} exceed {}",
                axis.name(),
                at,
                at + count,
                len
            )));
        }

        let band = axis.band(at, count);
        let affected = self.merges_in(band);
        for merge in &affected {
            self.clear_merge_spans(*merge);
        }

        let doomed: Vec<CellPosition> = self
            .cells
            .keys()
            .filter(|pos| {
                let c = axis.coord(**pos);
                c >= at && c < at + count
            })
            .copied()
            .collect();
        for pos in doomed {
            self.cells.remove(&pos);
        }

        self.rekey(axis, at + count, |coord| coord - count);
        for cell in self.cells.values_mut() {
            if let Some(anchor) = cell.merge_anchor
                && axis.coord(anchor) >= at + count
            {
                cell.merge_anchor = Some(axis.with_coord(anchor, axis.coord(anchor) - count));
            }
        }
        match axis {
            Axis::Row => self.rows -= count,
            Axis::Column => self.cols -= count,
        }

        for merge in affected {
            if let Some(survivor) = merge.shifted(axis, at, count, false) {
                self.apply_merge_spans(survivor);
            }
        }
        tracing::trace!(axis = axis.name(), at, count, "deleted band");
        Ok(())
    }

    /// Move every cell whose `axis` coordinate is at least `from` to `map(coord)`.
    fn rekey(&mut self, axis: Axis, from: usize, map: impl Fn(usize) -> usize) {
        let moving: Vec<(CellPosition, Cell)> = match axis {
            Axis::Row => {
                let tail = self.cells.split_off(&CellPosition::new(from, 0));
                tail.into_iter().collect()
            }
            Axis::Column => {
                let keys: Vec<CellPosition> = self
                    .cells
                    .keys()
                    .filter(|pos| pos.col >= from)
                    .copied()
                    .collect();
                keys.into_iter()
                    .filter_map(|pos| self.cells.remove(&pos).map(|cell| (pos, cell)))
                    .collect()
            }
        };
        for (pos, cell) in moving {
            let moved = axis.with_coord(pos, map(axis.coord(pos)));
            self.cells.insert(moved, cell);
        }
    }

    /// Check that every merge interior points at an anchor whose span covers
    /// it and holds no data or style of its own, that every anchor's span is
    /// fully populated, and that spans fit inside the grid.
    pub fn check_merge_integrity(&self) -> Result<()> {
        for (pos, cell) in &self.cells {
            if let Some(anchor) = cell.merge_anchor {
                if cell.has_data() || cell.style.is_some() {
                    return Err(GridError::RangeIntersection(RangePosition::cell(*pos)));
                }
                let covered = self
                    .cells
                    .get(&anchor)
                    .and_then(|a| a.merge_range(anchor))
                    .is_some_and(|merge| merge.contains(*pos));
                if !covered || cell.rowspan != 0 || cell.colspan != 0 {
                    return Err(GridError::RangeIntersection(RangePosition::cell(*pos)));
                }
            } else if let Some(merge) = cell.merge_range(*pos) {
                if merge.end_row() >= self.rows || merge.end_col() >= self.cols {
                    return Err(GridError::RangeIntersection(merge));
                }
                for inner in merge.positions() {
                    if inner == *pos {
                        continue;
                    }
                    let points_back = self
                        .cells
                        .get(&inner)
                        .is_some_and(|c| c.merge_anchor == Some(*pos));
                    if !points_back {
                        return Err(GridError::RangeIntersection(merge));
                    }
                }
            } else if cell.rowspan != 1 || cell.colspan != 1 {
                return Err(GridError::RangeIntersection(RangePosition::cell(*pos)));
            }
        }
        Ok(())
    }
}
