//! Immutable rectangular snapshots used as backup and transfer payloads.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::address::{CellPosition, RangePosition};
use crate::cell::{Cell, CellValue};
use crate::error::Result;
use crate::store::CellStore;

bitflags! {
    /// Which parts of a cell a [`PartialGrid`] carries.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GridContent: u8 {
        /// Value, formula, data format, body type and read-only flag.
        const DATA = 1 << 0;
        const STYLE = 1 << 1;
        const BORDERS = 1 << 2;
        const MERGES = 1 << 3;
    }
}

/// A sparse snapshot of a rectangular region.
///
/// Only cells holding something in the captured parts are stored, so capture
/// and restore cost is proportional to materialized cells rather than area.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialGrid {
    origin: CellPosition,
    rows: usize,
    cols: usize,
    content: GridContent,
    /// Keyed by position relative to `origin`.
    cells: BTreeMap<(usize, usize), Cell>,
    /// Every merge that touched the region, in source coordinates.
    merges: Vec<RangePosition>,
}

impl PartialGrid {
    /// Snapshot `range` of `store`, keeping only the parts in `content`.
    pub fn capture(store: &CellStore, range: RangePosition, content: GridContent) -> Result<Self> {
        let range = store.fix_range(range)?;
        let mut cells = BTreeMap::new();
        for (pos, cell) in store.cells_in(range) {
            let snapshot = project(cell, content);
            if !snapshot.is_default() {
                cells.insert((pos.row - range.row, pos.col - range.col), snapshot);
            }
        }
        let merges = if content.contains(GridContent::MERGES) {
            store.merges_in(range)
        } else {
            Vec::new()
        };
        Ok(Self {
            origin: range.start(),
            rows: range.rows,
            cols: range.cols,
            content,
            cells,
            merges,
        })
    }

    /// A data-only grid from rows of values, anchored at A1.
    pub fn from_values(values: Vec<Vec<Option<CellValue>>>) -> Self {
        let rows = values.len().max(1);
        let cols = values.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let mut cells = BTreeMap::new();
        for (r, row) in values.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                if let Some(value) = value {
                    cells.insert((r, c), Cell::new_value(value));
                }
            }
        }
        Self {
            origin: CellPosition::default(),
            rows,
            cols,
            content: GridContent::DATA,
            cells,
            merges: Vec::new(),
        }
    }

    /// A grid holding nothing: applying it clears the masked parts of its
    /// target.
    pub fn blank(rows: usize, cols: usize, content: GridContent) -> Self {
        Self {
            origin: CellPosition::default(),
            rows: rows.max(1),
            cols: cols.max(1),
            content,
            cells: BTreeMap::new(),
            merges: Vec::new(),
        }
    }

    /// The region this grid was captured from.
    pub fn range(&self) -> RangePosition {
        RangePosition::new(self.origin.row, self.origin.col, self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn content(&self) -> GridContent {
        self.content
    }

    pub fn merges(&self) -> &[RangePosition] {
        &self.merges
    }

    /// Cell at a position relative to the grid origin.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.merges.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> {
        self.cells.iter().map(|(k, v)| (*k, v))
    }

    /// Write the grid back with its top-left corner at `at`, restoring the
    /// parts in `mask` (limited to what was captured). Cells of the target
    /// that the snapshot does not hold are reset in those parts.
    pub fn apply(&self, store: &mut CellStore, at: CellPosition, mask: GridContent) -> Result<()> {
        let target = store.fix_range(RangePosition::new(at.row, at.col, self.rows, self.cols))?;
        self.apply_clipped(store, at, target, mask)
    }

    /// Tile the grid over `target`, clipping the last row/column of tiles.
    pub fn apply_repeated(
        &self,
        store: &mut CellStore,
        target: RangePosition,
        mask: GridContent,
    ) -> Result<()> {
        let target = store.fix_range(target)?;
        for tile_row in (target.row..=target.end_row()).step_by(self.rows) {
            for tile_col in (target.col..=target.end_col()).step_by(self.cols) {
                let at = CellPosition::new(tile_row, tile_col);
                let tile = RangePosition::new(tile_row, tile_col, self.rows, self.cols);
                if let Some(clip) = tile.intersection(&target) {
                    self.apply_clipped(store, at, clip, mask)?;
                }
            }
        }
        Ok(())
    }

    fn apply_clipped(
        &self,
        store: &mut CellStore,
        at: CellPosition,
        clip: RangePosition,
        mask: GridContent,
    ) -> Result<()> {
        let mask = mask & self.content;
        let translated: Vec<RangePosition> = if mask.contains(GridContent::MERGES) {
            self.merges
                .iter()
                .filter_map(|merge| {
                    let start = CellPosition::new(
                        merge.row + at.row,
                        merge.col + at.col,
                    )
                    .offset(-(self.origin.row as isize), -(self.origin.col as isize))?;
                    let moved = merge.moved_to(start);
                    clip.contains_range(&moved).then_some(moved)
                })
                .collect()
        } else {
            Vec::new()
        };

        if mask.contains(GridContent::MERGES) {
            let mut stale = store.merges_in(clip);
            for merge in &translated {
                stale.extend(store.merges_in(*merge));
            }
            for merge in stale {
                store.clear_merge_spans(merge);
            }
        }

        // Merges in force once this grid lands; their interiors hold no content.
        let governing = if mask.contains(GridContent::MERGES) {
            translated.clone()
        } else {
            store.merges_in(clip)
        };
        let interiors: BTreeSet<CellPosition> = governing
            .iter()
            .flat_map(|merge| merge.positions().filter(move |pos| *pos != merge.start()))
            .collect();

        let mut targets: BTreeSet<CellPosition> = store.positions_in(clip).into_iter().collect();
        for &(r, c) in self.cells.keys() {
            let pos = CellPosition::new(at.row + r, at.col + c);
            if clip.contains(pos) {
                targets.insert(pos);
            }
        }

        let blank = Cell::default();
        for pos in targets {
            let snapshot = self
                .cells
                .get(&(pos.row - at.row, pos.col - at.col))
                .unwrap_or(&blank);
            if interiors.contains(&pos) && !mask.contains(GridContent::MERGES) {
                continue;
            }
            let cell = store.create_and_get(pos)?;
            restore_parts(cell, snapshot, mask);
            if interiors.contains(&pos) {
                cell.clear_data();
                cell.style = None;
            }
        }

        for merge in translated {
            store.apply_merge_spans(merge);
        }
        for pos in store.positions_in(clip) {
            store.release(pos);
        }
        Ok(())
    }
}

/// Copy of `cell` holding only the parts in `content`, without span fields.
fn project(cell: &Cell, content: GridContent) -> Cell {
    let mut out = Cell::default();
    restore_parts(&mut out, cell, content);
    out
}

fn restore_parts(cell: &mut Cell, snapshot: &Cell, mask: GridContent) {
    if mask.contains(GridContent::DATA) {
        cell.value.clone_from(&snapshot.value);
        cell.formula.clone_from(&snapshot.formula);
        cell.format.clone_from(&snapshot.format);
        cell.body.clone_from(&snapshot.body);
        cell.readonly = snapshot.readonly;
    }
    if mask.contains(GridContent::STYLE) {
        cell.style.clone_from(&snapshot.style);
    }
    if mask.contains(GridContent::BORDERS) {
        cell.borders = snapshot.borders;
    }
}
