//! Cell data writes.

use gridstore_grid::{
    Axis, CellContent, CellInput, CellPosition, CellValue, DEFAULT_FONT_SIZE_100PT, GridContent,
    GridError, PartialGrid, RangePosition,
};

use super::Worksheet;
use crate::error::Result;
use crate::events::WorksheetEvent;

/// Prior state of one cell data write.
#[derive(Clone, Debug, PartialEq)]
pub struct CellDataBackup {
    /// Where the write landed (the merge anchor when aimed at an interior).
    pub pos: CellPosition,
    pub content: CellContent,
    /// Row height before an auto-fit changed it.
    pub row_height: Option<u16>,
}

/// Pixel height of one text line at a font size given in 1/100 points.
pub fn line_height(font_size_100pt: u16) -> u16 {
    let pixels = u32::from(font_size_100pt) * 1152 / 72_000 + 4;
    u16::try_from(pixels).unwrap_or(u16::MAX)
}

impl Worksheet {
    /// Write parsed input to a cell. A write aimed at a merge interior goes
    /// to the anchor.
    pub fn set_cell_data(&mut self, pos: CellPosition, input: CellInput) -> Result<CellDataBackup> {
        self.cells.check_position(pos)?;
        let pos = self.anchor_of(pos);
        if self.cells.get(pos).is_some_and(|c| c.readonly) {
            return Err(GridError::ReadonlyViolation(pos).into());
        }
        let cell = self.cells.create_and_get(pos)?;
        let content = cell.content();
        cell.apply_input(input);
        self.cells.release(pos);

        let row_height = self.fit_row_height(pos.row)?;
        self.emit(WorksheetEvent::CellsChanged {
            range: RangePosition::cell(pos),
        });
        Ok(CellDataBackup {
            pos,
            content,
            row_height,
        })
    }

    /// Undo a [`set_cell_data`](Self::set_cell_data).
    pub fn restore_cell_data(&mut self, backup: &CellDataBackup) -> Result<()> {
        let cell = self.cells.create_and_get(backup.pos)?;
        cell.set_content(backup.content.clone());
        self.cells.release(backup.pos);
        if let Some(height) = backup.row_height {
            self.rows.set_size(backup.pos.row, height)?;
        }
        self.emit(WorksheetEvent::CellsChanged {
            range: RangePosition::cell(backup.pos),
        });
        Ok(())
    }

    /// Refit an auto-size row to its tallest cell. Returns the previous height
    /// if it changed.
    fn fit_row_height(&mut self, row: usize) -> Result<Option<u16>> {
        if !self.config.auto_row_height {
            return Ok(None);
        }
        let Some(header) = self.rows.get(row) else {
            return Ok(None);
        };
        if !header.auto_size {
            return Ok(None);
        }
        let mut height = self.config.default_row_height;
        let band = RangePosition::new(row, 0, 1, self.column_count());
        for (pos, cell) in self.cells.cells_in(band) {
            if cell.rowspan > 1 || cell.is_merge_interior() || !cell.has_data() {
                continue;
            }
            let lines = cell.display_text().lines().count().max(1);
            let font = self
                .resolve_style(pos)
                .font_size_100pt
                .unwrap_or(DEFAULT_FONT_SIZE_100PT);
            let needed = usize::from(line_height(font)).saturating_mul(lines);
            height = height.max(u16::try_from(needed).unwrap_or(u16::MAX));
        }
        let previous = self.rows.set_size(row, height)?;
        Ok((previous != height).then_some(previous))
    }

    /// Write rows of values starting at `origin`. `None` clears a cell.
    ///
    /// Read-only cells are skipped and reported through the event channel.
    /// Returns the prior data of the written area.
    pub fn set_range_data(
        &mut self,
        origin: CellPosition,
        values: &[Vec<Option<CellValue>>],
    ) -> Result<PartialGrid> {
        let rows = values.len().max(1);
        let cols = values.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let range = self.fix_range(RangePosition::new(origin.row, origin.col, rows, cols))?;
        let backup = self.partial_grid(range, GridContent::DATA)?;

        for (r, row) in values.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let pos = CellPosition::new(origin.row + r, origin.col + c);
                match self.cells.get(pos) {
                    Some(cell) if cell.is_merge_interior() => continue,
                    Some(cell) if cell.readonly => {
                        self.report_cell_error(pos, GridError::ReadonlyViolation(pos));
                        continue;
                    }
                    None if value.is_none() => continue,
                    _ => {}
                }
                let cell = self.cells.create_and_get(pos)?;
                cell.formula = None;
                cell.value = value.clone();
                self.cells.release(pos);
            }
        }
        self.emit(WorksheetEvent::CellsChanged { range });
        Ok(backup)
    }

    /// Clear values and formulas in `range`, keeping formats and styles.
    ///
    /// Read-only cells are skipped and reported through the event channel.
    pub fn remove_range_data(&mut self, range: RangePosition) -> Result<PartialGrid> {
        let range = self.fix_range(range)?;
        let backup = self.partial_grid(range, GridContent::DATA)?;
        for pos in self.cells.positions_in(range) {
            let Some(cell) = self.cells.get_mut(pos) else {
                continue;
            };
            if !cell.has_data() {
                continue;
            }
            if cell.readonly {
                self.report_cell_error(pos, GridError::ReadonlyViolation(pos));
                continue;
            }
            cell.clear_data();
            self.cells.release(pos);
        }
        self.emit(WorksheetEvent::CellsChanged { range });
        Ok(backup)
    }

    /// Set the read-only flag of every cell in `range`. Bypasses history.
    pub fn set_readonly(&mut self, range: RangePosition, readonly: bool) -> Result<()> {
        let range = self.fix_range(range)?;
        for pos in range.positions() {
            if readonly {
                self.cells.create_and_get(pos)?.readonly = true;
            } else if let Some(cell) = self.cells.get_mut(pos) {
                cell.readonly = false;
                self.cells.release(pos);
            }
        }
        Ok(())
    }

    /// Height of `row`.
    pub fn row_height(&self, row: usize) -> Option<u16> {
        self.headers(Axis::Row).get(row).map(|h| h.size)
    }
}
