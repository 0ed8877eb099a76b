//! Style resolution and range styling.
//!
//! Styles cascade Cell → Row → Column → Root, per attribute. Styling a range
//! first classifies it against the sheet size: whole-sheet styles go to the
//! root, full rows to row headers, full columns to column headers, and only
//! partial ranges write per-cell overrides. Styling a full row therefore costs
//! O(rows + styled cells), not O(columns).

use gridstore_grid::{
    Axis, BorderPositions, BorderSide, CellPosition, GridContent, PartialGrid, RangePosition,
    RangeStyle, StyleFlags, apply_to_slot, cascade, remove_from_slot,
};

use super::Worksheet;
use crate::error::Result;
use crate::events::WorksheetEvent;

/// Where a range style lands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleScope {
    EntireGrid,
    FullRows { start: usize, count: usize },
    FullColumns { start: usize, count: usize },
    Partial(RangePosition),
}

/// Prior styles of everything a styling call changed.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleBackup {
    root: Option<RangeStyle>,
    rows: Vec<(usize, Option<RangeStyle>)>,
    columns: Vec<(usize, Option<RangeStyle>)>,
    /// Style-only snapshot of the cell overrides in scope.
    cells: PartialGrid,
}

impl Worksheet {
    /// The style a cell is drawn with, every attribute flagged.
    pub fn resolve_style(&self, pos: CellPosition) -> RangeStyle {
        let pos = self.anchor_of(pos);
        let cell = self.cells.get(pos).and_then(|c| c.style.as_ref());
        let row = self.rows.get(pos.row).and_then(|h| h.style.as_ref());
        let column = self.columns.get(pos.col).and_then(|h| h.style.as_ref());
        cascade(&[cell, row, column, Some(&self.root_style)])
    }

    pub fn classify(&self, range: RangePosition) -> Result<StyleScope> {
        let range = self.fix_range(range)?;
        let full_width = range.col == 0 && range.cols == self.column_count();
        let full_height = range.row == 0 && range.rows == self.row_count();
        Ok(match (full_width, full_height) {
            (true, true) => StyleScope::EntireGrid,
            (true, false) => StyleScope::FullRows {
                start: range.row,
                count: range.rows,
            },
            (false, true) => StyleScope::FullColumns {
                start: range.col,
                count: range.cols,
            },
            (false, false) => StyleScope::Partial(range),
        })
    }

    /// Apply the attributes `style` flags to `range`.
    ///
    /// Wider scopes clear the same attributes from the narrower layers they
    /// cover, so the new style is what those cells resolve to.
    pub fn set_range_style(&mut self, range: RangePosition, style: &RangeStyle) -> Result<StyleBackup> {
        let scope = self.classify(range)?;
        let fixed = self.fix_range(range)?;
        let (rows, columns) = (self.row_count(), self.column_count());
        let backup = self.backup_styles(scope, style.flags)?;
        match scope {
            StyleScope::EntireGrid => {
                self.root_style.merge_from(style);
                self.clear_header_styles(Axis::Row, 0, rows, style.flags);
                self.clear_header_styles(Axis::Column, 0, columns, style.flags);
                self.clear_cell_styles(fixed, style.flags);
            }
            StyleScope::FullRows { start, count } | StyleScope::FullColumns { start, count } => {
                let axis = scope_axis(scope);
                let headers = self.headers_mut(axis);
                for index in start..start + count {
                    if let Some(header) = headers.get_mut(index) {
                        apply_to_slot(&mut header.style, style);
                    }
                }
                self.clear_cell_styles(fixed, style.flags);
            }
            StyleScope::Partial(range) => {
                for pos in range.positions() {
                    if self.cells.get(pos).is_some_and(|c| c.is_merge_interior()) {
                        continue;
                    }
                    let cell = self.cells.create_and_get(pos)?;
                    apply_to_slot(&mut cell.style, style);
                }
            }
        }
        tracing::debug!(?scope, flags = ?style.flags, "range style set");
        self.emit_style_change(scope, fixed);
        Ok(backup)
    }

    /// Clear the attributes in `flags` at the scope `range` classifies to.
    ///
    /// On the whole sheet this resets those root attributes to their defaults.
    pub fn remove_range_style(&mut self, range: RangePosition, flags: StyleFlags) -> Result<StyleBackup> {
        let scope = self.classify(range)?;
        let fixed = self.fix_range(range)?;
        let (rows, columns) = (self.row_count(), self.column_count());
        let backup = self.backup_styles(scope, flags)?;
        match scope {
            StyleScope::EntireGrid => {
                self.root_style.copy_from(&RangeStyle::root(), flags);
                self.clear_header_styles(Axis::Row, 0, rows, flags);
                self.clear_header_styles(Axis::Column, 0, columns, flags);
            }
            StyleScope::FullRows { start, count } | StyleScope::FullColumns { start, count } => {
                self.clear_header_styles(scope_axis(scope), start, count, flags);
            }
            StyleScope::Partial(_) => {}
        }
        self.clear_cell_styles(fixed, flags);
        self.emit_style_change(scope, fixed);
        Ok(backup)
    }

    /// Undo a styling call.
    pub fn restore_styles(&mut self, backup: &StyleBackup) -> Result<()> {
        if let Some(root) = &backup.root {
            self.root_style = root.clone();
        }
        for (index, style) in &backup.rows {
            self.rows.set_style(*index, style.clone())?;
        }
        for (index, style) in &backup.columns {
            self.columns.set_style(*index, style.clone())?;
        }
        let origin = backup.cells.range().start();
        self.set_partial_grid(&backup.cells, origin, GridContent::STYLE)
    }

    fn backup_styles(&self, scope: StyleScope, flags: StyleFlags) -> Result<StyleBackup> {
        let (range, root, rows, columns) = match scope {
            StyleScope::EntireGrid => (
                RangePosition::entire(),
                Some(self.root_style.clone()),
                self.saved_header_styles(Axis::Row, 0, self.row_count(), flags),
                self.saved_header_styles(Axis::Column, 0, self.column_count(), flags),
            ),
            StyleScope::FullRows { start, count } => (
                RangePosition::full_rows(start, count),
                None,
                self.saved_header_styles(Axis::Row, start, count, StyleFlags::all()),
                Vec::new(),
            ),
            StyleScope::FullColumns { start, count } => (
                RangePosition::full_columns(start, count),
                None,
                Vec::new(),
                self.saved_header_styles(Axis::Column, start, count, StyleFlags::all()),
            ),
            StyleScope::Partial(range) => (range, None, Vec::new(), Vec::new()),
        };
        Ok(StyleBackup {
            root,
            rows,
            columns,
            cells: self.partial_grid(range, GridContent::STYLE)?,
        })
    }

    /// Header styles in the band that touch `flags` (all of them when
    /// `flags` is everything).
    fn saved_header_styles(
        &self,
        axis: Axis,
        start: usize,
        count: usize,
        flags: StyleFlags,
    ) -> Vec<(usize, Option<RangeStyle>)> {
        let headers = self.headers(axis);
        if flags.is_all() {
            return (start..start + count)
                .filter_map(|i| headers.get(i).map(|h| (i, h.style.clone())))
                .collect();
        }
        headers
            .styled_in(start, count)
            .filter_map(|i| headers.get(i).map(|h| (i, h.style.clone())))
            .filter(|(_, style)| style.as_ref().is_some_and(|s| s.flags.intersects(flags)))
            .collect()
    }

    fn clear_header_styles(&mut self, axis: Axis, start: usize, count: usize, flags: StyleFlags) {
        let styled: Vec<usize> = self.headers(axis).styled_in(start, count).collect();
        let headers = self.headers_mut(axis);
        for index in styled {
            if let Some(header) = headers.get_mut(index) {
                remove_from_slot(&mut header.style, flags);
            }
        }
    }

    /// Drop `flags` from the explicit styles of materialized cells in `range`.
    fn clear_cell_styles(&mut self, range: RangePosition, flags: StyleFlags) {
        for pos in self.cells.positions_in(range) {
            if let Some(cell) = self.cells.get_mut(pos) {
                remove_from_slot(&mut cell.style, flags);
            }
            self.cells.release(pos);
        }
    }

    fn emit_style_change(&mut self, scope: StyleScope, range: RangePosition) {
        let event = match scope {
            StyleScope::FullRows { start, count } => WorksheetEvent::HeadersChanged {
                axis: Axis::Row,
                start,
                count,
            },
            StyleScope::FullColumns { start, count } => WorksheetEvent::HeadersChanged {
                axis: Axis::Column,
                start,
                count,
            },
            _ => WorksheetEvent::CellsChanged { range },
        };
        self.emit(event);
    }

    /// Set (or with `None`, clear) the border sides of `range` selected by
    /// `positions`. Returns a border-only snapshot for undo.
    pub fn set_range_borders(
        &mut self,
        range: RangePosition,
        positions: BorderPositions,
        side: Option<BorderSide>,
    ) -> Result<PartialGrid> {
        let range = self.fix_range(range)?;
        let backup = self.partial_grid(range, GridContent::BORDERS)?;
        for pos in range.positions() {
            let sides = border_sides(range, pos, positions);
            if sides.is_empty() {
                continue;
            }
            let cell = match side {
                Some(_) => self.cells.create_and_get(pos)?,
                None => match self.cells.get_mut(pos) {
                    Some(cell) => cell,
                    None => continue,
                },
            };
            if sides.contains(BorderPositions::TOP) {
                cell.borders.top = side;
            }
            if sides.contains(BorderPositions::BOTTOM) {
                cell.borders.bottom = side;
            }
            if sides.contains(BorderPositions::LEFT) {
                cell.borders.left = side;
            }
            if sides.contains(BorderPositions::RIGHT) {
                cell.borders.right = side;
            }
            self.cells.release(pos);
        }
        self.emit(WorksheetEvent::CellsChanged { range });
        Ok(backup)
    }
}

fn scope_axis(scope: StyleScope) -> Axis {
    match scope {
        StyleScope::FullColumns { .. } => Axis::Column,
        _ => Axis::Row,
    }
}

/// Which of a cell's own sides `positions` addresses, given where the cell
/// sits in `range`.
fn border_sides(range: RangePosition, pos: CellPosition, positions: BorderPositions) -> BorderPositions {
    let mut sides = BorderPositions::empty();
    let top = pos.row == range.row;
    let bottom = pos.row == range.end_row();
    let left = pos.col == range.col;
    let right = pos.col == range.end_col();
    if (top && positions.contains(BorderPositions::TOP))
        || (!top && positions.contains(BorderPositions::INSIDE_HORIZONTAL))
    {
        sides |= BorderPositions::TOP;
    }
    if (bottom && positions.contains(BorderPositions::BOTTOM))
        || (!bottom && positions.contains(BorderPositions::INSIDE_HORIZONTAL))
    {
        sides |= BorderPositions::BOTTOM;
    }
    if (left && positions.contains(BorderPositions::LEFT))
        || (!left && positions.contains(BorderPositions::INSIDE_VERTICAL))
    {
        sides |= BorderPositions::LEFT;
    }
    if (right && positions.contains(BorderPositions::RIGHT))
        || (!right && positions.contains(BorderPositions::INSIDE_VERTICAL))
    {
        sides |= BorderPositions::RIGHT;
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use gridstore_grid::{BorderLine, Color};

    fn sheet(rows: usize, cols: usize) -> Worksheet {
        Worksheet::new(EngineConfig::with_size(rows, cols)).unwrap()
    }

    #[test]
    fn test_classify_ranges() {
        let sheet = sheet(10, 26);
        assert_eq!(sheet.classify(RangePosition::entire()).unwrap(), StyleScope::EntireGrid);
        assert_eq!(
            sheet.classify(RangePosition::full_rows(2, 1)).unwrap(),
            StyleScope::FullRows { start: 2, count: 1 }
        );
        assert_eq!(
            sheet.classify(RangePosition::new(0, 3, 10, 2)).unwrap(),
            StyleScope::FullColumns { start: 3, count: 2 }
        );
        assert_eq!(
            sheet.classify(RangePosition::new(1, 1, 2, 2)).unwrap(),
            StyleScope::Partial(RangePosition::new(1, 1, 2, 2))
        );
    }

    #[test]
    fn test_full_row_style_touches_only_the_header() {
        let mut sheet = sheet(10, 26);
        let bold = RangeStyle::new().with_bold(true);
        let backup = sheet.set_range_style(RangePosition::full_rows(2, 1), &bold).unwrap();
        assert!(sheet.cells().is_empty());
        assert_eq!(sheet.headers(Axis::Row).get(2).unwrap().style, Some(bold));
        assert!(sheet.resolve_style(CellPosition::new(2, 25)).bold);
        assert!(!sheet.resolve_style(CellPosition::new(3, 0)).bold);

        sheet.restore_styles(&backup).unwrap();
        assert!(sheet.headers(Axis::Row).get(2).unwrap().style.is_none());
    }

    #[test]
    fn test_cascade_prefers_cell_then_row_then_column() {
        let mut sheet = sheet(5, 5);
        let red = Some(Color::rgb(255, 0, 0));
        let blue = Some(Color::rgb(0, 0, 255));
        let green = Some(Color::rgb(0, 255, 0));
        sheet
            .set_range_style(RangePosition::full_columns(1, 1), &RangeStyle::new().with_back_color(red))
            .unwrap();
        sheet
            .set_range_style(RangePosition::full_rows(1, 1), &RangeStyle::new().with_back_color(blue))
            .unwrap();
        sheet
            .set_range_style(
                RangePosition::cell(CellPosition::new(1, 1)),
                &RangeStyle::new().with_back_color(green),
            )
            .unwrap();
        assert_eq!(sheet.resolve_style(CellPosition::new(1, 1)).back_color, green);
        assert_eq!(sheet.resolve_style(CellPosition::new(1, 2)).back_color, blue);
        assert_eq!(sheet.resolve_style(CellPosition::new(2, 1)).back_color, red);
        assert_eq!(sheet.resolve_style(CellPosition::new(2, 2)).back_color, None);
        assert_eq!(sheet.resolve_style(CellPosition::new(2, 2)).font_name.as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_wider_scope_clears_narrower_overrides() {
        let mut sheet = sheet(4, 4);
        let pos = CellPosition::new(1, 2);
        let italic_bold = RangeStyle::new().with_bold(true).with_italic(true);
        sheet.set_range_style(RangePosition::cell(pos), &italic_bold).unwrap();

        let plain = RangeStyle::new().with_bold(false);
        let backup = sheet.set_range_style(RangePosition::full_rows(1, 1), &plain).unwrap();
        let style = sheet.cell(pos).unwrap().style.clone().unwrap();
        assert!(!style.has(StyleFlags::BOLD));
        assert!(style.has(StyleFlags::ITALIC));
        assert!(!sheet.resolve_style(pos).bold);

        sheet.restore_styles(&backup).unwrap();
        assert_eq!(sheet.cell(pos).unwrap().style, Some(italic_bold));
    }

    #[test]
    fn test_remove_range_style_keeps_other_flags() {
        let mut sheet = sheet(4, 4);
        let range = RangePosition::new(0, 0, 2, 2);
        let style = RangeStyle::new().with_bold(true).with_indent(2);
        sheet.set_range_style(range, &style).unwrap();
        let backup = sheet.remove_range_style(range, StyleFlags::BOLD).unwrap();
        let left = sheet.cell(CellPosition::new(1, 1)).unwrap().style.clone().unwrap();
        assert_eq!(left, RangeStyle::new().with_indent(2));

        sheet.restore_styles(&backup).unwrap();
        assert_eq!(sheet.cell(CellPosition::new(1, 1)).unwrap().style, Some(style));
    }

    #[test]
    fn test_entire_grid_style_updates_root() {
        let mut sheet = sheet(3, 3);
        sheet
            .set_range_style(RangePosition::full_rows(0, 1), &RangeStyle::new().with_font_size(Some(1400)))
            .unwrap();
        let backup = sheet
            .set_range_style(RangePosition::entire(), &RangeStyle::new().with_font_size(Some(1200)))
            .unwrap();
        assert_eq!(sheet.root_style().font_size_100pt, Some(1200));
        assert!(sheet.headers(Axis::Row).get(0).unwrap().style.is_none());

        sheet.restore_styles(&backup).unwrap();
        assert_eq!(sheet.root_style(), &RangeStyle::root());
        assert_eq!(
            sheet.resolve_style(CellPosition::new(0, 0)).font_size_100pt,
            Some(1400)
        );
    }

    #[test]
    fn test_outline_borders() {
        let mut sheet = sheet(5, 5);
        let side = BorderSide::new(BorderLine::Thick, Color::black());
        let range = RangePosition::new(1, 1, 2, 2);
        let backup = sheet
            .set_range_borders(range, BorderPositions::OUTLINE, Some(side))
            .unwrap();
        let top_left = sheet.cell(CellPosition::new(1, 1)).unwrap().borders;
        assert_eq!(top_left.top, Some(side));
        assert_eq!(top_left.left, Some(side));
        assert_eq!(top_left.bottom, None);
        let bottom_right = sheet.cell(CellPosition::new(2, 2)).unwrap().borders;
        assert_eq!(bottom_right.bottom, Some(side));
        assert_eq!(bottom_right.right, Some(side));

        let origin = backup.range().start();
        sheet.set_partial_grid(&backup, origin, GridContent::BORDERS).unwrap();
        assert!(sheet.cells().is_empty());
    }
}
