use gridstore_grid::{CellPosition, GridContent, PartialGrid, RangePosition};

use super::{Doable, Reusable, Undoable, done};
use crate::error::Result;
use crate::worksheet::Worksheet;

/// Merge a range into one cell.
#[derive(Clone, Debug)]
pub struct MergeAction {
    pub range: RangePosition,
    backup: Option<PartialGrid>,
}

impl MergeAction {
    pub fn new(range: RangePosition) -> Self {
        Self { range, backup: None }
    }
}

impl Doable for MergeAction {
    fn name(&self) -> &'static str {
        "Merge"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.merge_range(self.range)?);
        Ok(())
    }
}

impl Undoable for MergeAction {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.restore_partial_grid(done(&self.backup, self.name())?)
    }
}

impl Reusable for MergeAction {
    fn range(&self) -> RangePosition {
        self.range
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range)
    }
}

/// Split every merge a range touches.
#[derive(Clone, Debug)]
pub struct UnmergeAction {
    pub range: RangePosition,
    backup: Option<PartialGrid>,
}

impl UnmergeAction {
    pub fn new(range: RangePosition) -> Self {
        Self { range, backup: None }
    }
}

impl Doable for UnmergeAction {
    fn name(&self) -> &'static str {
        "Unmerge"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.unmerge_range(self.range)?);
        Ok(())
    }
}

impl Undoable for UnmergeAction {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.restore_partial_grid(done(&self.backup, self.name())?)
    }
}

impl Reusable for UnmergeAction {
    fn range(&self) -> RangePosition {
        self.range
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range)
    }
}

/// Move a range so its top-left corner lands on `to`.
#[derive(Clone, Debug)]
pub struct MoveRange {
    pub source: RangePosition,
    pub to: CellPosition,
    /// Moved content and the destination it overwrote.
    backup: Option<(PartialGrid, PartialGrid)>,
}

impl MoveRange {
    pub fn new(source: RangePosition, to: CellPosition) -> Self {
        Self {
            source,
            to,
            backup: None,
        }
    }
}

impl Doable for MoveRange {
    fn name(&self) -> &'static str {
        "Move"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.move_range(self.source, self.to)?);
        Ok(())
    }
}

impl Undoable for MoveRange {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let (content, destination) = done(&self.backup, self.name())?;
        sheet.restore_partial_grid(destination)?;
        sheet.set_partial_grid(content, content.range().start(), GridContent::all())
    }
}

/// Copy a range so its top-left corner lands on `to`.
#[derive(Clone, Debug)]
pub struct CopyRange {
    pub source: RangePosition,
    pub to: CellPosition,
    backup: Option<PartialGrid>,
}

impl CopyRange {
    pub fn new(source: RangePosition, to: CellPosition) -> Self {
        Self {
            source,
            to,
            backup: None,
        }
    }
}

impl Doable for CopyRange {
    fn name(&self) -> &'static str {
        "Copy"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.copy_range(self.source, self.to)?);
        Ok(())
    }
}

impl Undoable for CopyRange {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.restore_partial_grid(done(&self.backup, self.name())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use gridstore_grid::{CellInput, CellValue};

    fn sheet() -> Worksheet {
        Worksheet::new(EngineConfig::with_size(10, 10)).unwrap()
    }

    fn text(sheet: &Worksheet, row: usize, col: usize) -> String {
        sheet
            .cell(CellPosition::new(row, col))
            .map(|c| c.display_text())
            .unwrap_or_default()
    }

    #[test]
    fn test_move_with_overlap_undoes_cleanly() {
        let mut sheet = sheet();
        for row in 0..3 {
            let pos = CellPosition::new(row, 0);
            sheet.set_cell_data(pos, CellInput::parse(&format!("r{row}"))).unwrap();
        }
        let mut action = MoveRange::new(RangePosition::new(0, 0, 3, 1), CellPosition::new(1, 0));
        action.do_action(&mut sheet).unwrap();
        assert_eq!(text(&sheet, 0, 0), "");
        assert_eq!(text(&sheet, 3, 0), "r2");

        action.undo(&mut sheet).unwrap();
        assert_eq!(
            (0..4).map(|r| text(&sheet, r, 0)).collect::<Vec<_>>(),
            vec!["r0", "r1", "r2", ""]
        );
    }

    #[test]
    fn test_copy_undo_restores_destination() {
        let mut sheet = sheet();
        sheet.set_cell_data(CellPosition::new(0, 0), CellInput::parse("1")).unwrap();
        sheet.set_cell_data(CellPosition::new(5, 5), CellInput::parse("old")).unwrap();
        let mut action = CopyRange::new(RangePosition::cell(CellPosition::new(0, 0)), CellPosition::new(5, 5));
        action.do_action(&mut sheet).unwrap();
        assert_eq!(
            sheet.cell(CellPosition::new(5, 5)).unwrap().value,
            Some(CellValue::Number(1.0))
        );
        action.undo(&mut sheet).unwrap();
        assert_eq!(text(&sheet, 5, 5), "old");
        assert_eq!(text(&sheet, 0, 0), "1");
    }

    #[test]
    fn test_merge_unmerge_undo() {
        let mut sheet = sheet();
        let range = RangePosition::new(1, 1, 2, 3);
        let mut merge = MergeAction::new(range);
        merge.do_action(&mut sheet).unwrap();
        let mut unmerge = UnmergeAction::new(RangePosition::cell(CellPosition::new(2, 3)));
        unmerge.do_action(&mut sheet).unwrap();
        assert!(sheet.cells().all_merges().is_empty());

        unmerge.undo(&mut sheet).unwrap();
        assert_eq!(sheet.cells().all_merges(), vec![range]);
        merge.undo(&mut sheet).unwrap();
        assert!(sheet.cells().all_merges().is_empty());
    }
}
