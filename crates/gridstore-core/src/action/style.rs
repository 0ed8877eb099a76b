use gridstore_grid::{BorderPositions, BorderSide, GridContent, PartialGrid, RangePosition, RangeStyle, StyleFlags};

use super::{Doable, Reusable, Undoable, done};
use crate::error::Result;
use crate::worksheet::{StyleBackup, Worksheet};

/// Apply the flagged attributes of a style to a range.
#[derive(Clone, Debug)]
pub struct SetRangeStyle {
    pub range: RangePosition,
    pub style: RangeStyle,
    backup: Option<StyleBackup>,
}

impl SetRangeStyle {
    pub fn new(range: RangePosition, style: RangeStyle) -> Self {
        Self {
            range,
            style,
            backup: None,
        }
    }
}

impl Doable for SetRangeStyle {
    fn name(&self) -> &'static str {
        "SetRangeStyle"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.set_range_style(self.range, &self.style)?);
        Ok(())
    }
}

impl Undoable for SetRangeStyle {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.restore_styles(done(&self.backup, self.name())?)
    }
}

impl Reusable for SetRangeStyle {
    fn range(&self) -> RangePosition {
        self.range
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range, self.style.clone())
    }
}

/// Clear style attributes from a range.
#[derive(Clone, Debug)]
pub struct RemoveRangeStyle {
    pub range: RangePosition,
    pub flags: StyleFlags,
    backup: Option<StyleBackup>,
}

impl RemoveRangeStyle {
    pub fn new(range: RangePosition, flags: StyleFlags) -> Self {
        Self {
            range,
            flags,
            backup: None,
        }
    }
}

impl Doable for RemoveRangeStyle {
    fn name(&self) -> &'static str {
        "RemoveRangeStyle"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.remove_range_style(self.range, self.flags)?);
        Ok(())
    }
}

impl Undoable for RemoveRangeStyle {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.restore_styles(done(&self.backup, self.name())?)
    }
}

impl Reusable for RemoveRangeStyle {
    fn range(&self) -> RangePosition {
        self.range
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range, self.flags)
    }
}

fn restore_borders(sheet: &mut Worksheet, backup: &PartialGrid) -> Result<()> {
    sheet.set_partial_grid(backup, backup.range().start(), GridContent::BORDERS)
}

/// Draw border lines on the selected edges of a range.
#[derive(Clone, Debug)]
pub struct SetRangeBorders {
    pub range: RangePosition,
    pub positions: BorderPositions,
    pub side: BorderSide,
    backup: Option<PartialGrid>,
}

impl SetRangeBorders {
    pub fn new(range: RangePosition, positions: BorderPositions, side: BorderSide) -> Self {
        Self {
            range,
            positions,
            side,
            backup: None,
        }
    }
}

impl Doable for SetRangeBorders {
    fn name(&self) -> &'static str {
        "SetRangeBorders"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.set_range_borders(self.range, self.positions, Some(self.side))?);
        Ok(())
    }
}

impl Undoable for SetRangeBorders {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        restore_borders(sheet, done(&self.backup, self.name())?)
    }
}

impl Reusable for SetRangeBorders {
    fn range(&self) -> RangePosition {
        self.range
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range, self.positions, self.side)
    }
}

/// Erase border lines on the selected edges of a range.
#[derive(Clone, Debug)]
pub struct RemoveRangeBorders {
    pub range: RangePosition,
    pub positions: BorderPositions,
    backup: Option<PartialGrid>,
}

impl RemoveRangeBorders {
    pub fn new(range: RangePosition, positions: BorderPositions) -> Self {
        Self {
            range,
            positions,
            backup: None,
        }
    }
}

impl Doable for RemoveRangeBorders {
    fn name(&self) -> &'static str {
        "RemoveRangeBorders"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.set_range_borders(self.range, self.positions, None)?);
        Ok(())
    }
}

impl Undoable for RemoveRangeBorders {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        restore_borders(sheet, done(&self.backup, self.name())?)
    }
}

impl Reusable for RemoveRangeBorders {
    fn range(&self) -> RangePosition {
        self.range
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        Self::new(range, self.positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use gridstore_grid::{Axis, BorderLine, CellPosition, Color};

    fn sheet() -> Worksheet {
        Worksheet::new(EngineConfig::with_size(8, 8)).unwrap()
    }

    #[test]
    fn test_clone_to_leaves_original_backup_alone() {
        let mut sheet = sheet();
        let mut first = SetRangeStyle::new(RangePosition::new(0, 0, 1, 1), RangeStyle::new().with_bold(true));
        first.do_action(&mut sheet).unwrap();

        let mut second = first.clone_to(RangePosition::full_rows(4, 1));
        assert!(second.backup.is_none());
        second.do_action(&mut sheet).unwrap();
        assert!(sheet.resolve_style(CellPosition::new(4, 7)).bold);

        first.undo(&mut sheet).unwrap();
        assert!(!sheet.resolve_style(CellPosition::new(0, 0)).bold);
        assert!(sheet.resolve_style(CellPosition::new(4, 0)).bold);
        second.undo(&mut sheet).unwrap();
        assert!(sheet.headers(Axis::Row).get(4).unwrap().style.is_none());
    }

    #[test]
    fn test_remove_borders_undo() {
        let mut sheet = sheet();
        let range = RangePosition::new(1, 1, 3, 3);
        let side = BorderSide::new(BorderLine::Dotted, Color::black());
        SetRangeBorders::new(range, BorderPositions::all(), side)
            .do_action(&mut sheet)
            .unwrap();

        let mut remove = RemoveRangeBorders::new(range, BorderPositions::INSIDE);
        remove.do_action(&mut sheet).unwrap();
        let center = sheet.cell(CellPosition::new(2, 2)).map(|c| c.borders);
        assert!(center.is_none_or(|b| b.is_empty()));
        assert_eq!(sheet.cell(CellPosition::new(1, 1)).unwrap().borders.top, Some(side));

        remove.undo(&mut sheet).unwrap();
        assert_eq!(sheet.cell(CellPosition::new(2, 2)).unwrap().borders.left, Some(side));
    }
}
