//! Named ranges, highlight ranges and outline groups.

use gridstore_grid::{Axis, HighlightRange, NamedRange, Outline};

use super::Worksheet;
use crate::error::Result;
use crate::events::WorksheetEvent;

impl Worksheet {
    /// Register a named range. Its position must lie inside the sheet.
    pub fn add_named_range(&mut self, range: NamedRange) -> Result<()> {
        self.fix_range(range.position)?;
        let name = range.name.clone();
        self.ranges.add_named_range(range)?;
        self.emit(WorksheetEvent::RangesChanged { name });
        Ok(())
    }

    pub fn remove_named_range(&mut self, name: &str) -> Result<NamedRange> {
        let removed = self.ranges.remove_named_range(name)?;
        self.emit(WorksheetEvent::RangesChanged {
            name: removed.name.clone(),
        });
        Ok(removed)
    }

    pub fn add_highlight_range(&mut self, range: HighlightRange) -> Result<()> {
        self.fix_range(range.position)?;
        let name = range.name.clone();
        self.ranges.add_highlight_range(range)?;
        self.emit(WorksheetEvent::RangesChanged { name });
        Ok(())
    }

    pub fn remove_highlight_range(&mut self, name: &str) -> Result<HighlightRange> {
        let removed = self.ranges.remove_highlight_range(name)?;
        self.emit(WorksheetEvent::RangesChanged {
            name: removed.name.clone(),
        });
        Ok(removed)
    }

    /// Group `count` rows or columns from `start`.
    pub fn add_outline(&mut self, axis: Axis, start: usize, count: usize) -> Result<Outline> {
        self.headers(axis).check_band(start, count)?;
        let outline = self.outlines_mut()?.axis_mut(axis).add(start, count)?;
        self.emit(WorksheetEvent::OutlinesChanged { axis });
        Ok(outline)
    }

    pub fn remove_outline(&mut self, axis: Axis, start: usize, count: usize) -> Result<Outline> {
        let outline = self.outlines_mut()?.axis_mut(axis).remove(start, count)?;
        self.emit(WorksheetEvent::OutlinesChanged { axis });
        Ok(outline)
    }

    /// Re-add a removed outline group with its collapsed flag.
    pub fn restore_outline(&mut self, axis: Axis, outline: Outline) -> Result<()> {
        let groups = self.outlines_mut()?.axis_mut(axis);
        groups.add(outline.start, outline.count)?;
        groups.set_collapsed(outline.start, outline.count, outline.collapsed)?;
        self.emit(WorksheetEvent::OutlinesChanged { axis });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::SheetError;
    use gridstore_grid::{Color, GridError, RangePosition};

    #[test]
    fn test_named_and_highlight_ranges_share_validation() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 5)).unwrap();
        sheet
            .add_named_range(NamedRange::new("Data", RangePosition::new(0, 0, 2, 2)))
            .unwrap();
        sheet
            .add_highlight_range(HighlightRange::new(
                "Data",
                RangePosition::new(0, 0, 1, 1),
                Color::rgb(255, 0, 0),
            ))
            .unwrap();
        let err = sheet
            .add_named_range(NamedRange::new("B2", RangePosition::new(0, 0, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, SheetError::Grid(GridError::InvalidName { .. })));
        assert_eq!(sheet.remove_highlight_range("data").unwrap().name, "Data");
    }

    #[test]
    fn test_ranges_outside_sheet_are_rejected() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(10, 10)).unwrap();
        let far = RangePosition::parse("A1:ZZ9999").unwrap();
        let err = sheet.add_named_range(NamedRange::new("Far", far)).unwrap_err();
        assert!(matches!(err, SheetError::Grid(GridError::InvalidRange(_))));
        let err = sheet
            .add_highlight_range(HighlightRange::new("Far", far, Color::rgb(0, 0, 255)))
            .unwrap_err();
        assert!(matches!(err, SheetError::Grid(GridError::InvalidRange(_))));
        assert!(sheet.ranges().find("Far").is_none());

        sheet
            .add_named_range(NamedRange::new("Rows", RangePosition::full_rows(2, 3)))
            .unwrap();
    }

    #[test]
    fn test_outline_must_fit_sheet() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 5)).unwrap();
        assert!(sheet.add_outline(Axis::Column, 3, 4).is_err());
        let outline = sheet.add_outline(Axis::Column, 1, 2).unwrap();
        sheet.remove_outline(Axis::Column, 1, 2).unwrap();
        sheet.restore_outline(Axis::Column, outline).unwrap();
        assert!(sheet.outlines().unwrap().axis(Axis::Column).find(1, 2).is_some());
    }
}
