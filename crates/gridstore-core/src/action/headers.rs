use gridstore_grid::{Axis, RangePosition};

use super::{Doable, Reusable, Undoable, done};
use crate::error::Result;
use crate::worksheet::Worksheet;

/// Set the height of rows or width of columns.
#[derive(Clone, Debug)]
pub struct ResizeHeaders {
    pub axis: Axis,
    pub start: usize,
    pub count: usize,
    pub size: u16,
    backup: Option<Vec<(u16, bool)>>,
}

impl ResizeHeaders {
    pub fn new(axis: Axis, start: usize, count: usize, size: u16) -> Self {
        Self {
            axis,
            start,
            count,
            size,
            backup: None,
        }
    }
}

impl Doable for ResizeHeaders {
    fn name(&self) -> &'static str {
        "ResizeHeaders"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.resize_headers(self.axis, self.start, self.count, self.size)?);
        Ok(())
    }
}

impl Undoable for ResizeHeaders {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let sizes = done(&self.backup, self.name())?;
        sheet.restore_header_sizes(self.axis, self.start, sizes)
    }
}

impl Reusable for ResizeHeaders {
    fn range(&self) -> RangePosition {
        self.axis.band(self.start, self.count)
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        let (start, count) = self.axis.span(range);
        Self::new(self.axis, start, count, self.size)
    }
}

/// Show or hide rows or columns.
#[derive(Clone, Debug)]
pub struct SetHeadersVisible {
    pub axis: Axis,
    pub start: usize,
    pub count: usize,
    pub visible: bool,
    backup: Option<Vec<bool>>,
}

impl SetHeadersVisible {
    pub fn new(axis: Axis, start: usize, count: usize, visible: bool) -> Self {
        Self {
            axis,
            start,
            count,
            visible,
            backup: None,
        }
    }

    pub fn hide(axis: Axis, start: usize, count: usize) -> Self {
        Self::new(axis, start, count, false)
    }

    pub fn show(axis: Axis, start: usize, count: usize) -> Self {
        Self::new(axis, start, count, true)
    }
}

impl Doable for SetHeadersVisible {
    fn name(&self) -> &'static str {
        "SetHeadersVisible"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.set_headers_visible(self.axis, self.start, self.count, self.visible)?);
        Ok(())
    }
}

impl Undoable for SetHeadersVisible {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let visible = done(&self.backup, self.name())?;
        sheet.restore_visibility(self.axis, self.start, visible)?;
        Ok(())
    }
}

impl Reusable for SetHeadersVisible {
    fn range(&self) -> RangePosition {
        self.axis.band(self.start, self.count)
    }

    fn clone_to(&self, range: RangePosition) -> Self {
        let (start, count) = self.axis.span(range);
        Self::new(self.axis, start, count, self.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_hide_columns_and_undo() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(4, 6)).unwrap();
        let mut action = SetHeadersVisible::hide(Axis::Column, 2, 2);
        action.do_action(&mut sheet).unwrap();
        let columns = sheet.headers(Axis::Column);
        assert!(!columns.get(3).unwrap().visible);
        assert_eq!(columns.offset_of(4), 140);

        action.undo(&mut sheet).unwrap();
        assert!(sheet.headers(Axis::Column).iter().all(|(_, h)| h.visible));
    }

    #[test]
    fn test_resize_clone_to_keeps_size() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(8, 4)).unwrap();
        let action = ResizeHeaders::new(Axis::Row, 0, 1, 30);
        let mut copy = action.clone_to(RangePosition::full_rows(3, 2));
        copy.do_action(&mut sheet).unwrap();
        assert_eq!(sheet.headers(Axis::Row).get(4).unwrap().size, 30);
        assert_eq!(sheet.headers(Axis::Row).get(0).unwrap().size, 20);
    }

    #[test]
    fn test_clone_to_across_the_other_axis_covers_every_header() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 4)).unwrap();
        let mut hide = SetHeadersVisible::hide(Axis::Row, 0, 1).clone_to(RangePosition::full_columns(2, 1));
        hide.do_action(&mut sheet).unwrap();
        assert!(sheet.headers(Axis::Row).iter().all(|(_, h)| !h.visible));
        hide.undo(&mut sheet).unwrap();
        assert!(sheet.headers(Axis::Row).iter().all(|(_, h)| h.visible));

        let mut resize = ResizeHeaders::new(Axis::Column, 0, 1, 90).clone_to(RangePosition::full_rows(1, 2));
        resize.do_action(&mut sheet).unwrap();
        assert!(sheet.headers(Axis::Column).iter().all(|(_, h)| h.size == 90));
        resize.undo(&mut sheet).unwrap();
        assert!(sheet.headers(Axis::Column).iter().all(|(_, h)| h.size == 70));
    }

    #[test]
    fn test_band_past_the_end_is_rejected() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 4)).unwrap();
        let mut action = SetHeadersVisible::hide(Axis::Row, 3, usize::MAX - 1);
        assert!(action.do_action(&mut sheet).is_err());
        assert!(sheet.headers(Axis::Row).iter().all(|(_, h)| h.visible));
    }
}
