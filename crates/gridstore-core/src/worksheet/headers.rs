//! Header sizing, visibility and outline collapsing.

use gridstore_grid::{Axis, ENTIRE};

use super::Worksheet;
use crate::error::Result;
use crate::events::WorksheetEvent;

/// Prior state of an outline collapse or expand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollapseBackup {
    pub collapsed: bool,
    pub visible: Vec<bool>,
}

impl Worksheet {
    /// Set the size of a band of headers and turn off their auto-size.
    /// Returns the prior `(size, auto_size)` of each.
    pub fn resize_headers(
        &mut self,
        axis: Axis,
        start: usize,
        count: usize,
        size: u16,
    ) -> Result<Vec<(u16, bool)>> {
        let count = self.header_band(axis, start, count)?;
        let headers = self.headers_mut(axis);
        let mut previous = Vec::with_capacity(count);
        for index in start..start + count {
            let old_size = headers.set_size(index, size)?;
            let old_auto = headers.set_auto_size(index, false)?;
            previous.push((old_size, old_auto));
        }
        self.emit(WorksheetEvent::HeadersChanged { axis, start, count });
        Ok(previous)
    }

    /// Put back sizes returned by [`resize_headers`](Self::resize_headers).
    pub fn restore_header_sizes(&mut self, axis: Axis, start: usize, sizes: &[(u16, bool)]) -> Result<()> {
        let headers = self.headers_mut(axis);
        for (offset, (size, auto_size)) in sizes.iter().enumerate() {
            headers.set_size(start + offset, *size)?;
            headers.set_auto_size(start + offset, *auto_size)?;
        }
        self.emit(WorksheetEvent::HeadersChanged {
            axis,
            start,
            count: sizes.len(),
        });
        Ok(())
    }

    /// Show or hide a band of headers, returning the prior visibility of each.
    pub fn set_headers_visible(
        &mut self,
        axis: Axis,
        start: usize,
        count: usize,
        visible: bool,
    ) -> Result<Vec<bool>> {
        let count = self.header_band(axis, start, count)?;
        self.restore_visibility(axis, start, &vec![visible; count])
    }

    /// Resolve an [`ENTIRE`] count to the headers left after `start` and
    /// check the band fits the table.
    fn header_band(&self, axis: Axis, start: usize, count: usize) -> Result<usize> {
        let headers = self.headers(axis);
        let count = if count == ENTIRE {
            headers.len().saturating_sub(start)
        } else {
            count
        };
        headers.check_band(start, count)?;
        Ok(count)
    }

    /// Apply per-header visibility, returning what it replaced.
    pub fn restore_visibility(&mut self, axis: Axis, start: usize, visible: &[bool]) -> Result<Vec<bool>> {
        let headers = self.headers_mut(axis);
        headers.check_band(start, visible.len())?;
        let mut previous = Vec::with_capacity(visible.len());
        for (offset, v) in visible.iter().enumerate() {
            previous.push(headers.set_visible(start + offset, *v)?);
        }
        self.emit(WorksheetEvent::HeadersChanged {
            axis,
            start,
            count: visible.len(),
        });
        Ok(previous)
    }

    /// Collapse (hide) or expand (show) the headers of an outline group.
    pub fn set_outline_collapsed(
        &mut self,
        axis: Axis,
        start: usize,
        count: usize,
        collapsed: bool,
    ) -> Result<CollapseBackup> {
        let was = self
            .outlines_mut()?
            .axis_mut(axis)
            .set_collapsed(start, count, collapsed)?;
        let visible = self.set_headers_visible(axis, start, count, !collapsed)?;
        tracing::debug!(axis = axis.name(), start, count, collapsed, "outline toggled");
        self.emit(WorksheetEvent::OutlinesChanged { axis });
        Ok(CollapseBackup {
            collapsed: was,
            visible,
        })
    }

    pub fn restore_outline_collapsed(
        &mut self,
        axis: Axis,
        start: usize,
        count: usize,
        backup: &CollapseBackup,
    ) -> Result<()> {
        self.outlines_mut()?
            .axis_mut(axis)
            .set_collapsed(start, count, backup.collapsed)?;
        self.restore_visibility(axis, start, &backup.visible)?;
        self.emit(WorksheetEvent::OutlinesChanged { axis });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_resize_turns_off_auto_size() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 5)).unwrap();
        let previous = sheet.resize_headers(Axis::Row, 1, 2, 45).unwrap();
        assert_eq!(previous, vec![(20, true), (20, true)]);
        let header = sheet.headers(Axis::Row).get(2).unwrap();
        assert_eq!((header.size, header.auto_size), (45, false));

        sheet.restore_header_sizes(Axis::Row, 1, &previous).unwrap();
        assert!(sheet.headers(Axis::Row).get(2).unwrap().auto_size);
    }

    #[test]
    fn test_collapse_hides_group() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(10, 5)).unwrap();
        sheet.add_outline(Axis::Row, 2, 3).unwrap();
        sheet.set_headers_visible(Axis::Row, 3, 1, false).unwrap();

        let backup = sheet.set_outline_collapsed(Axis::Row, 2, 3, true).unwrap();
        assert!((2..5).all(|i| !sheet.headers(Axis::Row).get(i).unwrap().visible));
        assert_eq!(backup.visible, vec![true, false, true]);

        sheet.restore_outline_collapsed(Axis::Row, 2, 3, &backup).unwrap();
        assert!(!sheet.headers(Axis::Row).get(3).unwrap().visible);
        assert!(sheet.headers(Axis::Row).get(2).unwrap().visible);
        assert!(!sheet.outlines().unwrap().axis(Axis::Row).find(2, 3).unwrap().collapsed);
    }
}
