//! The worksheet: cells, headers, styles and range registries behind one owner.
//!
//! Reads (rendering, formula evaluation, file IO) go straight to the accessors
//! here. Mutations that should be undoable go through
//! [`ActionEngine`](crate::ActionEngine); codecs may call the mutating methods
//! directly through [`ActionEngine::sheet_mut`](crate::ActionEngine::sheet_mut).

mod data;
mod headers;
mod merge;
mod ranges;
mod structure;
mod style;

pub use data::CellDataBackup;
pub use headers::CollapseBackup;
pub use structure::StructuralBackup;
pub use style::{StyleBackup, StyleScope};

use std::ops::ControlFlow;

use gridstore_grid::{
    Axis, Cell, CellPosition, CellStore, GridContent, HeaderTable, OutlineRegistry, PartialGrid,
    RangePosition, RangeRegistry, RangeStyle,
};

use crate::config::EngineConfig;
use crate::error::{Result, SheetError};
use crate::events::{EventBus, WorksheetEvent, WorksheetListener};

/// In-memory spreadsheet state.
#[derive(Debug)]
pub struct Worksheet {
    cells: CellStore,
    rows: HeaderTable,
    columns: HeaderTable,
    root_style: RangeStyle,
    ranges: RangeRegistry,
    /// Present only when the configuration enables outlines.
    outlines: Option<OutlineRegistry>,
    events: EventBus,
    config: EngineConfig,
}

impl Worksheet {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_listeners(config, Vec::new())
    }

    /// Create a worksheet that reports to `listeners` from the start.
    pub fn with_listeners(
        config: EngineConfig,
        listeners: Vec<Box<dyn WorksheetListener>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cells: CellStore::new(config.rows, config.columns),
            rows: HeaderTable::new(Axis::Row, config.rows, config.default_row_height),
            columns: HeaderTable::new(Axis::Column, config.columns, config.default_column_width),
            root_style: RangeStyle::root(),
            ranges: RangeRegistry::new(),
            outlines: config.outlines.then(OutlineRegistry::new),
            events: EventBus::new(listeners),
            config,
        })
    }

    pub fn add_listener(&mut self, listener: impl WorksheetListener + 'static) {
        self.events.subscribe(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.events.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn row_count(&self) -> usize {
        self.cells.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.cells.col_count()
    }

    pub fn count(&self, axis: Axis) -> usize {
        self.cells.count(axis)
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    pub fn cell(&self, pos: CellPosition) -> Option<&Cell> {
        self.cells.get(pos)
    }

    /// Get the cell at `pos`, materializing it if needed. Bypasses history.
    pub fn create_and_get(&mut self, pos: CellPosition) -> Result<&mut Cell> {
        Ok(self.cells.create_and_get(pos)?)
    }

    pub fn headers(&self, axis: Axis) -> &HeaderTable {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    pub(crate) fn headers_mut(&mut self, axis: Axis) -> &mut HeaderTable {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    pub fn root_style(&self) -> &RangeStyle {
        &self.root_style
    }

    pub fn ranges(&self) -> &RangeRegistry {
        &self.ranges
    }

    pub fn outlines(&self) -> Option<&OutlineRegistry> {
        self.outlines.as_ref()
    }

    pub(crate) fn outlines_mut(&mut self) -> Result<&mut OutlineRegistry> {
        self.outlines
            .as_mut()
            .ok_or_else(|| SheetError::Config("outlines are disabled".to_string()))
    }

    /// Resolve [`ENTIRE`](gridstore_grid::ENTIRE) extents and check bounds.
    pub fn fix_range(&self, range: RangePosition) -> Result<RangePosition> {
        Ok(self.cells.fix_range(range)?)
    }

    /// Snapshot the parts of `range` selected by `content`.
    pub fn partial_grid(&self, range: RangePosition, content: GridContent) -> Result<PartialGrid> {
        Ok(PartialGrid::capture(&self.cells, range, content)?)
    }

    /// Visit the cells of `range`; see [`CellStore::iterate`].
    pub fn iterate<F>(&self, range: RangePosition, skip_empty: bool, visitor: F) -> Result<()>
    where
        F: FnMut(CellPosition, Option<&Cell>) -> ControlFlow<()>,
    {
        Ok(self.cells.iterate(range, skip_empty, visitor)?)
    }

    /// The anchor of the merge covering `pos`, or `pos` itself.
    pub fn anchor_of(&self, pos: CellPosition) -> CellPosition {
        self.cells
            .get(pos)
            .and_then(|cell| cell.merge_anchor)
            .unwrap_or(pos)
    }

    pub(crate) fn emit(&mut self, event: WorksheetEvent) {
        self.events.emit(event);
    }

    /// Forward a per-cell failure to listeners.
    pub(crate) fn report_cell_error(&mut self, pos: CellPosition, error: gridstore_grid::GridError) {
        tracing::warn!(cell = %pos, %error, "cell update skipped");
        self.events.emit(WorksheetEvent::CellError { pos, error });
    }

    /// Write `grid` back with its top-left corner at `at`, restoring the parts
    /// in `mask`. Bypasses history.
    pub fn set_partial_grid(
        &mut self,
        grid: &PartialGrid,
        at: CellPosition,
        mask: GridContent,
    ) -> Result<()> {
        grid.apply(&mut self.cells, at, mask)?;
        self.emit(WorksheetEvent::CellsChanged {
            range: RangePosition::new(at.row, at.col, grid.rows(), grid.cols()),
        });
        Ok(())
    }

    /// Tile `grid` over `target`. Bypasses history.
    pub fn fill_partial_grid(
        &mut self,
        grid: &PartialGrid,
        target: RangePosition,
        mask: GridContent,
    ) -> Result<()> {
        grid.apply_repeated(&mut self.cells, target, mask)?;
        self.emit(WorksheetEvent::CellsChanged { range: target });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_new_sheet_has_configured_size() {
        let sheet = Worksheet::new(EngineConfig::with_size(10, 26)).unwrap();
        assert_eq!(sheet.row_count(), 10);
        assert_eq!(sheet.column_count(), 26);
        assert_eq!(sheet.headers(Axis::Row).len(), 10);
        assert_eq!(sheet.headers(Axis::Column).get(0).unwrap().size, 70);
        assert!(sheet.outlines().is_some());
    }

    #[test]
    fn test_outlines_follow_config() {
        let config = EngineConfig {
            outlines: false,
            ..EngineConfig::with_size(5, 5)
        };
        let mut sheet = Worksheet::new(config).unwrap();
        assert!(sheet.outlines().is_none());
        assert!(matches!(sheet.outlines_mut(), Err(SheetError::Config(_))));
    }

    #[test]
    fn test_listeners_receive_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let listener: Box<dyn WorksheetListener> =
            Box::new(move |e: &WorksheetEvent| sink.borrow_mut().push(e.clone()));
        let mut sheet =
            Worksheet::with_listeners(EngineConfig::with_size(5, 5), vec![listener]).unwrap();
        sheet.insert(Axis::Row, 1, 2).unwrap();
        assert_eq!(
            seen.borrow().as_slice(),
            &[WorksheetEvent::RowsInserted { at: 1, count: 2 }]
        );
    }
}
