//! Worksheet change notifications.
//!
//! Listeners are handed to the worksheet at construction (or added later) and
//! are dropped with it. A formula engine, for example, subscribes to the
//! structural events to rewrite its references.

use gridstore_grid::{Axis, CellPosition, GridError, RangePosition};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorksheetEvent {
    RowsInserted { at: usize, count: usize },
    RowsDeleted { at: usize, count: usize },
    ColumnsInserted { at: usize, count: usize },
    ColumnsDeleted { at: usize, count: usize },
    /// A per-cell failure inside a bulk action. The action itself went on.
    CellError { pos: CellPosition, error: GridError },
    /// Data, style, border or merge state changed inside `range`.
    CellsChanged { range: RangePosition },
    /// Size, visibility or style of headers changed.
    HeadersChanged { axis: Axis, start: usize, count: usize },
    /// A named or highlight range was added or removed.
    RangesChanged { name: String },
    OutlinesChanged { axis: Axis },
}

impl WorksheetEvent {
    pub fn structural(axis: Axis, at: usize, count: usize, is_insert: bool) -> Self {
        match (axis, is_insert) {
            (Axis::Row, true) => WorksheetEvent::RowsInserted { at, count },
            (Axis::Row, false) => WorksheetEvent::RowsDeleted { at, count },
            (Axis::Column, true) => WorksheetEvent::ColumnsInserted { at, count },
            (Axis::Column, false) => WorksheetEvent::ColumnsDeleted { at, count },
        }
    }
}

/// Receives worksheet events, in the order they happen.
pub trait WorksheetListener {
    fn on_event(&mut self, event: &WorksheetEvent);
}

impl<F> WorksheetListener for F
where
    F: FnMut(&WorksheetEvent),
{
    fn on_event(&mut self, event: &WorksheetEvent) {
        self(event)
    }
}

/// The listeners of one worksheet.
#[derive(Default)]
pub(crate) struct EventBus {
    listeners: Vec<Box<dyn WorksheetListener>>,
}

impl EventBus {
    pub(crate) fn new(listeners: Vec<Box<dyn WorksheetListener>>) -> Self {
        Self { listeners }
    }

    pub(crate) fn subscribe(&mut self, listener: Box<dyn WorksheetListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn emit(&mut self, event: WorksheetEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
