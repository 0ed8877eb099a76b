//! gridstore-core - worksheet model, events and the Do/Undo/Redo engine.

pub mod action;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod worksheet;

pub use action::{Action, ActionGroup, Doable, Reusable, Undoable};
pub use config::{DEFAULT_MAX_COLUMNS, DEFAULT_MAX_ROWS, DEFAULT_UNDO_LIMIT, EngineConfig};
pub use error::{Result, SheetError};
pub use events::{WorksheetEvent, WorksheetListener};
pub use history::ActionEngine;
pub use worksheet::{StyleScope, Worksheet};

pub use gridstore_grid as grid;
