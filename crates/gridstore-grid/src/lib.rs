//! gridstore-grid - cell storage, headers, styles and range registries.
//!
//! Everything here is plain data plus the structural operations that keep it
//! consistent. Undo, events and configuration live in `gridstore-core`.

pub mod address;
pub mod cell;
pub mod error;
pub mod header;
pub mod outline;
pub mod partial;
pub mod registry;
pub mod store;
pub mod style;

pub use address::{Axis, CellPosition, ENTIRE, RangePosition};
pub use cell::{
    Cell, CellBody, CellContent, CellInput, CellValue, DataFormat, format_number, format_value,
};
pub use error::{GridError, Result};
pub use header::{Header, HeaderTable};
pub use outline::{MAX_OUTLINE_LEVEL, Outline, OutlineAxis, OutlineRegistry, OutlineShiftBackup};
pub use partial::{GridContent, PartialGrid};
pub use registry::{
    HighlightRange, NamedRange, RangeRegistry, RangeSet, RegistryShiftBackup, ShiftBackup,
    TrackedRange, validate_name,
};
pub use store::CellStore;
pub use style::{
    BorderLine, BorderPositions, BorderSide, CellBorders, Color, DEFAULT_FONT_SIZE_100PT,
    HorizontalAlign, RangeStyle, StyleFlags, VerticalAlign, apply_to_slot, cascade,
    remove_from_slot,
};
