//! Undoable worksheet actions.
//!
//! Every mutation a user can undo is an action value. Doing it captures the
//! state needed to reverse it, scoped to what it touches; undoing restores
//! that state. Actions are stored in the [`ActionEngine`](crate::ActionEngine)
//! history after they succeed.
//!
//! Three traits carry the protocol:
//! - [`Doable`] - perform the action (and, by default, redo it the same way)
//! - [`Undoable`] - reverse it
//! - [`Reusable`] - make a fresh copy aimed at another range
//!
//! [`Action`] is the closed set of concrete actions plus [`ActionGroup`].

mod data;
mod group;
mod headers;
mod merge;
mod names;
mod outline;
mod structure;
mod style;

pub use data::{RemoveRangeData, SetCellData, SetPartialGrid, SetRangeData};
pub use group::ActionGroup;
pub use headers::{ResizeHeaders, SetHeadersVisible};
pub use merge::{CopyRange, MergeAction, MoveRange, UnmergeAction};
pub use names::{AddHighlightRange, AddNamedRange, RemoveHighlightRange, RemoveNamedRange};
pub use outline::{AddOutline, RemoveOutline, SetOutlineCollapsed};
pub use structure::{InsertAction, RemoveAction};
pub use style::{RemoveRangeBorders, RemoveRangeStyle, SetRangeBorders, SetRangeStyle};

use gridstore_grid::RangePosition;

use crate::error::{Result, SheetError};
use crate::worksheet::Worksheet;

/// An action that can be performed on a worksheet.
pub trait Doable {
    fn name(&self) -> &'static str;

    /// Perform the action, capturing what undo needs before mutating.
    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()>;

    /// Perform the action again after an undo.
    fn redo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.do_action(sheet)
    }
}

/// An action that can be reversed after it was done.
pub trait Undoable: Doable {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()>;
}

/// An action parameterized by a target range that can be re-aimed.
pub trait Reusable: Sized {
    fn range(&self) -> RangePosition;

    /// A fresh action doing the same thing to `range`, sharing no backup.
    fn clone_to(&self, range: RangePosition) -> Self;
}

/// Every concrete action.
#[derive(Clone, Debug)]
pub enum Action {
    SetCellData(SetCellData),
    SetRangeData(SetRangeData),
    RemoveRangeData(RemoveRangeData),
    SetPartialGrid(SetPartialGrid),
    SetRangeStyle(SetRangeStyle),
    RemoveRangeStyle(RemoveRangeStyle),
    SetRangeBorders(SetRangeBorders),
    RemoveRangeBorders(RemoveRangeBorders),
    Insert(InsertAction),
    Remove(RemoveAction),
    Merge(MergeAction),
    Unmerge(UnmergeAction),
    Move(MoveRange),
    Copy(CopyRange),
    ResizeHeaders(ResizeHeaders),
    SetHeadersVisible(SetHeadersVisible),
    AddNamedRange(AddNamedRange),
    RemoveNamedRange(RemoveNamedRange),
    AddHighlightRange(AddHighlightRange),
    RemoveHighlightRange(RemoveHighlightRange),
    AddOutline(AddOutline),
    RemoveOutline(RemoveOutline),
    SetOutlineCollapsed(SetOutlineCollapsed),
    Group(ActionGroup),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Action::SetCellData($inner) => $body,
            Action::SetRangeData($inner) => $body,
            Action::RemoveRangeData($inner) => $body,
            Action::SetPartialGrid($inner) => $body,
            Action::SetRangeStyle($inner) => $body,
            Action::RemoveRangeStyle($inner) => $body,
            Action::SetRangeBorders($inner) => $body,
            Action::RemoveRangeBorders($inner) => $body,
            Action::Insert($inner) => $body,
            Action::Remove($inner) => $body,
            Action::Merge($inner) => $body,
            Action::Unmerge($inner) => $body,
            Action::Move($inner) => $body,
            Action::Copy($inner) => $body,
            Action::ResizeHeaders($inner) => $body,
            Action::SetHeadersVisible($inner) => $body,
            Action::AddNamedRange($inner) => $body,
            Action::RemoveNamedRange($inner) => $body,
            Action::AddHighlightRange($inner) => $body,
            Action::RemoveHighlightRange($inner) => $body,
            Action::AddOutline($inner) => $body,
            Action::RemoveOutline($inner) => $body,
            Action::SetOutlineCollapsed($inner) => $body,
            Action::Group($inner) => $body,
        }
    };
}

macro_rules! reusable {
    ($self:expr, $inner:ident => $body:expr, $other:expr) => {
        match $self {
            Action::RemoveRangeData($inner) => $body,
            Action::SetPartialGrid($inner) => $body,
            Action::SetRangeStyle($inner) => $body,
            Action::RemoveRangeStyle($inner) => $body,
            Action::SetRangeBorders($inner) => $body,
            Action::RemoveRangeBorders($inner) => $body,
            Action::Insert($inner) => $body,
            Action::Remove($inner) => $body,
            Action::Merge($inner) => $body,
            Action::Unmerge($inner) => $body,
            Action::ResizeHeaders($inner) => $body,
            Action::SetHeadersVisible($inner) => $body,
            _ => $other,
        }
    };
}

impl Action {
    /// Target range of a reusable action.
    pub fn range(&self) -> Option<RangePosition> {
        reusable!(self, a => Some(a.range()), None)
    }

    /// A fresh copy of a reusable action aimed at `range`; `None` for
    /// actions that are not reusable.
    pub fn clone_to(&self, range: RangePosition) -> Option<Action> {
        reusable!(self, a => Some(a.clone_to(range).into()), None)
    }

    pub fn is_reusable(&self) -> bool {
        self.range().is_some()
    }
}

impl Doable for Action {
    fn name(&self) -> &'static str {
        dispatch!(self, a => a.name())
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        dispatch!(self, a => a.do_action(sheet))
    }

    fn redo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        dispatch!(self, a => a.redo(sheet))
    }
}

impl Undoable for Action {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        dispatch!(self, a => a.undo(sheet))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Action {
                fn from(action: $ty) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from!(
    SetCellData(SetCellData),
    SetRangeData(SetRangeData),
    RemoveRangeData(RemoveRangeData),
    SetPartialGrid(SetPartialGrid),
    SetRangeStyle(SetRangeStyle),
    RemoveRangeStyle(RemoveRangeStyle),
    SetRangeBorders(SetRangeBorders),
    RemoveRangeBorders(RemoveRangeBorders),
    Insert(InsertAction),
    Remove(RemoveAction),
    Merge(MergeAction),
    Unmerge(UnmergeAction),
    Move(MoveRange),
    Copy(CopyRange),
    ResizeHeaders(ResizeHeaders),
    SetHeadersVisible(SetHeadersVisible),
    AddNamedRange(AddNamedRange),
    RemoveNamedRange(RemoveNamedRange),
    AddHighlightRange(AddHighlightRange),
    RemoveHighlightRange(RemoveHighlightRange),
    AddOutline(AddOutline),
    RemoveOutline(RemoveOutline),
    SetOutlineCollapsed(SetOutlineCollapsed),
    Group(ActionGroup),
);

/// The backup an action captured, or `NotDone` if it never ran.
pub(crate) fn done<'a, T>(backup: &'a Option<T>, name: &'static str) -> Result<&'a T> {
    backup.as_ref().ok_or(SheetError::NotDone(name))
}
