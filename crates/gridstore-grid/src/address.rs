//! Cell and range addressing.
//!
//! Provides bidirectional conversion between spreadsheet-style references
//! (`"A1"`, `"B2:C4"`, `"3:5"`, `"B:D"`) and zero-indexed coordinates, plus the
//! span arithmetic every structural edit shares.
//!
//! # Examples
//!
//! ```
//! use gridstore_grid::{CellPosition, RangePosition};
//!
//! let cell: CellPosition = "B3".parse().unwrap();
//! assert_eq!((cell.row, cell.col), (2, 1));
//!
//! let range: RangePosition = "A1:C4".parse().unwrap();
//! assert_eq!((range.rows, range.cols), (4, 3));
//! assert_eq!(range.to_string(), "A1:C4");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::GridError;

/// Span length meaning "through the last row/column of the sheet".
pub const ENTIRE: usize = usize::MAX;

static CELL_A1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").expect("cell reference pattern")
});
static COLUMN_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("column pattern"));
static ROW_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("row pattern"));

/// A cell by row and column index (0-indexed). Orders row-major.
#[derive(
    Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub const fn new(row: usize, col: usize) -> CellPosition {
        CellPosition { row, col }
    }

    /// Parse a reference in A1 notation. Returns `None` if the input is invalid.
    pub fn parse_a1(name: &str) -> Option<CellPosition> {
        let caps = CELL_A1.captures(name.trim())?;
        let col = letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellPosition::new(row, col))
    }

    /// Convert a column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// Translate by a signed offset; `None` when the result would be negative.
    pub fn offset(self, rows: isize, cols: isize) -> Option<CellPosition> {
        Some(CellPosition::new(
            self.row.checked_add_signed(rows)?,
            self.col.checked_add_signed(cols)?,
        ))
    }
}

fn letters_to_col(letters: &str) -> Option<usize> {
    let mut col_acc = 0usize;
    for c in letters.to_ascii_uppercase().bytes() {
        let digit = (c - b'A') as usize + 1;
        col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
    }
    col_acc.checked_sub(1)
}

impl std::str::FromStr for CellPosition {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| GridError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellPosition::col_to_letters(self.col), self.row + 1)
    }
}

/// Which dimension a structural operation addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Coordinate of `pos` along this axis.
    pub fn coord(self, pos: CellPosition) -> usize {
        match self {
            Axis::Row => pos.row,
            Axis::Column => pos.col,
        }
    }

    /// `pos` with its coordinate along this axis replaced.
    pub fn with_coord(self, pos: CellPosition, value: usize) -> CellPosition {
        match self {
            Axis::Row => CellPosition::new(value, pos.col),
            Axis::Column => CellPosition::new(pos.row, value),
        }
    }

    /// `(start, len)` of `range` along this axis.
    pub fn span(self, range: RangePosition) -> (usize, usize) {
        match self {
            Axis::Row => (range.row, range.rows),
            Axis::Column => (range.col, range.cols),
        }
    }

    /// `range` with its span along this axis replaced.
    pub fn with_span(self, range: RangePosition, start: usize, len: usize) -> RangePosition {
        match self {
            Axis::Row => RangePosition::new(start, range.col, len, range.cols),
            Axis::Column => RangePosition::new(range.row, start, range.rows, len),
        }
    }

    /// The band `[start, start + count)` spanning the whole other axis.
    pub fn band(self, start: usize, count: usize) -> RangePosition {
        match self {
            Axis::Row => RangePosition::full_rows(start, count),
            Axis::Column => RangePosition::full_columns(start, count),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

/// New `(start, len)` of a span after `count` entries are inserted at `at`.
///
/// Spans starting at or after `at` move; spans straddling `at` grow.
pub fn shift_span_for_insert(start: usize, len: usize, at: usize, count: usize) -> (usize, usize) {
    if start >= at {
        (start.saturating_add(count), len)
    } else if len == ENTIRE || start + len > at {
        (start, grow(len, count))
    } else {
        (start, len)
    }
}

/// New `(start, len)` of a span after the band `[at, at + count)` is deleted.
///
/// Returns `None` when the span lies entirely inside the band. Spans that
/// overlap the band keep their surviving remainder.
pub fn shift_span_for_delete(
    start: usize,
    len: usize,
    at: usize,
    count: usize,
) -> Option<(usize, usize)> {
    let band_end = at + count;
    let end = if len == ENTIRE { ENTIRE } else { start + len };
    if start >= at && end <= band_end {
        return None;
    }
    if start >= band_end {
        return Some((start - count, len));
    }
    if end <= at {
        return Some((start, len));
    }
    let overlap = end.min(band_end) - start.max(at);
    let new_len = if len == ENTIRE { ENTIRE } else { len - overlap };
    Some((start.min(at), new_len))
}

fn grow(len: usize, count: usize) -> usize {
    if len == ENTIRE {
        ENTIRE
    } else {
        len.saturating_add(count)
    }
}

/// A rectangular range: top-left corner plus row/column counts.
///
/// A count of [`ENTIRE`] extends the range through the last row or column of
/// whatever sheet it is applied to; [`RangePosition::clamp`] resolves it.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RangePosition {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl RangePosition {
    pub const fn new(row: usize, col: usize, rows: usize, cols: usize) -> RangePosition {
        RangePosition {
            row,
            col,
            rows,
            cols,
        }
    }

    /// The range spanning two corners in any order.
    pub fn from_corners(a: CellPosition, b: CellPosition) -> RangePosition {
        let (r0, r1) = (a.row.min(b.row), a.row.max(b.row));
        let (c0, c1) = (a.col.min(b.col), a.col.max(b.col));
        RangePosition::new(r0, c0, r1 - r0 + 1, c1 - c0 + 1)
    }

    pub const fn cell(pos: CellPosition) -> RangePosition {
        RangePosition::new(pos.row, pos.col, 1, 1)
    }

    pub const fn entire() -> RangePosition {
        RangePosition::new(0, 0, ENTIRE, ENTIRE)
    }

    pub const fn full_rows(row: usize, count: usize) -> RangePosition {
        RangePosition::new(row, 0, count, ENTIRE)
    }

    pub const fn full_columns(col: usize, count: usize) -> RangePosition {
        RangePosition::new(0, col, ENTIRE, count)
    }

    pub const fn start(&self) -> CellPosition {
        CellPosition::new(self.row, self.col)
    }

    /// Last row (inclusive).
    pub fn end_row(&self) -> usize {
        if self.rows == ENTIRE {
            ENTIRE
        } else {
            self.row + self.rows.max(1) - 1
        }
    }

    /// Last column (inclusive).
    pub fn end_col(&self) -> usize {
        if self.cols == ENTIRE {
            ENTIRE
        } else {
            self.col + self.cols.max(1) - 1
        }
    }

    pub fn end(&self) -> CellPosition {
        CellPosition::new(self.end_row(), self.end_col())
    }

    pub fn is_single_cell(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    pub fn area(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn contains(&self, pos: CellPosition) -> bool {
        pos.row >= self.row
            && pos.row <= self.end_row()
            && pos.col >= self.col
            && pos.col <= self.end_col()
    }

    pub fn contains_range(&self, other: &RangePosition) -> bool {
        other.row >= self.row
            && other.end_row() <= self.end_row()
            && other.col >= self.col
            && other.end_col() <= self.end_col()
    }

    pub fn intersects(&self, other: &RangePosition) -> bool {
        self.row <= other.end_row()
            && other.row <= self.end_row()
            && self.col <= other.end_col()
            && other.col <= self.end_col()
    }

    pub fn intersection(&self, other: &RangePosition) -> Option<RangePosition> {
        if !self.intersects(other) {
            return None;
        }
        let start = CellPosition::new(self.row.max(other.row), self.col.max(other.col));
        let end = CellPosition::new(
            self.end_row().min(other.end_row()),
            self.end_col().min(other.end_col()),
        );
        Some(RangePosition::from_corners(start, end))
    }

    /// The smallest range covering both.
    pub fn union(&self, other: &RangePosition) -> RangePosition {
        let start = CellPosition::new(self.row.min(other.row), self.col.min(other.col));
        let end = CellPosition::new(
            self.end_row().max(other.end_row()),
            self.end_col().max(other.end_col()),
        );
        RangePosition::from_corners(start, end)
    }

    /// Same size, moved so its top-left corner is `to`.
    pub fn moved_to(&self, to: CellPosition) -> RangePosition {
        RangePosition::new(to.row, to.col, self.rows, self.cols)
    }

    /// Resolve [`ENTIRE`] extents against a sheet size and check bounds.
    pub fn clamp(&self, row_count: usize, col_count: usize) -> crate::Result<RangePosition> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::InvalidRange(format!("{} is empty", self)));
        }
        if self.row >= row_count || self.col >= col_count {
            return Err(GridError::InvalidRange(format!(
                "{} starts outside a {}x{} grid",
                self, row_count, col_count
            )));
        }
        let rows = if self.rows == ENTIRE {
            row_count - self.row
        } else {
            self.rows
        };
        let cols = if self.cols == ENTIRE {
            col_count - self.col
        } else {
            self.cols
        };
        if self.row + rows > row_count || self.col + cols > col_count {
            return Err(GridError::InvalidRange(format!(
                "{} extends outside a {}x{} grid",
                self, row_count, col_count
            )));
        }
        Ok(RangePosition::new(self.row, self.col, rows, cols))
    }

    /// Adjust for a structural edit along `axis`. `None` means the range was
    /// entirely inside a deleted band.
    pub fn shifted(
        &self,
        axis: Axis,
        at: usize,
        count: usize,
        is_insert: bool,
    ) -> Option<RangePosition> {
        let (start, len) = axis.span(*self);
        let (start, len) = if is_insert {
            shift_span_for_insert(start, len, at, count)
        } else {
            shift_span_for_delete(start, len, at, count)?
        };
        Some(axis.with_span(*self, start, len))
    }

    /// Row-major positions of a clamped range.
    pub fn positions(&self) -> impl Iterator<Item = CellPosition> + '_ {
        (self.row..=self.end_row())
            .flat_map(move |row| (self.col..=self.end_col()).map(move |col| CellPosition::new(row, col)))
    }

    /// Parse `A1`, `A1:C4`, `3:5` (full rows) or `B:D` (full columns).
    pub fn parse(text: &str) -> Option<RangePosition> {
        let text = text.trim();
        let Some((a, b)) = text.split_once(':') else {
            return CellPosition::parse_a1(text).map(RangePosition::cell);
        };
        let (a, b) = (a.trim(), b.trim());
        if ROW_NUMBER.is_match(a) && ROW_NUMBER.is_match(b) {
            let r0 = a.parse::<usize>().ok()?.checked_sub(1)?;
            let r1 = b.parse::<usize>().ok()?.checked_sub(1)?;
            return Some(RangePosition::full_rows(r0.min(r1), r0.abs_diff(r1) + 1));
        }
        if COLUMN_LETTERS.is_match(a) && COLUMN_LETTERS.is_match(b) {
            let c0 = letters_to_col(a)?;
            let c1 = letters_to_col(b)?;
            return Some(RangePosition::full_columns(c0.min(c1), c0.abs_diff(c1) + 1));
        }
        Some(RangePosition::from_corners(
            CellPosition::parse_a1(a)?,
            CellPosition::parse_a1(b)?,
        ))
    }
}

impl std::str::FromStr for RangePosition {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| GridError::InvalidRange(s.to_string()))
    }
}

impl From<CellPosition> for RangePosition {
    fn from(pos: CellPosition) -> Self {
        RangePosition::cell(pos)
    }
}

impl fmt::Display for RangePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rows == ENTIRE, self.cols == ENTIRE) {
            (true, true) => f.write_str("*"),
            (false, true) => write!(f, "{}:{}", self.row + 1, self.end_row() + 1),
            (true, false) => write!(
                f,
                "{}:{}",
                CellPosition::col_to_letters(self.col),
                CellPosition::col_to_letters(self.end_col())
            ),
            (false, false) if self.is_single_cell() => write!(f, "{}", self.start()),
            (false, false) => write!(f, "{}:{}", self.start(), self.end()),
        }
    }
}
