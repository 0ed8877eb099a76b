//! Row and column header tables.

use serde::{Deserialize, Serialize};

use crate::address::Axis;
use crate::cell::CellBody;
use crate::error::{GridError, Result};
use crate::style::RangeStyle;

/// Metadata for one row or column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Height for rows, width for columns, in pixels.
    pub size: u16,
    pub visible: bool,
    /// Whether the size follows content (row auto-height).
    pub auto_size: bool,
    pub style: Option<RangeStyle>,
    /// Body type given to cells created in this row/column.
    pub body: Option<CellBody>,
}

impl Header {
    pub fn new(size: u16) -> Self {
        Self {
            size,
            visible: true,
            auto_size: true,
            style: None,
            body: None,
        }
    }
}

/// Ordered per-index headers for one axis. The index of a header is its
/// position in the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderTable {
    axis: Axis,
    headers: Vec<Header>,
    default_size: u16,
}

impl HeaderTable {
    pub fn new(axis: Axis, count: usize, default_size: u16) -> Self {
        Self {
            axis,
            headers: vec![Header::new(default_size); count.max(1)],
            default_size,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn default_size(&self) -> u16 {
        self.default_size
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Header> {
        self.headers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Header> {
        self.headers.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Header)> {
        self.headers.iter().enumerate()
    }

    fn header_mut(&mut self, index: usize) -> Result<&mut Header> {
        let len = self.headers.len();
        let axis = self.axis;
        self.headers.get_mut(index).ok_or_else(|| {
            GridError::InvalidAddress(format!("{} {} of {}", axis.name(), index, len))
        })
    }

    /// Check that `[start, start + count)` is inside the table.
    pub fn check_band(&self, start: usize, count: usize) -> Result<()> {
        let inside = start
            .checked_add(count)
            .is_some_and(|end| end <= self.headers.len());
        if count == 0 || !inside {
            return Err(GridError::InvalidRange(format!(
                "{}s {}+{} of {}",
                self.axis.name(),
                start,
                count,
                self.headers.len()
            )));
        }
        Ok(())
    }

    /// Insert `count` default headers before `at`. New headers carry no style.
    pub fn insert(&mut self, at: usize, count: usize) -> Result<()> {
        if at > self.headers.len() {
            return Err(GridError::InvalidAddress(format!(
                "cannot insert {} at {} of {}",
                self.axis.name(),
                at,
                self.headers.len()
            )));
        }
        if self.headers.len().checked_add(count).is_none() {
            return Err(GridError::StructuralLimit(format!(
                "cannot insert {} {}s into {}",
                count,
                self.axis.name(),
                self.headers.len()
            )));
        }
        let fresh = std::iter::repeat_n(Header::new(self.default_size), count);
        self.headers.splice(at..at, fresh);
        Ok(())
    }

    /// Remove `count` headers at `at`, returning them.
    pub fn delete(&mut self, at: usize, count: usize) -> Result<Vec<Header>> {
        if count >= self.headers.len() {
            return Err(GridError::StructuralLimit(format!(
                "cannot delete all {} {}s",
                self.headers.len(),
                self.axis.name()
            )));
        }
        self.check_band(at, count)?;
        Ok(self.headers.drain(at..at + count).collect())
    }

    /// Overwrite the headers starting at `at` with `headers`.
    pub fn restore(&mut self, at: usize, headers: Vec<Header>) -> Result<()> {
        self.check_band(at, headers.len())?;
        for (offset, header) in headers.into_iter().enumerate() {
            self.headers[at + offset] = header;
        }
        Ok(())
    }

    /// Set the size, returning the previous one.
    pub fn set_size(&mut self, index: usize, size: u16) -> Result<u16> {
        let header = self.header_mut(index)?;
        Ok(std::mem::replace(&mut header.size, size))
    }

    /// Set visibility, returning the previous value.
    pub fn set_visible(&mut self, index: usize, visible: bool) -> Result<bool> {
        let header = self.header_mut(index)?;
        Ok(std::mem::replace(&mut header.visible, visible))
    }

    pub fn set_auto_size(&mut self, index: usize, auto_size: bool) -> Result<bool> {
        let header = self.header_mut(index)?;
        Ok(std::mem::replace(&mut header.auto_size, auto_size))
    }

    /// Replace the explicit style, returning the previous one.
    pub fn set_style(&mut self, index: usize, style: Option<RangeStyle>) -> Result<Option<RangeStyle>> {
        let header = self.header_mut(index)?;
        Ok(std::mem::replace(&mut header.style, style))
    }

    pub fn set_body(&mut self, index: usize, body: Option<CellBody>) -> Result<Option<CellBody>> {
        let header = self.header_mut(index)?;
        Ok(std::mem::replace(&mut header.body, body))
    }

    /// Pixel offset of the header at `index`, counting only visible headers.
    pub fn offset_of(&self, index: usize) -> u64 {
        self.headers
            .iter()
            .take(index)
            .filter(|h| h.visible)
            .map(|h| u64::from(h.size))
            .sum()
    }

    /// Indices in `[start, start + count)` with an explicit style.
    pub fn styled_in(&self, start: usize, count: usize) -> impl Iterator<Item = usize> + '_ {
        self.headers
            .iter()
            .enumerate()
            .skip(start)
            .take(count)
            .filter(|(_, h)| h.style.is_some())
            .map(|(i, _)| i)
    }
}
