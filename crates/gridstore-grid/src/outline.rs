//! Row/column outline groups.

use serde::{Deserialize, Serialize};

use crate::address::{Axis, shift_span_for_delete, shift_span_for_insert};
use crate::error::{GridError, Result};

/// Deepest nesting level accepted.
pub const MAX_OUTLINE_LEVEL: usize = 7;

/// A group of consecutive rows or columns that can be collapsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outline {
    pub start: usize,
    pub count: usize,
    pub collapsed: bool,
}

impl Outline {
    pub fn new(start: usize, count: usize) -> Self {
        Self {
            start,
            count,
            collapsed: false,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.count
    }

    fn same_span(&self, start: usize, count: usize) -> bool {
        self.start == start && self.count == count
    }

    fn contains_span(&self, other: &Outline) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }

    fn overlaps(&self, other: &Outline) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Outline groups of one axis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineAxis {
    groups: Vec<Outline>,
}

impl OutlineAxis {
    pub fn iter(&self) -> impl Iterator<Item = &Outline> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn find(&self, start: usize, count: usize) -> Option<&Outline> {
        self.groups.iter().find(|g| g.same_span(start, count))
    }

    /// Nesting depth at `index` (0 = not grouped).
    pub fn level_of(&self, index: usize) -> usize {
        self.groups
            .iter()
            .filter(|g| g.start <= index && index < g.end())
            .count()
    }

    /// Add a group. Groups nest but may not partially overlap.
    pub fn add(&mut self, start: usize, count: usize) -> Result<Outline> {
        if count == 0 {
            return Err(GridError::InvalidRange("outline group is empty".to_string()));
        }
        let outline = Outline::new(start, count);
        for group in &self.groups {
            if group.same_span(start, count) {
                return Err(GridError::InvalidRange(format!(
                    "outline {}+{} already exists",
                    start, count
                )));
            }
            if group.overlaps(&outline)
                && !group.contains_span(&outline)
                && !outline.contains_span(group)
            {
                return Err(GridError::InvalidRange(format!(
                    "outline {}+{} crosses {}+{}",
                    start, count, group.start, group.count
                )));
            }
        }
        let deepest = (start..start + count)
            .map(|i| self.level_of(i))
            .max()
            .unwrap_or(0);
        if deepest >= MAX_OUTLINE_LEVEL {
            return Err(GridError::StructuralLimit(format!(
                "outline nesting exceeds {} levels",
                MAX_OUTLINE_LEVEL
            )));
        }
        self.groups.push(outline);
        self.groups.sort_by_key(|g| (g.start, std::cmp::Reverse(g.count)));
        Ok(outline)
    }

    pub fn remove(&mut self, start: usize, count: usize) -> Result<Outline> {
        let index = self
            .groups
            .iter()
            .position(|g| g.same_span(start, count))
            .ok_or(GridError::OutlineNotFound { start, count })?;
        Ok(self.groups.remove(index))
    }

    /// Set the collapsed flag, returning the previous value.
    pub fn set_collapsed(&mut self, start: usize, count: usize, collapsed: bool) -> Result<bool> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.same_span(start, count))
            .ok_or(GridError::OutlineNotFound { start, count })?;
        Ok(std::mem::replace(&mut group.collapsed, collapsed))
    }

    /// Shift groups for a structural edit, with the same policy as ranges.
    pub fn adjust(&mut self, at: usize, count: usize, is_insert: bool) -> OutlineShiftBackup {
        let mut backup = OutlineShiftBackup::default();
        let mut kept: Vec<Outline> = Vec::with_capacity(self.groups.len());
        for group in self.groups.drain(..) {
            let shifted = if is_insert {
                Some(shift_span_for_insert(group.start, group.count, at, count))
            } else {
                shift_span_for_delete(group.start, group.count, at, count)
            };
            let Some((start, len)) = shifted else {
                backup.removed.push(group);
                continue;
            };
            let after = Outline {
                start,
                count: len,
                collapsed: group.collapsed,
            };
            if kept.iter().any(|k| k.same_span(start, len)) {
                backup.removed.push(group);
                continue;
            }
            if !is_insert && group.start < at + count && group.end() > at {
                backup.modified.push((group, after));
            }
            kept.push(after);
        }
        self.groups = kept;
        backup
    }

    /// Reverse a deleting [`adjust`](Self::adjust) once the deleted band
    /// `[at, at + count)` has been inserted again.
    pub fn restore(&mut self, backup: &OutlineShiftBackup, at: usize, count: usize) {
        for (before, after) in &backup.modified {
            let (start, len) = shift_span_for_insert(after.start, after.count, at, count);
            if let Some(live) = self.groups.iter_mut().find(|g| g.same_span(start, len)) {
                *live = *before;
            }
        }
        self.groups.extend(backup.removed.iter().copied());
        self.groups
            .sort_by_key(|g| (g.start, std::cmp::Reverse(g.count)));
    }
}

/// Outline groups a structural edit removed, and `(before, after)` pairs
/// for groups it reshaped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutlineShiftBackup {
    pub removed: Vec<Outline>,
    pub modified: Vec<(Outline, Outline)>,
}

impl OutlineShiftBackup {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Row and column outlines of a worksheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineRegistry {
    rows: OutlineAxis,
    columns: OutlineAxis,
}

impl OutlineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(&self, axis: Axis) -> &OutlineAxis {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut OutlineAxis {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }
}
