//! Named and highlight range registries.
//!
//! Entries are independent of cells: they only record a position, which
//! [`RangeRegistry::adjust_for_row_shift`] and
//! [`RangeRegistry::adjust_for_column_shift`] keep current across structural
//! edits. A range entirely inside a deleted band is removed; a range that only
//! overlaps it shrinks to the surviving remainder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::address::{Axis, CellPosition, RangePosition};
use crate::error::{GridError, Result};
use crate::style::Color;

/// Maximum length of a range name in characters.
pub const MAX_NAME_LEN: usize = 255;

/// An entry tracked by a [`RangeSet`].
pub trait TrackedRange: Clone {
    fn name(&self) -> &str;
    fn position(&self) -> RangePosition;
    fn set_position(&mut self, position: RangePosition);
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRange {
    pub name: String,
    pub position: RangePosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NamedRange {
    pub fn new(name: &str, position: RangePosition) -> Self {
        Self {
            name: name.to_string(),
            position,
            comment: None,
        }
    }
}

impl TrackedRange for NamedRange {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> RangePosition {
        self.position
    }

    fn set_position(&mut self, position: RangePosition) {
        self.position = position;
    }
}

/// A range drawn with a colored frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub name: String,
    pub position: RangePosition,
    pub color: Color,
}

impl HighlightRange {
    pub fn new(name: &str, position: RangePosition, color: Color) -> Self {
        Self {
            name: name.to_string(),
            position,
            color,
        }
    }
}

impl TrackedRange for HighlightRange {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> RangePosition {
        self.position
    }

    fn set_position(&mut self, position: RangePosition) {
        self.position = position;
    }
}

/// Entries a structural edit removed or moved, as they were before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftBackup<T> {
    pub removed: Vec<T>,
    pub modified: Vec<T>,
}

impl<T> Default for ShiftBackup<T> {
    fn default() -> Self {
        Self {
            removed: Vec::new(),
            modified: Vec::new(),
        }
    }
}

impl<T> ShiftBackup<T> {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Check a range name: letter, `_` or `\` first, then letters, digits, `_`,
/// `.` or `\`; must not read as a cell reference.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(GridError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return invalid("name cannot be empty");
    };
    if name.chars().count() > MAX_NAME_LEN {
        return invalid("name is too long");
    }
    if !(first.is_alphabetic() || first == '_' || first == '\\') {
        return invalid("must start with a letter, '_' or '\\'");
    }
    if let Some(ch) = chars.find(|ch| !(ch.is_alphanumeric() || matches!(ch, '_' | '.' | '\\'))) {
        return invalid(&format!("invalid character '{}'", ch));
    }
    if CellPosition::parse_a1(name).is_some() {
        return invalid("name looks like a cell reference");
    }
    Ok(())
}

/// Unique-name registry of tracked ranges. Names compare case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeSet<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for RangeSet<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl<T: TrackedRange> RangeSet<T> {
    pub fn add(&mut self, entry: T) -> Result<()> {
        validate_name(entry.name())?;
        let key = key(entry.name());
        if self.entries.contains_key(&key) {
            return Err(GridError::NameAlreadyDefined(entry.name().to_string()));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<T> {
        self.entries
            .remove(&key(name))
            .ok_or_else(|| GridError::NameNotFound(name.to_string()))
    }

    pub fn find(&self, name: &str) -> Option<&T> {
        self.entries.get(&key(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Shift every entry for a structural edit along `axis`, returning the
    /// prior state of each entry the edit touched.
    pub fn adjust(&mut self, axis: Axis, at: usize, count: usize, is_insert: bool) -> ShiftBackup<T> {
        let mut backup = ShiftBackup::default();
        let mut doomed = Vec::new();
        for (key, entry) in self.entries.iter_mut() {
            let before = entry.position();
            match before.shifted(axis, at, count, is_insert) {
                None => doomed.push(key.clone()),
                Some(after) if after != before => {
                    let (start, len) = axis.span(before);
                    if !is_insert && start < at + count && (len == crate::ENTIRE || start + len > at) {
                        backup.modified.push(entry.clone());
                    }
                    entry.set_position(after);
                }
                Some(_) => {}
            }
        }
        for key in doomed {
            if let Some(entry) = self.entries.remove(&key) {
                backup.removed.push(entry);
            }
        }
        backup
    }

    /// Undo an [`adjust`](Self::adjust) that has itself been reversed
    /// structurally: re-add removed entries and reset modified ones.
    pub fn restore(&mut self, backup: &ShiftBackup<T>) {
        for entry in &backup.modified {
            if let Some(live) = self.entries.get_mut(&key(entry.name())) {
                live.set_position(entry.position());
            }
        }
        for entry in &backup.removed {
            self.entries.insert(key(entry.name()), entry.clone());
        }
    }
}

/// Backup of a registry-wide shift.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryShiftBackup {
    pub named: ShiftBackup<NamedRange>,
    pub highlights: ShiftBackup<HighlightRange>,
}

/// Named ranges and highlight ranges of a worksheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeRegistry {
    named: RangeSet<NamedRange>,
    highlights: RangeSet<HighlightRange>,
}

impl RangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_named_range(&mut self, range: NamedRange) -> Result<()> {
        self.named.add(range)
    }

    pub fn remove_named_range(&mut self, name: &str) -> Result<NamedRange> {
        self.named.remove(name)
    }

    pub fn find(&self, name: &str) -> Option<&NamedRange> {
        self.named.find(name)
    }

    pub fn named_ranges(&self) -> &RangeSet<NamedRange> {
        &self.named
    }

    pub fn add_highlight_range(&mut self, range: HighlightRange) -> Result<()> {
        self.highlights.add(range)
    }

    pub fn remove_highlight_range(&mut self, name: &str) -> Result<HighlightRange> {
        self.highlights.remove(name)
    }

    pub fn find_highlight(&self, name: &str) -> Option<&HighlightRange> {
        self.highlights.find(name)
    }

    pub fn highlight_ranges(&self) -> &RangeSet<HighlightRange> {
        &self.highlights
    }

    pub fn adjust_for_row_shift(&mut self, at: usize, count: usize, is_insert: bool) -> RegistryShiftBackup {
        self.adjust(Axis::Row, at, count, is_insert)
    }

    pub fn adjust_for_column_shift(
        &mut self,
        at: usize,
        count: usize,
        is_insert: bool,
    ) -> RegistryShiftBackup {
        self.adjust(Axis::Column, at, count, is_insert)
    }

    pub fn adjust(&mut self, axis: Axis, at: usize, count: usize, is_insert: bool) -> RegistryShiftBackup {
        RegistryShiftBackup {
            named: self.named.adjust(axis, at, count, is_insert),
            highlights: self.highlights.adjust(axis, at, count, is_insert),
        }
    }

    pub fn restore_named(&mut self, backup: &RegistryShiftBackup) {
        self.named.restore(&backup.named);
    }

    pub fn restore_highlights(&mut self, backup: &RegistryShiftBackup) {
        self.highlights.restore(&backup.highlights);
    }
}
