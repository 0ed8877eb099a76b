//! Named and highlight range registration.

use gridstore_grid::{HighlightRange, NamedRange};

use super::{Doable, Undoable, done};
use crate::error::Result;
use crate::worksheet::Worksheet;

#[derive(Clone, Debug)]
pub struct AddNamedRange {
    pub range: NamedRange,
    added: Option<String>,
}

impl AddNamedRange {
    pub fn new(range: NamedRange) -> Self {
        Self { range, added: None }
    }
}

impl Doable for AddNamedRange {
    fn name(&self) -> &'static str {
        "AddNamedRange"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.add_named_range(self.range.clone())?;
        tracing::debug!(name = %self.range.name, "named range added");
        self.added = Some(self.range.name.clone());
        Ok(())
    }
}

impl Undoable for AddNamedRange {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let name = done(&self.added, self.name())?;
        sheet.remove_named_range(name)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RemoveNamedRange {
    pub range_name: String,
    backup: Option<NamedRange>,
}

impl RemoveNamedRange {
    pub fn new(name: &str) -> Self {
        Self {
            range_name: name.to_string(),
            backup: None,
        }
    }
}

impl Doable for RemoveNamedRange {
    fn name(&self) -> &'static str {
        "RemoveNamedRange"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.remove_named_range(&self.range_name)?);
        Ok(())
    }
}

impl Undoable for RemoveNamedRange {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let range = done(&self.backup, self.name())?;
        sheet.add_named_range(range.clone())
    }
}

#[derive(Clone, Debug)]
pub struct AddHighlightRange {
    pub range: HighlightRange,
    added: Option<String>,
}

impl AddHighlightRange {
    pub fn new(range: HighlightRange) -> Self {
        Self { range, added: None }
    }
}

impl Doable for AddHighlightRange {
    fn name(&self) -> &'static str {
        "AddHighlightRange"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        sheet.add_highlight_range(self.range.clone())?;
        self.added = Some(self.range.name.clone());
        Ok(())
    }
}

impl Undoable for AddHighlightRange {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let name = done(&self.added, self.name())?;
        sheet.remove_highlight_range(name)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RemoveHighlightRange {
    pub range_name: String,
    backup: Option<HighlightRange>,
}

impl RemoveHighlightRange {
    pub fn new(name: &str) -> Self {
        Self {
            range_name: name.to_string(),
            backup: None,
        }
    }
}

impl Doable for RemoveHighlightRange {
    fn name(&self) -> &'static str {
        "RemoveHighlightRange"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.remove_highlight_range(&self.range_name)?);
        Ok(())
    }
}

impl Undoable for RemoveHighlightRange {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let range = done(&self.backup, self.name())?;
        sheet.add_highlight_range(range.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use gridstore_grid::RangePosition;

    #[test]
    fn test_remove_named_range_undo_keeps_comment() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 5)).unwrap();
        let mut range = NamedRange::new("Totals", RangePosition::new(0, 0, 2, 2));
        range.comment = Some("quarterly".into());
        AddNamedRange::new(range.clone()).do_action(&mut sheet).unwrap();

        let mut remove = RemoveNamedRange::new("TOTALS");
        remove.do_action(&mut sheet).unwrap();
        assert!(sheet.ranges().find("Totals").is_none());
        remove.undo(&mut sheet).unwrap();
        assert_eq!(sheet.ranges().find("totals"), Some(&range));
    }

    #[test]
    fn test_duplicate_name_fails_without_backup() {
        let mut sheet = Worksheet::new(EngineConfig::with_size(5, 5)).unwrap();
        let range = NamedRange::new("A_1", RangePosition::new(0, 0, 1, 1));
        AddNamedRange::new(range.clone()).do_action(&mut sheet).unwrap();
        let mut again = AddNamedRange::new(range);
        assert!(again.do_action(&mut sheet).is_err());
        assert!(again.undo(&mut sheet).is_err());
        assert!(sheet.ranges().find("A_1").is_some());
    }
}
