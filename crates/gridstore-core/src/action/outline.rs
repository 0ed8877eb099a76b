use gridstore_grid::{Axis, Outline};

use super::{Doable, Undoable, done};
use crate::error::Result;
use crate::worksheet::{CollapseBackup, Worksheet};

/// Group a band of rows or columns.
#[derive(Clone, Debug)]
pub struct AddOutline {
    pub axis: Axis,
    pub start: usize,
    pub count: usize,
    added: Option<Outline>,
}

impl AddOutline {
    pub fn new(axis: Axis, start: usize, count: usize) -> Self {
        Self {
            axis,
            start,
            count,
            added: None,
        }
    }
}

impl Doable for AddOutline {
    fn name(&self) -> &'static str {
        "AddOutline"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.added = Some(sheet.add_outline(self.axis, self.start, self.count)?);
        Ok(())
    }
}

impl Undoable for AddOutline {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let outline = done(&self.added, self.name())?;
        sheet.remove_outline(self.axis, outline.start, outline.count)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RemoveOutline {
    pub axis: Axis,
    pub start: usize,
    pub count: usize,
    backup: Option<Outline>,
}

impl RemoveOutline {
    pub fn new(axis: Axis, start: usize, count: usize) -> Self {
        Self {
            axis,
            start,
            count,
            backup: None,
        }
    }
}

impl Doable for RemoveOutline {
    fn name(&self) -> &'static str {
        "RemoveOutline"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.remove_outline(self.axis, self.start, self.count)?);
        Ok(())
    }
}

impl Undoable for RemoveOutline {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let outline = done(&self.backup, self.name())?;
        sheet.restore_outline(self.axis, outline.clone())
    }
}

/// Collapse or expand an outline group, hiding or showing its headers.
#[derive(Clone, Debug)]
pub struct SetOutlineCollapsed {
    pub axis: Axis,
    pub start: usize,
    pub count: usize,
    pub collapsed: bool,
    backup: Option<CollapseBackup>,
}

impl SetOutlineCollapsed {
    pub fn new(axis: Axis, start: usize, count: usize, collapsed: bool) -> Self {
        Self {
            axis,
            start,
            count,
            collapsed,
            backup: None,
        }
    }
}

impl Doable for SetOutlineCollapsed {
    fn name(&self) -> &'static str {
        "SetOutlineCollapsed"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.backup = Some(sheet.set_outline_collapsed(self.axis, self.start, self.count, self.collapsed)?);
        Ok(())
    }
}

impl Undoable for SetOutlineCollapsed {
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        let backup = done(&self.backup, self.name())?;
        sheet.restore_outline_collapsed(self.axis, self.start, self.count, backup)
    }
}
