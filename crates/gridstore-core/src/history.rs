//! Undo/redo history over a worksheet.

use std::collections::VecDeque;

use crate::action::{Action, Doable, Undoable};
use crate::config::EngineConfig;
use crate::error::{Result, SheetError};
use crate::worksheet::Worksheet;

/// Owns a worksheet and the history of actions done to it.
///
/// All undoable mutation goes through [`do_action`](Self::do_action). An
/// action is recorded only after it succeeds; doing a new action drops the
/// redo history; once the undo history is longer than the configured limit
/// the oldest entry is discarded.
#[derive(Debug)]
pub struct ActionEngine {
    sheet: Worksheet,
    undo_stack: VecDeque<Action>,
    redo_stack: Vec<Action>,
    limit: usize,
}

impl ActionEngine {
    pub fn new(sheet: Worksheet) -> Self {
        let limit = sheet.config().undo_limit;
        Self {
            sheet,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// A fresh worksheet built from `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Ok(Self::new(Worksheet::new(config)?))
    }

    pub fn sheet(&self) -> &Worksheet {
        &self.sheet
    }

    /// Direct access for bulk loads that bypass history.
    pub fn sheet_mut(&mut self) -> &mut Worksheet {
        &mut self.sheet
    }

    pub fn into_sheet(self) -> Worksheet {
        self.sheet
    }

    pub fn do_action(&mut self, action: impl Into<Action>) -> Result<()> {
        let mut action = action.into();
        action.do_action(&mut self.sheet)?;
        tracing::debug!(action = action.name(), range = ?action.range(), "done");
        self.undo_stack.push_back(action);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        Ok(())
    }

    pub fn undo(&mut self) -> Result<()> {
        let mut action = self.undo_stack.pop_back().ok_or(SheetError::NothingToUndo)?;
        if let Err(error) = action.undo(&mut self.sheet) {
            self.undo_stack.push_back(action);
            return Err(error);
        }
        tracing::debug!(action = action.name(), "undone");
        self.redo_stack.push(action);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        let mut action = self.redo_stack.pop().ok_or(SheetError::NothingToRedo)?;
        if let Err(error) = action.redo(&mut self.sheet) {
            self.redo_stack.push(action);
            return Err(error);
        }
        tracing::debug!(action = action.name(), "redone");
        self.undo_stack.push_back(action);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Names of the undoable actions, oldest first.
    pub fn undo_names(&self) -> Vec<&'static str> {
        self.undo_stack.iter().map(|a| a.name()).collect()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
