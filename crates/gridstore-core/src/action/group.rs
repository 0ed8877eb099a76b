use super::{Action, Doable, Undoable};
use crate::error::Result;
use crate::worksheet::Worksheet;

/// Several actions done and undone as one history entry.
///
/// Children run in order. If one fails, the children already done are undone
/// in reverse and the failure is returned, so a group either applies whole or
/// not at all.
#[derive(Clone, Debug, Default)]
pub struct ActionGroup {
    pub label: String,
    actions: Vec<Action>,
}

impl ActionGroup {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            actions: Vec::new(),
        }
    }

    pub fn with(mut self, action: impl Into<Action>) -> Self {
        self.push(action);
        self
    }

    pub fn push(&mut self, action: impl Into<Action>) {
        self.actions.push(action.into());
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn run(&mut self, sheet: &mut Worksheet, redo: bool) -> Result<()> {
        for index in 0..self.actions.len() {
            let step = &mut self.actions[index];
            let outcome = if redo { step.redo(sheet) } else { step.do_action(sheet) };
            if let Err(error) = outcome {
                tracing::debug!(group = %self.label, step = index, %error, "group aborted");
                for done in self.actions[..index].iter_mut().rev() {
                    if let Err(undo_error) = done.undo(sheet) {
                        tracing::warn!(action = done.name(), %undo_error, "rollback failed");
                    }
                }
                return Err(error);
            }
        }
        Ok(())
    }
}

impl Doable for ActionGroup {
    fn name(&self) -> &'static str {
        "Group"
    }

    fn do_action(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.run(sheet, false)
    }

    fn redo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        self.run(sheet, true)
    }
}

impl Undoable for ActionGroup {
    /// Undo children in reverse. If one fails, the children already undone
    /// are redone so the group stays fully applied.
    fn undo(&mut self, sheet: &mut Worksheet) -> Result<()> {
        for index in (0..self.actions.len()).rev() {
            if let Err(error) = self.actions[index].undo(sheet) {
                tracing::debug!(group = %self.label, step = index, %error, "group undo aborted");
                for undone in self.actions[index + 1..].iter_mut() {
                    if let Err(redo_error) = undone.redo(sheet) {
                        tracing::warn!(action = undone.name(), %redo_error, "reapply failed");
                    }
                }
                return Err(error);
            }
        }
        Ok(())
    }
}
