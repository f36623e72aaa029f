//! Linear undo/redo history
//!
//! State machine with two states:
//!
//! - **Idle**: no unit is open; `begin_command`, `execute`, `undo` and
//!   `redo` are allowed.
//! - **CommandActive**: a unit opened by `begin_command` collects sub-edits
//!   until `commit_active_command` or `abort_active_command`.
//!
//! Sub-edits are applied to the graph as soon as they are appended, so the
//! document always reflects what the user sees. History is strictly linear:
//! committing after an undo discards the redo tail.

use std::time::Instant;

use crate::commands::Command;
use crate::errors::{Result, StackStateError};
use crate::events::{DocumentAction, DocumentEvent, DocumentObserver, EventHub};
use crate::graph::CircuitGraph;
use crate::group::{CommandGroup, RedoOutcome, RedoValidation};
use crate::{log_op_end, log_op_error, log_op_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    Idle,
    CommandActive,
}

#[derive(Debug)]
pub struct UndoStack {
    history: Vec<CommandGroup>,
    /// Number of history entries currently applied
    index: usize,
    active: Option<CommandGroup>,
    /// History index at which the document was last saved
    clean_index: Option<usize>,
    redo_validation: RedoValidation,
    events: EventHub,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_redo_validation(RedoValidation::default())
    }

    pub fn with_redo_validation(redo_validation: RedoValidation) -> Self {
        Self {
            history: Vec::new(),
            index: 0,
            active: None,
            clean_index: Some(0),
            redo_validation,
            events: EventHub::default(),
        }
    }

    pub fn state(&self) -> StackState {
        if self.active.is_some() {
            StackState::CommandActive
        } else {
            StackState::Idle
        }
    }

    pub fn is_command_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn redo_validation(&self) -> RedoValidation {
        self.redo_validation
    }

    pub fn set_redo_validation(&mut self, mode: RedoValidation) {
        self.redo_validation = mode;
    }

    pub(crate) fn ensure_idle(&self) -> Result<()> {
        match &self.active {
            Some(group) => Err(StackStateError::CommandAlreadyActive {
                title: group.title().to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Open a new undo unit
    ///
    /// # Errors
    ///
    /// Returns `CommandAlreadyActive` if another unit is open.
    pub fn begin_command(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if let Err(err) = self.ensure_idle() {
            log_op_error!("begin_command", err.clone(), duration_ms = 0u64, command_title = %title);
            return Err(err);
        }
        tracing::debug!(command_title = %title, "begin command");
        self.active = Some(CommandGroup::new(title));
        Ok(())
    }

    /// Apply `cmd` immediately and add it to the open unit
    ///
    /// If `cmd` fails, the whole open unit is rolled back and discarded and
    /// the stack returns to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveCommand` without an open unit, the validation error
    /// of `cmd`, or `ConsistencyFault` if the rollback failed.
    pub fn append_to_active_command(
        &mut self,
        graph: &mut CircuitGraph,
        cmd: Command,
    ) -> Result<()> {
        let Some(group) = self.active.as_mut() else {
            return Err(StackStateError::NoActiveCommand.into());
        };
        let description = cmd.description();
        if let Err(err) = group.append(graph, cmd) {
            let title = group.title().to_string();
            tracing::warn!(
                command_title = %title,
                command = %description,
                error = %err,
                "sub-command failed, rolling back active command"
            );
            let mut group = self.active.take().ok_or(StackStateError::NoActiveCommand)?;
            group.rollback(graph)?;
            return Err(err.into());
        }
        Ok(())
    }

    /// Close the open unit and push it onto the history
    ///
    /// An empty unit is dropped instead of pushed. Any redo tail is
    /// discarded. Returns whether a history entry was added.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveCommand` without an open unit.
    pub fn commit_active_command(&mut self) -> Result<bool> {
        let group = self.active.take().ok_or(StackStateError::NoActiveCommand)?;
        let title = group.title().to_string();
        log_op_start!("commit", command_title = %title);
        let start = Instant::now();

        if group.is_empty() {
            log_op_end!(
                "commit",
                duration_ms = start.elapsed().as_millis() as u64,
                command_title = %title,
                pushed = false
            );
            return Ok(false);
        }

        self.history.truncate(self.index);
        if self.clean_index.is_some_and(|clean| clean > self.index) {
            self.clean_index = None;
        }
        let changes = group.applied_changes();
        self.history.push(group);
        self.index = self.history.len();

        self.events.emit(DocumentEvent {
            action: DocumentAction::Committed,
            title: title.clone(),
            changes,
        });
        log_op_end!(
            "commit",
            duration_ms = start.elapsed().as_millis() as u64,
            command_title = %title,
            pushed = true,
            history_len = self.history.len()
        );
        Ok(true)
    }

    /// Revert and discard the open unit
    ///
    /// # Errors
    ///
    /// Returns `NoActiveCommand` without an open unit, or
    /// `ConsistencyFault` if the rollback failed.
    pub fn abort_active_command(&mut self, graph: &mut CircuitGraph) -> Result<()> {
        let mut group = self.active.take().ok_or(StackStateError::NoActiveCommand)?;
        log_op_start!("abort", command_title = %group.title());
        let start = Instant::now();
        group.rollback(graph).map_err(|e| {
            log_op_error!("abort", e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            e
        })?;
        log_op_end!("abort", duration_ms = start.elapsed().as_millis() as u64);
        Ok(())
    }

    /// Execute a single command as its own undo unit
    ///
    /// # Errors
    ///
    /// Same as `begin_command` and `append_to_active_command`.
    pub fn execute(&mut self, graph: &mut CircuitGraph, cmd: Command) -> Result<()> {
        let title = cmd.description();
        self.begin_command(title)?;
        self.append_to_active_command(graph, cmd)?;
        self.commit_active_command()?;
        Ok(())
    }

    /// Revert the most recent applied history entry
    ///
    /// # Errors
    ///
    /// Returns `CommandAlreadyActive` while a unit is open, `NothingToUndo`
    /// at the start of history, or `ConsistencyFault` if the entry could not
    /// be reverted; the history pointer is unchanged on error.
    pub fn undo(&mut self, graph: &mut CircuitGraph) -> Result<()> {
        log_op_start!("undo", history_index = self.index);
        let start = Instant::now();
        let result = self.undo_inner(graph);
        match &result {
            Ok(()) => {
                log_op_end!(
                    "undo",
                    duration_ms = start.elapsed().as_millis() as u64,
                    history_index = self.index
                );
            }
            Err(e) => {
                log_op_error!("undo", e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            }
        }
        result
    }

    fn undo_inner(&mut self, graph: &mut CircuitGraph) -> Result<()> {
        self.ensure_idle()?;
        if self.index == 0 {
            return Err(StackStateError::NothingToUndo.into());
        }
        let group = &mut self.history[self.index - 1];
        let changes = group.undo_changes();
        group.undo(graph)?;
        let title = group.title().to_string();
        self.index -= 1;
        self.events.emit(DocumentEvent {
            action: DocumentAction::Undone,
            title,
            changes,
        });
        Ok(())
    }

    /// Re-apply the next history entry
    ///
    /// Behaviour on a step that no longer validates depends on the
    /// configured `RedoValidation`.
    ///
    /// # Errors
    ///
    /// Returns `CommandAlreadyActive` while a unit is open, `NothingToRedo`
    /// at the end of history, or `ConsistencyFault` in strict mode.
    pub fn redo(&mut self, graph: &mut CircuitGraph) -> Result<RedoOutcome> {
        log_op_start!("redo", history_index = self.index);
        let start = Instant::now();
        let result = self.redo_inner(graph);
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "redo",
                    duration_ms = start.elapsed().as_millis() as u64,
                    history_index = self.index,
                    skipped = outcome.skipped.len()
                );
            }
            Err(e) => {
                log_op_error!("redo", e.clone(), duration_ms = start.elapsed().as_millis() as u64);
            }
        }
        result
    }

    fn redo_inner(&mut self, graph: &mut CircuitGraph) -> Result<RedoOutcome> {
        self.ensure_idle()?;
        if self.index >= self.history.len() {
            return Err(StackStateError::NothingToRedo.into());
        }
        let mode = self.redo_validation;
        let group = &mut self.history[self.index];
        let outcome = group.redo(graph, mode)?;
        let event = DocumentEvent {
            action: DocumentAction::Redone,
            title: group.title().to_string(),
            changes: group.applied_changes(),
        };
        self.index += 1;
        self.events.emit(event);
        Ok(outcome)
    }

    pub fn can_undo(&self) -> bool {
        self.active.is_none() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.active.is_none() && self.index < self.history.len()
    }

    /// Title of the entry `undo` would revert
    pub fn undo_text(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.history.get(i))
            .map(CommandGroup::title)
    }

    /// Title of the entry `redo` would re-apply
    pub fn redo_text(&self) -> Option<&str> {
        self.history.get(self.index).map(CommandGroup::title)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Number of history entries currently applied
    pub fn index(&self) -> usize {
        self.index
    }

    /// Mark the current history position as saved
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.index);
    }

    /// True if the document matches the last saved state
    ///
    /// An open unit with applied sub-edits makes the document dirty.
    pub fn is_clean(&self) -> bool {
        let active_dirty = self.active.as_ref().is_some_and(|g| !g.is_empty());
        !active_dirty && self.clean_index == Some(self.index)
    }

    /// Drop all history and mark the current state clean
    ///
    /// # Errors
    ///
    /// Returns `CommandAlreadyActive` while a unit is open.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.history.clear();
        self.index = 0;
        self.clean_index = Some(0);
        Ok(())
    }

    pub fn subscribe(&mut self, observer: Box<dyn DocumentObserver>) {
        self.events.subscribe(observer);
    }

    /// Take all queued document events
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        self.events.drain()
    }
}
