//! An open circuit with its undo history

use crate::apply::apply;
use crate::commands::Command;
use crate::draw_wire::{DrawWire, WireIds};
use crate::errors::Result;
use crate::events::{DocumentEvent, DocumentObserver};
use crate::graph::CircuitGraph;
use crate::group::{RedoOutcome, RedoValidation};
use crate::undo_stack::UndoStack;

/// The circuit graph of one open project plus the undo stack editing it
///
/// All tracked edits go through the stack so the graph and the history can
/// never drift apart.
#[derive(Debug, Default)]
pub struct Document {
    graph: CircuitGraph,
    undo_stack: UndoStack,
}

impl Document {
    pub fn new(graph: CircuitGraph) -> Self {
        Self {
            graph,
            undo_stack: UndoStack::new(),
        }
    }

    pub fn with_redo_validation(graph: CircuitGraph, mode: RedoValidation) -> Self {
        Self {
            graph,
            undo_stack: UndoStack::with_redo_validation(mode),
        }
    }

    pub fn graph(&self) -> &CircuitGraph {
        &self.graph
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo_stack
    }

    pub fn into_graph(self) -> CircuitGraph {
        self.graph
    }

    pub fn begin_command(&mut self, title: impl Into<String>) -> Result<()> {
        self.undo_stack.begin_command(title)
    }

    pub fn append_to_active_command(&mut self, cmd: Command) -> Result<()> {
        self.undo_stack
            .append_to_active_command(&mut self.graph, cmd)
    }

    pub fn commit_active_command(&mut self) -> Result<bool> {
        self.undo_stack.commit_active_command()
    }

    pub fn abort_active_command(&mut self) -> Result<()> {
        self.undo_stack.abort_active_command(&mut self.graph)
    }

    /// Run one command as its own undo unit
    pub fn execute(&mut self, cmd: Command) -> Result<()> {
        self.undo_stack.execute(&mut self.graph, cmd)
    }

    /// Run several commands as one undo unit titled `title`
    ///
    /// # Errors
    ///
    /// If any command fails, the unit is rolled back and nothing is pushed.
    pub fn execute_all(
        &mut self,
        title: impl Into<String>,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<()> {
        self.begin_command(title)?;
        for cmd in commands {
            self.append_to_active_command(cmd)?;
        }
        self.commit_active_command()?;
        Ok(())
    }

    /// Apply a command without recording it in the history
    ///
    /// Used for edits that must not be undoable, e.g. repairs while loading.
    ///
    /// # Errors
    ///
    /// Returns `CommandAlreadyActive` while a unit is open, otherwise the
    /// validation error of `cmd`.
    pub fn execute_untracked(&mut self, cmd: &Command) -> Result<()> {
        self.undo_stack.ensure_idle()?;
        apply(&mut self.graph, cmd)?;
        Ok(())
    }

    /// Draw a wire as one undo unit titled "Draw wire"
    pub fn draw_wire(&mut self, wire: &DrawWire) -> Result<WireIds> {
        let (commands, ids) = wire.build(&self.graph)?;
        self.execute_all("Draw wire", commands)?;
        Ok(ids)
    }

    pub fn undo(&mut self) -> Result<()> {
        self.undo_stack.undo(&mut self.graph)
    }

    pub fn redo(&mut self) -> Result<RedoOutcome> {
        self.undo_stack.redo(&mut self.graph)
    }

    pub fn set_redo_validation(&mut self, mode: RedoValidation) {
        self.undo_stack.set_redo_validation(mode);
    }

    pub fn set_clean(&mut self) {
        self.undo_stack.set_clean();
    }

    pub fn is_clean(&self) -> bool {
        self.undo_stack.is_clean()
    }

    pub fn subscribe(&mut self, observer: Box<dyn DocumentObserver>) {
        self.undo_stack.subscribe(observer);
    }

    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        self.undo_stack.take_events()
    }
}
