//! Composite undo units
//!
//! A `CommandGroup` is an ordered list of commands applied as one unit. Each
//! step remembers the inverse produced when it was applied, so the group can
//! be rolled back, undone and redone step by step.

use serde::{Deserialize, Serialize};

use crate::apply::apply;
use crate::commands::Command;
use crate::errors::{Result, SchemError, ValidationError, ValidationResult};
use crate::events::ChangeEvent;
use crate::graph::CircuitGraph;

/// Behaviour of redo when a sub-command no longer validates
///
/// Commands in the history are validated against the graph as it is at redo
/// time. Edits made outside the history (or by a buggy collaborator) can make
/// a previously valid step fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedoValidation {
    /// Roll the unit back and report a consistency fault
    #[default]
    Strict,
    /// Skip failing steps and apply the rest
    Lenient,
}

#[derive(Debug, Clone, PartialEq)]
struct Step {
    command: Command,
    /// Present while the step is applied
    inverse: Option<Command>,
}

/// Result of a successful redo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedoOutcome {
    /// Index and error of every step that was skipped
    pub skipped: Vec<(usize, ValidationError)>,
}

impl RedoOutcome {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandGroup {
    title: String,
    steps: Vec<Step>,
}

impl CommandGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
        }
    }

    /// Execute `commands` in order as one unit
    ///
    /// If any command fails, the ones that already succeeded are undone in
    /// reverse order before the failure is reported.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the failing command, or a
    /// `ConsistencyFault` if the rollback itself failed.
    pub fn execute(
        graph: &mut CircuitGraph,
        title: impl Into<String>,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<Self> {
        let mut group = Self::new(title);
        for cmd in commands {
            if let Err(err) = group.append(graph, cmd) {
                group.rollback(graph)?;
                return Err(err.into());
            }
        }
        Ok(group)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.steps.iter().map(|s| &s.command)
    }

    /// Apply `cmd` and record it as the last step
    ///
    /// On error nothing is recorded and the graph is unchanged.
    pub fn append(&mut self, graph: &mut CircuitGraph, cmd: Command) -> ValidationResult<()> {
        let inverse = apply(graph, &cmd)?;
        self.steps.push(Step {
            command: cmd,
            inverse: Some(inverse),
        });
        Ok(())
    }

    /// Undo every applied step in reverse order and forget all steps
    ///
    /// # Errors
    ///
    /// Returns `ConsistencyFault` if an inverse does not apply.
    pub fn rollback(&mut self, graph: &mut CircuitGraph) -> Result<()> {
        self.undo_applied(graph, "rollback")?;
        self.steps.clear();
        Ok(())
    }

    /// Undo the applied steps in reverse order
    ///
    /// If one inverse fails, the steps already undone are re-applied so the
    /// graph is back where it started, and a `ConsistencyFault` is returned.
    pub fn undo(&mut self, graph: &mut CircuitGraph) -> Result<()> {
        self.undo_applied(graph, "undo")
    }

    fn undo_applied(&mut self, graph: &mut CircuitGraph, op: &str) -> Result<()> {
        let mut undone = Vec::new();
        for i in (0..self.steps.len()).rev() {
            let Some(inverse) = self.steps[i].inverse.take() else {
                continue;
            };
            if let Err(err) = apply(graph, &inverse) {
                self.steps[i].inverse = Some(inverse);
                self.reapply(graph, undone.into_iter().rev());
                return Err(SchemError::fault(op, &self.title, err));
            }
            undone.push(i);
        }
        Ok(())
    }

    /// Apply the given steps again, ignoring failures
    fn reapply(&mut self, graph: &mut CircuitGraph, indices: impl Iterator<Item = usize>) {
        for i in indices {
            match apply(graph, &self.steps[i].command) {
                Ok(inverse) => self.steps[i].inverse = Some(inverse),
                Err(err) => tracing::error!(
                    command_title = %self.title,
                    step = i,
                    error = %err,
                    "step could not be restored"
                ),
            }
        }
    }

    /// Re-apply all steps in order
    ///
    /// # Errors
    ///
    /// In `Strict` mode a failing step rolls back the steps redone so far
    /// and returns `ConsistencyFault`. `Lenient` mode never fails; skipped
    /// steps are listed in the outcome.
    pub fn redo(&mut self, graph: &mut CircuitGraph, mode: RedoValidation) -> Result<RedoOutcome> {
        let mut outcome = RedoOutcome::default();
        for i in 0..self.steps.len() {
            match apply(graph, &self.steps[i].command) {
                Ok(inverse) => self.steps[i].inverse = Some(inverse),
                Err(err) => match mode {
                    RedoValidation::Strict => {
                        if let Err(rollback_err) = self.undo_applied(graph, "redo") {
                            tracing::error!(
                                command_title = %self.title,
                                error = %rollback_err,
                                "redo rollback failed"
                            );
                        }
                        return Err(SchemError::fault("redo", &self.title, err));
                    }
                    RedoValidation::Lenient => {
                        tracing::warn!(
                            command_title = %self.title,
                            step = i,
                            error = %err,
                            "skipping step that no longer applies"
                        );
                        outcome.skipped.push((i, err));
                    }
                },
            }
        }
        Ok(outcome)
    }

    /// Changes of the currently applied steps, in application order
    pub fn applied_changes(&self) -> Vec<ChangeEvent> {
        self.steps
            .iter()
            .filter(|s| s.inverse.is_some())
            .map(|s| s.command.change())
            .collect()
    }

    /// Changes an undo would make, in the order they would be reverted
    pub fn undo_changes(&self) -> Vec<ChangeEvent> {
        self.steps
            .iter()
            .rev()
            .filter_map(|s| s.inverse.as_ref())
            .map(Command::change)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NetClass, NetSignal};
    use schemx_core_types::EntityId;

    #[test]
    fn test_failed_execute_rolls_back() {
        let mut graph = CircuitGraph::new();
        let class = EntityId::new();
        let before = graph.clone();

        let result = CommandGroup::execute(
            &mut graph,
            "Add signals",
            vec![
                Command::add_net_class(NetClass::new(class, "default")),
                Command::add_net_signal(NetSignal::new(EntityId::new(), "GND", class)),
                Command::add_net_signal(NetSignal::new(EntityId::new(), "GND", class)),
            ],
        );

        assert!(matches!(
            result,
            Err(SchemError::Validation(ValidationError::DuplicateName { .. }))
        ));
        assert_eq!(graph, before);
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let mut graph = CircuitGraph::new();
        let class = EntityId::new();
        let mut group = CommandGroup::execute(
            &mut graph,
            "Setup",
            vec![
                Command::add_net_class(NetClass::new(class, "default")),
                Command::add_net_signal(NetSignal::new(EntityId::new(), "GND", class)),
            ],
        )
        .unwrap();
        let after = graph.clone();

        group.undo(&mut graph).unwrap();
        assert!(graph.is_empty());

        let outcome = group.redo(&mut graph, RedoValidation::Strict).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(graph, after);
    }

    #[test]
    fn test_redo_default_mode_is_strict() {
        assert_eq!(RedoValidation::default(), RedoValidation::Strict);
    }
}
