//! SchemX Core - transactional document core of the schematic editor
//!
//! This crate provides:
//! - The circuit graph model (library, net classes, net signals, component
//!   instances, schematic pages with symbols, net points and net lines)
//! - An identity registry enforcing id and name uniqueness
//! - Reversible structural commands and composite undo units
//! - A linear undo/redo stack with clean-state tracking and change events
//! - The canonical error facility and structured logging macros

pub mod apply;
pub mod commands;
pub mod document;
pub mod draw_wire;
pub mod errors;
pub mod events;
pub mod graph;
pub mod group;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod undo_stack;

pub use apply::apply;
pub use commands::Command;
pub use document::Document;
pub use draw_wire::{DrawWire, WireIds};
pub use errors::{
    ExError, ExErrorKind, Result, SchemError, StackStateError, ValidationError, ValidationResult,
};
pub use events::{ChangeAction, ChangeEvent, DocumentAction, DocumentEvent, DocumentObserver};
pub use graph::{CircuitGraph, DEFAULT_NET_CLASS_NAME};
pub use group::{CommandGroup, RedoOutcome, RedoValidation};
pub use model::EntityKind;
pub use registry::{IdentityRegistry, NameScope};
pub use undo_stack::{StackState, UndoStack};
