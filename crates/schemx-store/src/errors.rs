//! Error helpers for schemx-store
//!
//! The store reports every failure as the canonical `ExError` from
//! schemx-core; these helpers build the persistence kinds with a consistent
//! operation name and message.

use std::path::Path;

use schemx_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// IO error with the affected path in the message
pub fn io_error_at(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation)
        .with_message(format!("{}: {}", path.display(), err))
}

pub fn xml_syntax(position: u64, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::XmlSyntax)
        .with_op("xml_parse")
        .with_message(format!("at byte {}: {}", position, reason))
}

pub fn no_root_node() -> ExError {
    ExError::new(ExErrorKind::NoRootNode)
        .with_op("xml_parse")
        .with_message("document has no root element")
}

pub fn invalid_root_node(expected: &str, found: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidRootNode)
        .with_op("xml_parse")
        .with_message(format!("expected root <{}>, found <{}>", expected, found))
}

pub fn invalid_node_name(name: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidNodeName)
        .with_op("xml_node")
        .with_message(format!("invalid node name \"{}\"", name))
}

pub fn invalid_attribute_name(name: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidAttributeName)
        .with_op("xml_node")
        .with_message(format!("invalid attribute name \"{}\"", name))
}

pub fn append_failed(reason: &str) -> ExError {
    ExError::new(ExErrorKind::AppendFailed)
        .with_op("xml_append")
        .with_message(reason.to_string())
}

pub fn remove_failed(reason: &str) -> ExError {
    ExError::new(ExErrorKind::RemoveFailed)
        .with_op("xml_remove")
        .with_message(reason.to_string())
}

pub fn invalid_project_file(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::InvalidProjectFile)
        .with_op("project_load")
        .with_message(format!("{}: {}", path.display(), reason))
}

/// A project file whose content cannot be loaded, keeping the cause
pub fn invalid_project_content(path: &Path, cause: ExError) -> ExError {
    ExError::new(ExErrorKind::InvalidProjectFile)
        .with_op("project_load")
        .with_message(format!("{}: {}", path.display(), cause.message()))
        .with_source(cause)
}

pub fn already_locked(path: &Path, owner: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::AlreadyLocked)
        .with_op("lock")
        .with_message(format!("{} is locked by {}", path.display(), owner))
}

pub fn invalid_workspace(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::InvalidWorkspace)
        .with_op("workspace")
        .with_message(format!("{}: {}", path.display(), reason))
}

pub fn cancelled(operation: &str) -> ExError {
    ExError::new(ExErrorKind::Cancelled)
        .with_op(operation)
        .with_message("cancelled by user")
}

pub fn serialization_error(operation: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_message(reason.to_string())
}

/// Aggregate the failures of a multi-file save into one error
///
/// The message lists every failure; the first one is kept as source.
pub fn save_failed(failures: Vec<ExError>) -> ExError {
    let message = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    let mut err = ExError::new(ExErrorKind::SaveFailed)
        .with_op("project_save")
        .with_message(format!("{} file(s) could not be saved: {}", failures.len(), message));
    if let Some(first) = failures.into_iter().next() {
        err = err.with_source(first);
    }
    err
}
