use schemx_core_types::EntityId;
use thiserror::Error;

use crate::model::EntityKind;
use crate::registry::NameScope;

/// Result type alias using SchemError
pub type Result<T> = std::result::Result<T, SchemError>;

/// Result type alias for graph-level validation
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and structured log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    DuplicateId,
    DuplicateName,
    EmptyName,
    DanglingReference,
    NonEmptyDependents,
    NetSignalMismatch,
    DegenerateNetLine,
    NotFound,

    // Undo stack
    CommandAlreadyActive,
    NoActiveCommand,
    NothingToUndo,
    NothingToRedo,

    // Persistence
    XmlSyntax,
    NoRootNode,
    InvalidRootNode,
    InvalidNodeName,
    InvalidAttributeName,
    AppendFailed,
    RemoveFailed,
    InvalidProjectFile,
    AlreadyLocked,
    InvalidWorkspace,
    SaveFailed,
    Cancelled,
    Io,
    Serialization,

    // Internal
    ConsistencyFault,
    Internal,
}

/// Coarse grouping of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected edit, no model mutation happened
    Validation,
    /// Caller used the undo stack out of order
    StackState,
    /// File, lock or format problem
    Persistence,
    /// The history could not be re-applied; the document is suspect
    Fatal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateId => "ERR_DUPLICATE_ID",
            ExErrorKind::DuplicateName => "ERR_DUPLICATE_NAME",
            ExErrorKind::EmptyName => "ERR_EMPTY_NAME",
            ExErrorKind::DanglingReference => "ERR_DANGLING_REFERENCE",
            ExErrorKind::NonEmptyDependents => "ERR_NON_EMPTY_DEPENDENTS",
            ExErrorKind::NetSignalMismatch => "ERR_NET_SIGNAL_MISMATCH",
            ExErrorKind::DegenerateNetLine => "ERR_DEGENERATE_NET_LINE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::CommandAlreadyActive => "ERR_COMMAND_ALREADY_ACTIVE",
            ExErrorKind::NoActiveCommand => "ERR_NO_ACTIVE_COMMAND",
            ExErrorKind::NothingToUndo => "ERR_NOTHING_TO_UNDO",
            ExErrorKind::NothingToRedo => "ERR_NOTHING_TO_REDO",
            ExErrorKind::XmlSyntax => "ERR_XML_SYNTAX",
            ExErrorKind::NoRootNode => "ERR_NO_ROOT_NODE",
            ExErrorKind::InvalidRootNode => "ERR_INVALID_ROOT_NODE",
            ExErrorKind::InvalidNodeName => "ERR_INVALID_NODE_NAME",
            ExErrorKind::InvalidAttributeName => "ERR_INVALID_ATTRIBUTE_NAME",
            ExErrorKind::AppendFailed => "ERR_APPEND_FAILED",
            ExErrorKind::RemoveFailed => "ERR_REMOVE_FAILED",
            ExErrorKind::InvalidProjectFile => "ERR_INVALID_PROJECT_FILE",
            ExErrorKind::AlreadyLocked => "ERR_ALREADY_LOCKED",
            ExErrorKind::InvalidWorkspace => "ERR_INVALID_WORKSPACE",
            ExErrorKind::SaveFailed => "ERR_SAVE_FAILED",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ConsistencyFault => "ERR_CONSISTENCY_FAULT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Get the category this kind belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExErrorKind::DuplicateId
            | ExErrorKind::DuplicateName
            | ExErrorKind::EmptyName
            | ExErrorKind::DanglingReference
            | ExErrorKind::NonEmptyDependents
            | ExErrorKind::NetSignalMismatch
            | ExErrorKind::DegenerateNetLine
            | ExErrorKind::NotFound => ErrorCategory::Validation,
            ExErrorKind::CommandAlreadyActive
            | ExErrorKind::NoActiveCommand
            | ExErrorKind::NothingToUndo
            | ExErrorKind::NothingToRedo => ErrorCategory::StackState,
            ExErrorKind::ConsistencyFault | ExErrorKind::Internal => ErrorCategory::Fatal,
            _ => ErrorCategory::Persistence,
        }
    }
}

/// Canonical structured error type
///
/// Provides classification fields for programmatic handling and rich context
/// for debugging. Domain errors of every crate convert into it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// A graph edit was rejected; the graph is unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("There is already a {kind} with the UUID \"{id}\"")]
    DuplicateId { kind: EntityKind, id: EntityId },

    #[error("There is already a {scope} with the name \"{name}\"")]
    DuplicateName { scope: NameScope, name: String },

    #[error("The {scope} name must not be empty")]
    EmptyName { scope: NameScope },

    #[error("{kind} {id} references unknown {target_kind} {target_id}")]
    DanglingReference {
        kind: EntityKind,
        id: EntityId,
        target_kind: EntityKind,
        target_id: EntityId,
    },

    #[error("{kind} {id} still has {count} {dependent_kind}(s) attached")]
    NonEmptyDependents {
        kind: EntityKind,
        id: EntityId,
        dependent_kind: EntityKind,
        count: usize,
    },

    #[error("Net line {line_id} connects net signals {start_signal} and {end_signal}")]
    NetSignalMismatch {
        line_id: EntityId,
        start_signal: EntityId,
        end_signal: EntityId,
    },

    #[error("Net line {line_id} starts and ends at net point {point_id}")]
    DegenerateNetLine { line_id: EntityId, point_id: EntityId },

    #[error("{kind} not found: {id}")]
    UnknownEntity { kind: EntityKind, id: EntityId },
}

/// The undo stack was driven out of order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackStateError {
    #[error("Another command is active: \"{title}\"")]
    CommandAlreadyActive { title: String },

    #[error("No command is active")]
    NoActiveCommand,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Top-level error of the document core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    StackState(#[from] StackStateError),

    /// Undo, redo or rollback of an already validated edit failed
    #[error("Consistency fault during {op} of \"{title}\": {source}")]
    ConsistencyFault {
        op: String,
        title: String,
        source: ValidationError,
    },
}

impl SchemError {
    pub(crate) fn fault(op: &str, title: &str, source: ValidationError) -> Self {
        SchemError::ConsistencyFault {
            op: op.to_string(),
            title: title.to_string(),
            source,
        }
    }

    /// Check whether this error leaves the document in a suspect state
    pub fn is_fatal(&self) -> bool {
        matches!(self, SchemError::ConsistencyFault { .. })
    }
}

impl From<ValidationError> for ExError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        match err {
            ValidationError::DuplicateId { id, .. } => ExError::new(ExErrorKind::DuplicateId)
                .with_entity_id(id)
                .with_message(message),
            ValidationError::DuplicateName { .. } => {
                ExError::new(ExErrorKind::DuplicateName).with_message(message)
            }
            ValidationError::EmptyName { .. } => {
                ExError::new(ExErrorKind::EmptyName).with_message(message)
            }
            ValidationError::DanglingReference { id, .. } => {
                ExError::new(ExErrorKind::DanglingReference)
                    .with_entity_id(id)
                    .with_message(message)
            }
            ValidationError::NonEmptyDependents { id, .. } => {
                ExError::new(ExErrorKind::NonEmptyDependents)
                    .with_entity_id(id)
                    .with_message(message)
            }
            ValidationError::NetSignalMismatch { line_id, .. } => {
                ExError::new(ExErrorKind::NetSignalMismatch)
                    .with_entity_id(line_id)
                    .with_message(message)
            }
            ValidationError::DegenerateNetLine { line_id, .. } => {
                ExError::new(ExErrorKind::DegenerateNetLine)
                    .with_entity_id(line_id)
                    .with_message(message)
            }
            ValidationError::UnknownEntity { id, .. } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(id)
                .with_message(message),
        }
    }
}

impl From<StackStateError> for ExError {
    fn from(err: StackStateError) -> Self {
        let kind = match err {
            StackStateError::CommandAlreadyActive { .. } => ExErrorKind::CommandAlreadyActive,
            StackStateError::NoActiveCommand => ExErrorKind::NoActiveCommand,
            StackStateError::NothingToUndo => ExErrorKind::NothingToUndo,
            StackStateError::NothingToRedo => ExErrorKind::NothingToRedo,
        };
        ExError::new(kind)
            .with_op("undo_stack")
            .with_message(err.to_string())
    }
}

impl From<SchemError> for ExError {
    fn from(err: SchemError) -> Self {
        match err {
            SchemError::Validation(e) => e.into(),
            SchemError::StackState(e) => e.into(),
            SchemError::ConsistencyFault { op, title, source } => {
                ExError::new(ExErrorKind::ConsistencyFault)
                    .with_op(op)
                    .with_message(format!("History entry \"{}\" could not be re-applied", title))
                    .with_source(source.into())
            }
        }
    }
}
