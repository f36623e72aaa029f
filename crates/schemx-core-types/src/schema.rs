//! Canonical schema constants for structured logging and events
//!
//! Field keys name the fields the `log_op_*` macros emit. `tracing` takes
//! field names as identifiers, so the macros spell them out; the constants
//! are for readers of captured or exported events and must match.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Undo stack
pub const FIELD_COMMAND_TITLE: &str = "command_title";
pub const FIELD_HISTORY_LEN: &str = "history_len";
pub const FIELD_HISTORY_INDEX: &str = "history_index";

// Persistence
pub const FIELD_PATH: &str = "path";
pub const FIELD_FILE_COUNT: &str = "file_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_MESSAGE: &str = "err_message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
