//! Structured logging for the document core
//!
//! Every mutating entry point (undo stack transitions, project load/save)
//! emits a `start` event and exactly one of `end` / `end_error`, tagged with
//! the canonical fields from `schemx_core_types::schema`.
//!
//! ```rust
//! use schemx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
