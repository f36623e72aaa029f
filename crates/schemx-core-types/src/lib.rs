//! Core types shared across SchemX crates
//!
//! This crate provides the foundational value types used by the document
//! model, the persistence layer and the logging facility:
//!
//! - **Identity**: `EntityId`, the opaque identifier of every model entity
//! - **Units**: `Length`, `Point`, `Angle` with exact text conversion
//! - **Schema constants**: Canonical field keys and event names

pub mod id;
pub mod schema;
pub mod units;

pub use id::EntityId;
pub use units::{Angle, Length, ParseUnitError, Point};
