//! Document tree I/O
//!
//! An arena-backed XML element tree. Nodes are addressed by `NodeId`; child
//! lists hold ids, so detaching and re-attaching a node never copies it.
//! Text content is normalized: surrounding whitespace is not significant and
//! whitespace-only text is absent. Under that rule `parse(serialize(t)) == t`.

mod reader;
mod tree;
mod writer;

pub use tree::{is_valid_name, NodeId, XmlTree};
