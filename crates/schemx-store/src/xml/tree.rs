use std::str::FromStr;

use crate::errors::{
    append_failed, invalid_attribute_name, invalid_node_name, remove_failed, serialization_error,
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// XML element tree with a single root
///
/// A `NodeId` is only meaningful for the tree that created it. Structural
/// edits (`create_child_node`, `append_node`, `remove_node`) report an
/// unknown id as an error.
///
/// # Panics
///
/// The read accessors and `set_attribute`/`set_text` index the arena
/// directly and panic on an id that this tree never handed out.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_' | 'A'..='Z' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Check an element or attribute name against the XML 1.0 `Name` production
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl XmlTree {
    /// Create a tree consisting of a root element named `root_name`
    ///
    /// # Errors
    ///
    /// Returns `InvalidNodeName` for an invalid name.
    pub fn new(root_name: &str) -> Result<Self> {
        if !is_valid_name(root_name) {
            return Err(invalid_node_name(root_name));
        }
        Ok(Self {
            nodes: vec![NodeData {
                name: root_name.to_string(),
                attributes: Vec::new(),
                text: None,
                children: Vec::new(),
                parent: None,
            }],
            root: NodeId(0),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Create a detached element; attach it with `append_node`
    pub fn create_node(&mut self, name: &str) -> Result<NodeId> {
        if !is_valid_name(name) {
            return Err(invalid_node_name(name));
        }
        self.nodes.push(NodeData {
            name: name.to_string(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    /// Create an element and append it as last child of `parent`
    ///
    /// # Errors
    ///
    /// Returns `InvalidNodeName` for an invalid name, `AppendFailed` for an
    /// unknown parent.
    pub fn create_child_node(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(append_failed("unknown parent node"));
        }
        let child = self.create_node(name)?;
        self.append_node(parent, child)?;
        Ok(child)
    }

    /// Attach a detached node as last child of `parent`
    ///
    /// # Errors
    ///
    /// Returns `AppendFailed` if either node is unknown, the child is the
    /// root, already attached, or an ancestor of `parent`.
    pub fn append_node(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(append_failed("unknown node"));
        }
        if child == self.root {
            return Err(append_failed("the root node cannot be appended"));
        }
        if self.node(child).parent.is_some() {
            return Err(append_failed("node already has a parent"));
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(append_failed("node cannot be appended to its own subtree"));
            }
            cursor = self.node(id).parent;
        }
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`; the node stays valid and may be re-appended
    ///
    /// # Errors
    ///
    /// Returns `RemoveFailed` if `child` is not a child of `parent`.
    pub fn remove_node(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(remove_failed("unknown node"));
        }
        let children = &mut self.nodes[parent.0].children;
        let position = children
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| remove_failed("node is not a child of the given parent"))?;
        children.remove(position);
        self.node_mut(child).parent = None;
        Ok(())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child element named `name`
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children_named(id, name).next()
    }

    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |c| self.node(*c).name == name)
    }

    /// Set or replace an attribute, keeping the position of an existing one
    ///
    /// # Errors
    ///
    /// Returns `InvalidAttributeName` for an invalid key.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: impl Into<String>) -> Result<()> {
        if !is_valid_name(key) {
            return Err(invalid_attribute_name(key));
        }
        let value = value.into();
        let attributes = &mut self.node_mut(id).attributes;
        match attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => attributes.push((key.to_string(), value)),
        }
        Ok(())
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id)
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        &self.node(id).attributes
    }

    /// # Errors
    ///
    /// Returns `Serialization` if the attribute is missing.
    pub fn required_attribute(&self, id: NodeId, key: &str) -> Result<&str> {
        self.attribute(id, key).ok_or_else(|| {
            serialization_error(
                "xml_attribute",
                format!("<{}> lacks attribute \"{}\"", self.name(id), key),
            )
        })
    }

    /// Parse a required attribute with `FromStr`
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the attribute is missing or malformed.
    pub fn attribute_as<T>(&self, id: NodeId, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.required_attribute(id, key)?;
        raw.parse::<T>().map_err(|e| {
            serialization_error(
                "xml_attribute",
                format!("<{}> attribute \"{}\"=\"{}\": {}", self.name(id), key, raw, e),
            )
        })
    }

    /// Set the text content; whitespace-only text clears it
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.node_mut(id).text = normalize_text(text);
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    pub(crate) fn push_raw_text(&mut self, id: NodeId, text: &str) {
        self.node_mut(id)
            .text
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    pub(crate) fn finish_text(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.text = node.text.as_deref().and_then(normalize_text);
    }

    /// Attributes of a freshly parsed element, skipping name validation of
    /// the reader-checked keys
    pub(crate) fn push_parsed_attribute(&mut self, id: NodeId, key: String, value: String) {
        self.node_mut(id).attributes.push((key, value));
    }

    fn subtree_eq(&self, a: NodeId, other: &XmlTree, b: NodeId) -> bool {
        let (x, y) = (self.node(a), other.node(b));
        x.name == y.name
            && x.attributes == y.attributes
            && x.text == y.text
            && x.children.len() == y.children.len()
            && x
                .children
                .iter()
                .zip(&y.children)
                .all(|(ca, cb)| self.subtree_eq(*ca, other, *cb))
    }
}

/// Structural equality of the trees reachable from the roots
impl PartialEq for XmlTree {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root, other, other.root)
    }
}

impl Eq for XmlTree {}
