use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::tree::{is_valid_name, NodeId, XmlTree};
use crate::errors::{invalid_root_node, no_root_node, xml_syntax, Result};

fn decode(position: u64, bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| xml_syntax(position, e))
}

impl XmlTree {
    /// Parse a UTF-8 XML document
    ///
    /// Declarations, comments, processing instructions and doctypes are
    /// skipped. CDATA sections count as text.
    ///
    /// # Errors
    ///
    /// Returns `XmlSyntax` for malformed input (including unclosed elements
    /// and content after the root), `NoRootNode` for a document without an
    /// element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let source = std::str::from_utf8(bytes).map_err(|e| xml_syntax(0, e))?;
        let mut reader = Reader::from_str(source);
        let mut tree: Option<XmlTree> = None;
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader.read_event().map_err(|e| xml_syntax(position, e))?;
            match event {
                Event::Start(e) => {
                    let id = open_element(&mut tree, &open, &e, position)?;
                    open.push(id);
                }
                Event::Empty(e) => {
                    open_element(&mut tree, &open, &e, position)?;
                }
                Event::End(_) => {
                    if let (Some(id), Some(tree)) = (open.pop(), tree.as_mut()) {
                        tree.finish_text(id);
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| xml_syntax(position, e))?;
                    match (open.last(), tree.as_mut()) {
                        (Some(id), Some(tree)) => tree.push_raw_text(*id, &text),
                        _ if text.trim().is_empty() => {}
                        _ => return Err(xml_syntax(position, "text outside the root element")),
                    }
                }
                Event::CData(c) => {
                    let text = decode(position, &c.into_inner())?;
                    match (open.last(), tree.as_mut()) {
                        (Some(id), Some(tree)) => tree.push_raw_text(*id, &text),
                        _ => return Err(xml_syntax(position, "CDATA outside the root element")),
                    }
                }
                Event::Eof => break,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        if !open.is_empty() {
            return Err(xml_syntax(
                reader.buffer_position() as u64,
                "unexpected end of document inside an element",
            ));
        }
        tree.ok_or_else(no_root_node)
    }

    /// Parse and require the root element to be named `expected_root`
    ///
    /// # Errors
    ///
    /// As `parse`, plus `InvalidRootNode` for a differently named root.
    pub fn parse_with_root(bytes: &[u8], expected_root: &str) -> Result<Self> {
        let tree = Self::parse(bytes)?;
        let found = tree.name(tree.root());
        if found != expected_root {
            return Err(invalid_root_node(expected_root, found));
        }
        Ok(tree)
    }
}

fn open_element(
    tree: &mut Option<XmlTree>,
    open: &[NodeId],
    element: &BytesStart<'_>,
    position: u64,
) -> Result<NodeId> {
    let name = decode(position, element.name().as_ref())?;
    if !is_valid_name(&name) {
        return Err(xml_syntax(position, format!("invalid element name \"{}\"", name)));
    }
    let id = match (tree.as_mut(), open.last()) {
        (None, _) => {
            let created = XmlTree::new(&name)?;
            let root = created.root();
            *tree = Some(created);
            root
        }
        (Some(tree), Some(parent)) => tree.create_child_node(*parent, &name)?,
        (Some(_), None) => {
            return Err(xml_syntax(position, "more than one root element"));
        }
    };

    if let Some(tree) = tree.as_mut() {
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| xml_syntax(position, e))?;
            let key = decode(position, attribute.key.as_ref())?;
            let value = attribute
                .unescape_value()
                .map_err(|e| xml_syntax(position, e))?
                .into_owned();
            tree.push_parsed_attribute(id, key, value);
        }
    }
    Ok(id)
}
