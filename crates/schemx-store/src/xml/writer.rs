use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::tree::{NodeId, XmlTree};
use crate::errors::{serialization_error, Result};

type XmlWriter = Writer<Vec<u8>>;

impl XmlTree {
    /// Serialize to UTF-8 with an XML declaration and two-space indentation
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the writer rejects an event.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| serialization_error("xml_serialize", e))?;
        self.write_node(&mut writer, self.root())?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn write_node(&self, writer: &mut XmlWriter, id: NodeId) -> Result<()> {
        let name = self.name(id);
        let mut start = BytesStart::new(name);
        for (key, value) in self.attributes(id) {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let children = self.children(id);
        let text = self.text(id);
        if children.is_empty() && text.is_none() {
            return write(writer, Event::Empty(start));
        }

        write(writer, Event::Start(start))?;
        if let Some(text) = text {
            write(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in children {
            self.write_node(writer, *child)?;
        }
        write(writer, Event::End(BytesEnd::new(name)))
    }
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| serialization_error("xml_serialize", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_layout() {
        let mut tree = XmlTree::new("circuit").unwrap();
        let root = tree.root();
        let classes = tree.create_child_node(root, "netclasses").unwrap();
        let class = tree.create_child_node(classes, "netclass").unwrap();
        tree.set_attribute(class, "name", "a\"b<c").unwrap();
        let note = tree.create_child_node(root, "note").unwrap();
        tree.set_text(note, "x & y");

        let text = String::from_utf8(tree.serialize().unwrap()).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<netclass name=\"a&quot;b&lt;c\"/>"));
        assert!(text.contains("<note>x &amp; y</note>"));
        assert!(text.ends_with("</circuit>\n"));
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let mut tree = XmlTree::new("schematic").unwrap();
        let root = tree.root();
        tree.set_attribute(root, "name", "Main").unwrap();
        tree.create_child_node(root, "symbols").unwrap();

        assert_eq!(tree.serialize().unwrap(), tree.clone().serialize().unwrap());
    }

    #[test]
    fn test_round_trip() {
        let mut tree = XmlTree::new("project").unwrap();
        let root = tree.root();
        let meta = tree.create_child_node(root, "meta").unwrap();
        tree.set_attribute(meta, "name", "Ünïcode & more").unwrap();
        tree.set_text(meta, "line one\nline two");

        let parsed = XmlTree::parse(&tree.serialize().unwrap()).unwrap();
        assert_eq!(parsed, tree);
    }
}
