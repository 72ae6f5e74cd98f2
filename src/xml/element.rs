//! Owned XML element builder used for serialization

use crate::error::{Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write as IoWrite;

/// An XML element under construction
///
/// Attributes keep insertion order; setting an existing attribute replaces
/// its value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an element with no attributes, text or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    /// Attribute value, if set
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replace the text content
    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    /// Text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append a new, empty child element and return it for filling in
    pub fn append_child(&mut self, name: impl Into<String>) -> &mut XmlElement {
        let index = self.children.len();
        self.children.push(XmlElement::new(name));
        &mut self.children[index]
    }

    /// First child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// First child with the given name, mutably
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// Child elements in order
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Write this element and its subtree
    pub fn write_to<W: IoWrite>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(|e| {
                Error::xml_write(format!("Failed to write {} element: {}", self.name, e))
            })?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(|e| {
            Error::xml_write(format!("Failed to write {} element: {}", self.name, e))
        })?;

        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(|e| {
                    Error::xml_write(format!("Failed to write {} text: {}", self.name, e))
                })?;
        }

        for child in &self.children {
            child.write_to(writer)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| {
                Error::xml_write(format!("Failed to close {} element: {}", self.name, e))
            })?;

        Ok(())
    }

    /// Write as a standalone document with an XML declaration, indented by
    /// two spaces
    pub fn write_document<W: IoWrite>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(writer, b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| Error::xml_write(format!("Failed to write XML declaration: {}", e)))?;

        self.write_to(&mut writer)
    }

    /// Serialize as a standalone document string
    pub fn to_document_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_document(&mut buffer)?;

        String::from_utf8(buffer)
            .map_err(|e| Error::xml_write(format!("Failed to convert XML to UTF-8: {}", e)))
    }
}
