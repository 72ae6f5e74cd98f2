//! Read-only XML document tree

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

/// Index of the synthetic document node that owns the root element
const DOCUMENT_NODE: usize = 0;

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl NodeData {
    fn new(name: String, attributes: Vec<(String, String)>, parent: Option<usize>) -> Self {
        Self {
            name,
            attributes,
            text: String::new(),
            parent,
            children: Vec::new(),
        }
    }
}

/// A parsed XML document
///
/// Elements are stored in a flat arena in document order; [`Node`] handles
/// borrow the document and navigate it by index.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Parse a complete XML document from text
    ///
    /// Whitespace inside text content is kept as written, so metadata values
    /// survive verbatim. Mismatched end tags and malformed markup are
    /// reported as errors.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut nodes = vec![NodeData::new(String::new(), Vec::new(), None)];
        let mut stack = vec![DOCUMENT_NODE];

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let index = push_element(&mut nodes, &stack, &e)?;
                    stack.push(index);
                }
                Event::Empty(e) => {
                    push_element(&mut nodes, &stack, &e)?;
                }
                Event::End(_) => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Event::Text(t) => {
                    let raw =
                        std::str::from_utf8(&t).map_err(|e| Error::InvalidXml(e.to_string()))?;
                    let text = unescape(raw).map_err(|e| Error::InvalidXml(e.to_string()))?;
                    append_text(&mut nodes, &stack, &text);
                }
                Event::CData(c) => {
                    let text =
                        std::str::from_utf8(&c).map_err(|e| Error::InvalidXml(e.to_string()))?;
                    append_text(&mut nodes, &stack, text);
                }
                Event::GeneralRef(r) => {
                    let name =
                        std::str::from_utf8(&r).map_err(|e| Error::InvalidXml(e.to_string()))?;
                    let reference = format!("&{};", name);
                    let text = unescape(&reference).map_err(|e| {
                        Error::InvalidXml(format!("Unresolvable reference '{}': {}", reference, e))
                    })?;
                    append_text(&mut nodes, &stack, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { nodes })
    }

    /// The synthetic node above the root element
    pub fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            index: DOCUMENT_NODE,
        }
    }

    /// The first top-level element, if the document has one
    pub fn root_element(&self) -> Option<Node<'_>> {
        self.root().children().next()
    }

    /// The first top-level element with the given name
    pub fn child(&self, name: &str) -> Option<Node<'_>> {
        self.root().child(name)
    }
}

fn push_element(nodes: &mut Vec<NodeData>, stack: &[usize], e: &BytesStart) -> Result<usize> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| Error::InvalidXml(e.to_string()))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key =
            std::str::from_utf8(attr.key.as_ref()).map_err(|e| Error::InvalidXml(e.to_string()))?;
        let value =
            std::str::from_utf8(&attr.value).map_err(|e| Error::InvalidXml(e.to_string()))?;
        let value = unescape(value).map_err(|e| Error::InvalidXml(e.to_string()))?;
        attributes.push((key.to_string(), value.into_owned()));
    }

    let parent = stack.last().copied().unwrap_or(DOCUMENT_NODE);
    let index = nodes.len();
    nodes.push(NodeData::new(name, attributes, Some(parent)));
    nodes[parent].children.push(index);
    Ok(index)
}

fn append_text(nodes: &mut [NodeData], stack: &[usize], text: &str) {
    let current = stack.last().copied().unwrap_or(DOCUMENT_NODE);
    nodes[current].text.push_str(text);
}

/// A handle to one element (or the document node) of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    index: usize,
}

impl<'a> Node<'a> {
    fn data(self) -> &'a NodeData {
        &self.doc.nodes[self.index]
    }

    fn at(self, index: usize) -> Node<'a> {
        Node {
            doc: self.doc,
            index,
        }
    }

    /// Qualified element name as written (e.g. `metadata`, `p:item`)
    pub fn name(self) -> &'a str {
        &self.data().name
    }

    /// Attribute value, or `""` when the attribute is absent
    pub fn attribute(self, name: &str) -> &'a str {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Whether the attribute is present (possibly with an empty value)
    pub fn has_attribute(self, name: &str) -> bool {
        self.data().attributes.iter().any(|(key, _)| key == name)
    }

    /// All attributes in document order, namespace declarations included
    pub fn attributes(self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.data()
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Text content directly inside this element, or `""`
    pub fn text(self) -> &'a str {
        &self.data().text
    }

    /// Parent element; `None` for the root element and the document node
    pub fn parent(self) -> Option<Node<'a>> {
        match self.data().parent {
            Some(DOCUMENT_NODE) | None => None,
            Some(index) => Some(self.at(index)),
        }
    }

    /// This element followed by each of its ancestors, closest first
    pub fn ancestors(self) -> Ancestors<'a> {
        Ancestors {
            next: (self.index != DOCUMENT_NODE).then_some(self),
        }
    }

    /// Child elements in document order
    pub fn children(self) -> impl Iterator<Item = Node<'a>> {
        self.data().children.iter().map(move |&index| self.at(index))
    }

    /// Child elements with the given name, in document order
    pub fn children_named(self, name: &str) -> impl Iterator<Item = Node<'a>> {
        self.children().filter(move |child| child.name() == name)
    }

    /// First child element with the given name
    pub fn child(self, name: &str) -> Option<Node<'a>> {
        self.children().find(|child| child.name() == name)
    }
}

/// Iterator over an element and its ancestors
pub struct Ancestors<'a> {
    next: Option<Node<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
