//! Minimal XML tree layer over `quick-xml`
//!
//! The scene codec needs two things the streaming reader does not give
//! directly: random access to an element's ancestors (for namespace
//! resolution) and an in-memory element tree it can still append to while
//! serializing (the `mesh_node_objectid` entry is added to a metadata group
//! after the group was built). This module provides both:
//!
//! - [`Document`] / [`Node`]: a read-only tree built from `quick-xml` events.
//!   Every accessor is total: an absent attribute or text reads as `""`.
//! - [`XmlElement`]: an owned element builder that writes itself out through
//!   `quick_xml::Writer`.

mod document;
mod element;

pub use document::{Ancestors, Document, Node};
pub use element::XmlElement;
