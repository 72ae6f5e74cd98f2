//! XML writing for 3MF model documents
//!
//! This module serializes a [`Scene`] into a single `model` document. Object
//! ids are reassigned on every write: each node of the object table gets its
//! 1-based position, and objects are written descendants first so that every
//! component references an object defined above it.

mod core;
mod mesh;

use crate::error::Result;
use crate::model::{NodeId, Scene};
use crate::namespace::{CORE_NAMESPACE, CURA_NAMESPACE, CURA_PREFIX};
use crate::xml::XmlElement;
use std::collections::HashSet;
use std::io::Write as IoWrite;

use self::core::{write_metadata, write_object};

/// Language tag written on the root element
const DOCUMENT_LANGUAGE: &str = "en-US";

/// Build the `model` element tree of a scene
///
/// Renumbers the scene's object table in place before writing, so node ids
/// afterwards match the written document.
pub fn scene_to_element(scene: &mut Scene) -> XmlElement {
    let table = scene.renumber();
    let written: HashSet<NodeId> = table.iter().copied().collect();

    let mut model = XmlElement::new("model");
    model
        .set_attribute("unit", scene.unit())
        .set_attribute("xmlns", CORE_NAMESPACE)
        .set_attribute(&format!("xmlns:{}", CURA_PREFIX), CURA_NAMESPACE)
        .set_attribute("xml:lang", DOCUMENT_LANGUAGE);

    let resources = model.append_child("resources");
    for &handle in &table {
        if let Some(node) = scene.node(handle) {
            write_object(resources, scene, node, &written);
        }
    }

    let build = model.append_child("build");
    for &handle in scene.scene_nodes() {
        if let Some(node) = scene.node(handle) {
            build
                .append_child("item")
                .set_attribute("objectid", node.id())
                .set_attribute("transform", node.transformation().to_string());
        }
    }

    for (name, entry) in scene.metadata() {
        write_metadata(&mut model, name, entry);
    }

    log::debug!(
        "Serialized scene: {} objects, {} build items, {} metadata entries",
        table.len(),
        scene.scene_nodes().len(),
        scene.metadata().len()
    );

    model
}

/// Serialize a scene to a model document string
///
/// # Example
///
/// ```
/// use scene3mf::{Scene, SceneNode, scene_to_string};
///
/// # fn main() -> scene3mf::Result<()> {
/// let mut scene = Scene::new();
/// let mut node = SceneNode::new();
/// node.set_id("obj-a");
/// let handle = scene.add_node(node);
/// scene.add_build_item(handle);
///
/// let xml = scene_to_string(&mut scene)?;
/// assert!(xml.contains(r#"<object id="1" type="model"/>"#));
/// assert_eq!(scene.node(handle).unwrap().id(), "1");
/// # Ok(())
/// # }
/// ```
pub fn scene_to_string(scene: &mut Scene) -> Result<String> {
    scene_to_element(scene).to_document_string()
}

/// Serialize a scene to a writer
pub fn write_scene_xml<W: IoWrite>(scene: &mut Scene, writer: W) -> Result<()> {
    scene_to_element(scene).write_document(writer)
}
