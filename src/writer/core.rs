//! Object element encoding
//!
//! Writes one `object` per node of the object table: identity attributes,
//! per-object settings as a `metadatagroup`, the mesh and the components.

use crate::model::{
    DEFAULT_METADATA_TYPE, MESH_NODE_OBJECTID, MetadataEntry, NodeId, Scene, SceneNode,
};
use crate::xml::XmlElement;
use std::collections::HashSet;

/// Append a `metadata` element
///
/// `type` is omitted for `xs:string` and `preserve` is only written when set.
pub(super) fn write_metadata(parent: &mut XmlElement, name: &str, entry: &MetadataEntry) {
    let metadata = parent.append_child("metadata");
    metadata.set_attribute("name", name);
    metadata.set_text(entry.value.as_str());
    if !entry.has_default_type() {
        metadata.set_attribute("type", entry.value_type.as_str());
    }
    if entry.preserve {
        metadata.set_attribute("preserve", "true");
    }
}

/// Id a node is written under; nodes outside the scene read as empty
fn written_id(scene: &Scene, handle: NodeId) -> &str {
    scene.node(handle).map(SceneNode::id).unwrap_or("")
}

/// Append an `object` element for `node` to `resources`
///
/// Expects the scene to be renumbered already, so child and back-reference
/// ids are the ones written for those nodes. `written` holds the nodes of the
/// object table; a back-reference to any other node is not written.
pub(super) fn write_object(
    resources: &mut XmlElement,
    scene: &Scene,
    node: &SceneNode,
    written: &HashSet<NodeId>,
) {
    let object = resources.append_child("object");
    object.set_attribute("id", node.id());
    if !node.name().is_empty() {
        object.set_attribute("name", node.name());
    }
    object.set_attribute("type", node.object_type().as_str());

    if !node.settings().is_empty() {
        let group = object.append_child("metadatagroup");
        for (key, entry) in node.settings() {
            write_metadata(group, key, entry);
        }
    }

    if node.has_geometry() {
        node.mesh_data().to_node(object.append_child("mesh"));
    }

    if !node.children().is_empty() {
        let components = object.append_child("components");
        for &child in node.children() {
            let transform = scene
                .node(child)
                .map(|child| child.transformation().to_string())
                .unwrap_or_default();
            components
                .append_child("component")
                .set_attribute("objectid", written_id(scene, child))
                .set_attribute("transform", transform);
        }
    }

    if let Some(mesh_node) = node.mesh_node().filter(|target| {
        let in_table = written.contains(target);
        if !in_table {
            log::warn!(
                "Object '{}' refers to a mesh node outside the object table, dropping the reference",
                node.id()
            );
        }
        in_table
    }) {
        if object.child("metadatagroup").is_none() {
            object.append_child("metadatagroup");
        }
        if let Some(group) = object.child_mut("metadatagroup") {
            let entry = MetadataEntry::with_type(
                written_id(scene, mesh_node),
                DEFAULT_METADATA_TYPE,
                true,
            );
            write_metadata(group, MESH_NODE_OBJECTID, &entry);
        }
    }
}
