//! Model element decoding
//!
//! Turns one `model` element into build items, their component trees and
//! document metadata. Objects are looked up by `id` in the document being
//! decoded, or in a previously decoded part when an `item` or `component`
//! carries a production `path` attribute.

use std::collections::HashMap;

use super::core::read_metadata_entry;
use crate::model::{MESH_NODE_OBJECTID, NodeId, ParserConfig, Scene, SceneNode, Transform};
use crate::namespace::split_qualified_name;
use crate::xml::{Document, Node};

/// Objects of one document, keyed by `id` (first definition wins)
type ObjectIndex<'a> = HashMap<&'a str, Node<'a>>;

fn index_objects(model: Node<'_>) -> ObjectIndex<'_> {
    let mut index = ObjectIndex::new();
    if let Some(resources) = model.child("resources") {
        for object in resources.children_named("object") {
            index.entry(object.attribute("id")).or_insert(object);
        }
    }
    index
}

/// Object lookup across the current document and earlier parts
///
/// Part indices are built on first use.
struct ObjectLookup<'a> {
    current: ObjectIndex<'a>,
    parts: &'a HashMap<String, Document>,
    part_indices: HashMap<&'a str, ObjectIndex<'a>>,
}

impl<'a> ObjectLookup<'a> {
    fn new(model: Node<'a>, parts: &'a HashMap<String, Document>) -> Self {
        Self {
            current: index_objects(model),
            parts,
            part_indices: HashMap::new(),
        }
    }

    /// Find object `id` in `part`; `None` is the document being decoded
    fn find(&mut self, part: Option<&'a str>, id: &str) -> Option<Node<'a>> {
        let Some(part) = part else {
            return self.current.get(id).copied();
        };
        if !self.part_indices.contains_key(part) {
            let parts = self.parts;
            let model = parts.get(part)?.child("model")?;
            self.part_indices.insert(part, index_objects(model));
        }
        self.part_indices.get(part)?.get(id).copied()
    }
}

/// Production `path` attribute of an `item` or `component`, any prefix
fn path_attribute(element: Node<'_>) -> Option<&str> {
    element
        .attributes()
        .find(|(key, value)| split_qualified_name(key).1 == "path" && !value.is_empty())
        .map(|(_, value)| value)
}

/// Transformation attribute of an `item` or `component`
///
/// Absent means identity. Malformed text is reported and read as identity.
fn read_transform(element: Node<'_>) -> Transform {
    let text = element.attribute("transform");
    if text.trim().is_empty() {
        return Transform::IDENTITY;
    }
    Transform::parse(text).unwrap_or_else(|| {
        log::warn!(
            "Ignoring malformed transform '{}' on {} referencing object '{}'",
            text,
            element.name(),
            element.attribute("objectid")
        );
        Transform::IDENTITY
    })
}

struct SceneDecoder<'a, 's> {
    scene: &'s mut Scene,
    config: &'s ParserConfig,
    current_path: &'s str,
    lookup: ObjectLookup<'a>,
    /// First node built from each object id of the current document
    instantiated: HashMap<&'a str, NodeId>,
    /// Every node built from the current document
    local_nodes: Vec<NodeId>,
    /// Objects whose components are being built, outermost first
    building: Vec<(Option<&'a str>, &'a str)>,
    /// Nodes this document may still add
    budget: usize,
    over_budget: bool,
}

impl<'a> SceneDecoder<'a, '_> {
    fn part_of(&self, element: Node<'a>, inherited: Option<&'a str>) -> Option<&'a str> {
        match path_attribute(element) {
            Some(path) if path == self.current_path => None,
            Some(path) => Some(path),
            None => inherited,
        }
    }

    /// Build a node for object `id` and, recursively, its components
    fn instantiate(&mut self, part: Option<&'a str>, id: &'a str, depth: usize) -> Option<NodeId> {
        let Some(object) = self.lookup.find(part, id) else {
            match part {
                Some(part) => log::warn!("Reference to unknown object '{}' in part '{}'", id, part),
                None => log::warn!("Reference to unknown object '{}'", id),
            }
            return None;
        };

        if self.budget == 0 {
            if !self.over_budget {
                log::warn!(
                    "Document expands to more than {} nodes, dropping further objects",
                    self.config.max_instantiated_nodes()
                );
                self.over_budget = true;
            }
            return None;
        }
        self.budget -= 1;

        let mut node = SceneNode::new();
        node.fill_by_xml_node(object, self.config);
        let handle = self.scene.add_node(node);
        if part.is_none() {
            self.instantiated
                .entry(object.attribute("id"))
                .or_insert(handle);
            self.local_nodes.push(handle);
        }

        let Some(components) = object.child("components") else {
            return Some(handle);
        };
        if depth >= self.config.max_component_depth() {
            log::warn!(
                "Component nesting deeper than {} at object '{}', dropping its components",
                self.config.max_component_depth(),
                id
            );
            return Some(handle);
        }

        self.building.push((part, id));
        for component in components.children_named("component") {
            let child_part = self.part_of(component, part);
            let child_id = component.attribute("objectid");
            if self.building.contains(&(child_part, child_id)) {
                log::warn!(
                    "Object '{}' contains itself through component '{}', dropping it",
                    id,
                    child_id
                );
                continue;
            }
            let Some(child) = self.instantiate(child_part, child_id, depth + 1) else {
                continue;
            };
            self.scene.nodes[child.0].transformation = read_transform(component);
            if !self.scene.add_child(handle, child) {
                log::warn!(
                    "Object '{}' carries a mesh, dropping its component '{}'",
                    id,
                    child_id
                );
            }
        }
        self.building.pop();

        Some(handle)
    }
}

impl Scene {
    /// Decode a `model` element into this scene
    ///
    /// Build items, nodes and metadata are appended to what the scene already
    /// holds. `path` names the part the element came from (empty for the root
    /// model); `parts` are the documents of earlier parts, keyed by path, that
    /// `p:path` references may point into.
    ///
    /// A `mesh_node_objectid` setting naming an object built in this call is
    /// turned back into the node's `mesh_node` reference and removed from the
    /// settings.
    pub fn fill_by_xml_node<'a>(
        &mut self,
        path: &str,
        model: Node<'a>,
        parts: &'a HashMap<String, Document>,
        config: &ParserConfig,
    ) {
        let unit = model.attribute("unit");
        if !unit.is_empty() {
            self.unit = unit.to_string();
        }

        let mut decoder = SceneDecoder {
            scene: self,
            config,
            current_path: path,
            lookup: ObjectLookup::new(model, parts),
            instantiated: HashMap::new(),
            local_nodes: Vec::new(),
            building: Vec::new(),
            budget: config.max_instantiated_nodes(),
            over_budget: false,
        };

        if let Some(build) = model.child("build") {
            for item in build.children_named("item") {
                let part = decoder.part_of(item, None);
                let Some(root) = decoder.instantiate(part, item.attribute("objectid"), 0) else {
                    continue;
                };
                decoder.scene.nodes[root.0].transformation = read_transform(item);
                decoder.scene.scene_nodes.push(root);
            }
        }

        let SceneDecoder {
            instantiated,
            local_nodes,
            ..
        } = decoder;
        for handle in local_nodes {
            self.resolve_mesh_node(handle, &instantiated);
        }

        for metadata in model.children_named("metadata") {
            self.metadata.insert(
                metadata.attribute("name").to_string(),
                read_metadata_entry(metadata),
            );
        }
    }

    fn resolve_mesh_node(&mut self, handle: NodeId, instantiated: &HashMap<&str, NodeId>) {
        let node = &mut self.nodes[handle.0];
        let Some(entry) = node.settings.get(MESH_NODE_OBJECTID) else {
            return;
        };
        if let Some(&target) = instantiated.get(entry.value.trim()) {
            node.mesh_node = Some(target);
            node.settings.remove(MESH_NODE_OBJECTID);
        }
    }
}
