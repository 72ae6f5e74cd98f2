//! Scene aggregate: node arena, build items, document metadata

use std::collections::{BTreeMap, HashSet};

use super::core::{MetadataEntry, NodeId, SceneNode};

/// Length unit used when a document does not declare one
pub const DEFAULT_UNIT: &str = "millimeter";

/// A complete 3MF scene
///
/// Nodes live in an arena owned by the scene and refer to one another by
/// [`NodeId`]. The build items (`scene_nodes`) are the roots placed on the
/// build plate; the object table ([`Scene::all_scene_nodes`]) is derived from
/// them on demand and never stored.
///
/// # Example
///
/// ```
/// use scene3mf::{MeshData, Scene, SceneNode, Transform};
///
/// let mut scene = Scene::new();
///
/// let mut leaf = SceneNode::new();
/// let mut mesh = MeshData::new();
/// mesh.add_vertex(0.0, 0.0, 0.0);
/// leaf.set_mesh_data(mesh);
/// leaf.set_transformation(Transform::from_translation(5.0, 0.0, 0.0));
/// let leaf = scene.add_node(leaf);
///
/// let group = scene.add_node(SceneNode::new());
/// assert!(scene.add_child(group, leaf));
/// assert!(scene.add_build_item(group));
///
/// assert_eq!(scene.all_scene_nodes(), vec![leaf, group]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub(crate) nodes: Vec<SceneNode>,
    pub(crate) scene_nodes: Vec<NodeId>,
    pub(crate) metadata: BTreeMap<String, MetadataEntry>,
    pub(crate) unit: String,
}

impl Scene {
    /// Create an empty scene in millimeters
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            scene_nodes: Vec::new(),
            metadata: BTreeMap::new(),
            unit: DEFAULT_UNIT.to_string(),
        }
    }

    /// Move a node into the scene's arena
    ///
    /// The node is not part of the build until it is added as a build item
    /// or as a child of a reachable node.
    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Every node in the arena, reachable or not
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Place a node on the build plate
    ///
    /// Returns `false` when `id` does not belong to this scene.
    pub fn add_build_item(&mut self, id: NodeId) -> bool {
        if id.0 >= self.nodes.len() {
            return false;
        }
        self.scene_nodes.push(id);
        true
    }

    /// Build items in order
    pub fn scene_nodes(&self) -> &[NodeId] {
        &self.scene_nodes
    }

    /// Attach `child` as a component of `parent`
    ///
    /// Returns `false` without changing anything when either handle is
    /// unknown, when both are the same node, or when `parent` carries
    /// geometry.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || child.0 >= self.nodes.len() {
            return false;
        }
        match self.nodes.get_mut(parent.0) {
            Some(node) => node.add_child(child),
            None => false,
        }
    }

    /// The object table: every node reachable from the build items
    ///
    /// Descendants are listed before the node itself (post-order) so that an
    /// object is always defined before anything referencing it. Each node
    /// appears once even when reachable along several paths.
    pub fn all_scene_nodes(&self) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        let mut table = Vec::new();
        for &root in &self.scene_nodes {
            self.collect_post_order(root, &mut visited, &mut table);
        }
        table
    }

    fn collect_post_order(&self, id: NodeId, visited: &mut HashSet<NodeId>, table: &mut Vec<NodeId>) {
        if !visited.insert(id) {
            return;
        }
        let Some(node) = self.node(id) else {
            return;
        };
        for &child in &node.children {
            self.collect_post_order(child, visited, table);
        }
        table.push(id);
    }

    /// Renumber every node of the object table to its 1-based position
    ///
    /// Returns the table that was used.
    pub fn renumber(&mut self) -> Vec<NodeId> {
        let table = self.all_scene_nodes();
        for (position, id) in table.iter().enumerate() {
            self.nodes[id.0].id = (position + 1).to_string();
        }
        table
    }

    /// Document-level metadata, ordered by name
    pub fn metadata(&self) -> &BTreeMap<String, MetadataEntry> {
        &self.metadata
    }

    /// Value of one metadata entry
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(|entry| entry.value.as_str())
    }

    /// Insert or overwrite a metadata entry
    pub fn set_metadata(&mut self, name: impl Into<String>, entry: impl Into<MetadataEntry>) {
        self.metadata.insert(name.into(), entry.into());
    }

    /// Length unit (`millimeter`, `inch`, ...)
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Set the length unit
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = unit.into();
    }

    /// Whether the scene has no build items and no metadata
    pub fn is_empty(&self) -> bool {
        self.scene_nodes.is_empty() && self.metadata.is_empty()
    }

    /// Append another scene's nodes, build items and metadata
    ///
    /// Handles from `other` are shifted into this scene's arena. Metadata of
    /// `other` overwrites entries with the same name. Its unit replaces this
    /// scene's unit unless it is the default [`DEFAULT_UNIT`], in which case
    /// this scene keeps its own.
    pub fn merge(&mut self, other: Scene) {
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);

        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.children.iter_mut().for_each(|child| *child = shift(*child));
            node.mesh_node = node.mesh_node.map(shift);
            node
        }));
        self.scene_nodes
            .extend(other.scene_nodes.into_iter().map(shift));
        self.metadata.extend(other.metadata);
        if other.unit != DEFAULT_UNIT {
            self.unit = other.unit;
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
