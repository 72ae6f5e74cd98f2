//! Scene node, metadata and transformation types

use std::collections::BTreeMap;
use std::fmt;

use super::mesh::MeshData;

/// Type written for metadata entries that do not declare one
pub const DEFAULT_METADATA_TYPE: &str = "xs:string";

/// Metadata name carrying a node's `mesh_node` reference through a file
pub const MESH_NODE_OBJECTID: &str = "mesh_node_objectid";

/// Number of values in a 3MF transformation matrix (3x4 affine, row-major)
const TRANSFORM_MATRIX_SIZE: usize = 12;

/// Handle to a [`SceneNode`] stored in a [`Scene`](super::Scene)
///
/// Handles are only meaningful for the scene that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its scene's arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// One metadata or per-object setting value
///
/// `preserve` marks entries that consumers must keep even when they do not
/// understand them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Value as written in the document
    pub value: String,
    /// XML schema type of the value (default `xs:string`)
    pub value_type: String,
    /// Preservation flag
    pub preserve: bool,
}

impl MetadataEntry {
    /// Create a string-typed, non-preserved entry
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            value_type: DEFAULT_METADATA_TYPE.to_string(),
            preserve: false,
        }
    }

    /// Create an entry with an explicit type and preservation flag
    pub fn with_type(value: impl Into<String>, value_type: impl Into<String>, preserve: bool) -> Self {
        Self {
            value: value.into(),
            value_type: value_type.into(),
            preserve,
        }
    }

    /// Whether the type is the implicit `xs:string`
    pub fn has_default_type(&self) -> bool {
        self.value_type == DEFAULT_METADATA_TYPE
    }
}

impl Default for MetadataEntry {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<&str> for MetadataEntry {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MetadataEntry {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Type of 3D object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectType {
    /// A standard model object
    #[default]
    Model,
    /// A support structure
    Support,
    /// A solid support structure
    SolidSupport,
    /// A surface object
    Surface,
    /// Other types
    Other,
}

impl ObjectType {
    /// Attribute value used in the `type` attribute of `object`
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Model => "model",
            ObjectType::Support => "support",
            ObjectType::SolidSupport => "solidsupport",
            ObjectType::Surface => "surface",
            ObjectType::Other => "other",
        }
    }

    /// Parse a `type` attribute value
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "model" => Some(ObjectType::Model),
            "support" => Some(ObjectType::Support),
            "solidsupport" => Some(ObjectType::SolidSupport),
            "surface" => Some(ObjectType::Surface),
            "other" => Some(ObjectType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 3x4 affine transformation matrix (12 floats in row-major order)
///
/// Format: `[m00 m01 m02 m10 m11 m12 m20 m21 m22 tx ty tz]`
///
/// The first 9 values form the rotation/scale part, the last 3 the
/// translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub [f64; TRANSFORM_MATRIX_SIZE]);

impl Transform {
    /// The identity transformation
    pub const IDENTITY: Transform = Transform([
        1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
    ]);

    /// Pure translation
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        let mut values = Self::IDENTITY.0;
        values[9] = x;
        values[10] = y;
        values[11] = z;
        Transform(values)
    }

    /// Parse a whitespace-separated `transform` attribute
    ///
    /// Returns `None` unless the text holds exactly 12 finite numbers.
    pub fn parse(text: &str) -> Option<Self> {
        let mut values = [0.0; TRANSFORM_MATRIX_SIZE];
        let mut count = 0;

        for token in text.split_whitespace() {
            if count == TRANSFORM_MATRIX_SIZE {
                return None;
            }
            let value = token.parse::<f64>().ok().filter(|v| v.is_finite())?;
            values[count] = value;
            count += 1;
        }

        (count == TRANSFORM_MATRIX_SIZE).then_some(Transform(values))
    }

    /// Translation component `(tx, ty, tz)`
    pub fn translation(&self) -> (f64, f64, f64) {
        (self.0[9], self.0[10], self.0[11])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// A node of the scene graph
///
/// A node is either a mesh leaf or a composite of child nodes (components),
/// never both: [`SceneNode::add_child`] refuses children on a node that
/// already carries vertices, and [`SceneNode::set_mesh_data`] refuses
/// geometry on a node that already has children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneNode {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) object_type: ObjectType,
    pub(crate) transformation: Transform,
    pub(crate) mesh_data: MeshData,
    pub(crate) settings: BTreeMap<String, MetadataEntry>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) mesh_node: Option<NodeId>,
}

impl SceneNode {
    /// Create an empty node with the identity transformation
    pub fn new() -> Self {
        Self::default()
    }

    /// Object identifier (renumbered on every write)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the object identifier
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Display name, empty when unnamed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Object classification
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Set the object classification
    pub fn set_object_type(&mut self, object_type: ObjectType) {
        self.object_type = object_type;
    }

    /// Transformation relative to the parent (or the build plate for roots)
    pub fn transformation(&self) -> Transform {
        self.transformation
    }

    /// Set the transformation
    pub fn set_transformation(&mut self, transformation: Transform) {
        self.transformation = transformation;
    }

    /// Mesh geometry
    pub fn mesh_data(&self) -> &MeshData {
        &self.mesh_data
    }

    /// Replace the mesh geometry
    ///
    /// Returns `false` and leaves the node untouched when non-empty geometry
    /// is assigned to a node that has children.
    pub fn set_mesh_data(&mut self, mesh_data: MeshData) -> bool {
        if !mesh_data.vertices().is_empty() && !self.children.is_empty() {
            return false;
        }
        self.mesh_data = mesh_data;
        true
    }

    /// Whether the node carries any vertices
    pub fn has_geometry(&self) -> bool {
        !self.mesh_data.vertices().is_empty()
    }

    /// Per-object settings, ordered by key
    pub fn settings(&self) -> &BTreeMap<String, MetadataEntry> {
        &self.settings
    }

    /// Look up one setting
    pub fn setting(&self, key: &str) -> Option<&MetadataEntry> {
        self.settings.get(key)
    }

    /// Insert or overwrite a setting
    pub fn set_setting(&mut self, key: impl Into<String>, entry: impl Into<MetadataEntry>) {
        self.settings.insert(key.into(), entry.into());
    }

    /// Remove a setting, returning its previous value
    pub fn remove_setting(&mut self, key: &str) -> Option<MetadataEntry> {
        self.settings.remove(key)
    }

    /// Remove every setting
    pub fn clear_settings(&mut self) {
        self.settings.clear();
    }

    /// Child nodes (components) in order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Append a child node
    ///
    /// Returns `false` without modifying the node when it already carries
    /// geometry: a node cannot be both a mesh leaf and a composite.
    pub fn add_child(&mut self, child: NodeId) -> bool {
        if self.has_geometry() {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Node whose mesh this node's mesh was taken from, if recorded
    pub fn mesh_node(&self) -> Option<NodeId> {
        self.mesh_node
    }

    /// Record (or clear) the node this node's mesh was taken from
    pub fn set_mesh_node(&mut self, mesh_node: Option<NodeId>) {
        self.mesh_node = mesh_node;
    }
}
