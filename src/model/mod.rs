//! Data structures representing a 3MF scene graph

mod config;
mod core;
mod mesh;
mod scene;

pub use config::ParserConfig;
pub use self::core::{
    DEFAULT_METADATA_TYPE, MESH_NODE_OBJECTID, MetadataEntry, NodeId, ObjectType, SceneNode,
    Transform,
};
pub use mesh::{MeshData, Triangle, Vertex};
pub use scene::{DEFAULT_UNIT, Scene};
