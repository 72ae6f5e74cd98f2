//! # scene3mf
//!
//! A codec between 3MF model documents and an in-memory scene graph.
//!
//! A [`Scene`] holds an arena of [`SceneNode`]s: transformations, mesh
//! geometry, per-object slicer settings and component trees. Decoding goes
//! through a caller-owned [`ParseSession`] so that a multi-part package can be
//! fed one part at a time; encoding renumbers object ids and writes every
//! object before the objects that reference it.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Vendor metadata resolved against the namespaces in scope, whatever
//!   prefix an author bound them to
//! - Legacy `settings/setting` and conformant `metadatagroup/metadata`
//!   per-object settings
//! - Cross-part object references through the production `p:path` attribute
//! - Optional ZIP/OPC package reading and writing
//!
//! ## Example
//!
//! ```
//! use scene3mf::{ParseSession, scene_to_string};
//!
//! # fn main() -> scene3mf::Result<()> {
//! let xml = r#"<model unit="millimeter"
//!     xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02"
//!     xmlns:cura="http://software.ultimaker.com/xml/cura/3mf/2015/10">
//!   <resources>
//!     <object id="8" name="cube">
//!       <metadatagroup>
//!         <metadata name="cura:infill_sparse_density">20</metadata>
//!       </metadatagroup>
//!     </object>
//!   </resources>
//!   <build><item objectid="8"/></build>
//! </model>"#;
//!
//! let mut session = ParseSession::new();
//! let mut scene = session.parse(xml)?;
//!
//! let cube = scene.node(scene.scene_nodes()[0]).unwrap();
//! assert_eq!(cube.setting("infill_sparse_density").unwrap().value, "20");
//!
//! let output = scene_to_string(&mut scene)?;
//! assert!(output.contains(r#"<object id="1" name="cube" type="model">"#));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod namespace;
pub mod opc;
pub mod parser;
pub mod writer;
pub mod xml;

pub use error::{Error, Result};
pub use model::{
    DEFAULT_METADATA_TYPE, DEFAULT_UNIT, MESH_NODE_OBJECTID, MeshData, MetadataEntry, NodeId,
    ObjectType, ParserConfig, Scene, SceneNode, Transform, Triangle, Vertex,
};
pub use parser::{ParseSession, parse_model_xml};
pub use writer::scene_to_string;

use std::io::{Read, Seek, Write};

impl Scene {
    /// Read a 3MF package from a reader
    ///
    /// Every model part of the package is decoded through one
    /// [`ParseSession`], the root model last.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scene3mf::Scene;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("model.3mf")?;
    /// let scene = Scene::from_reader(file)?;
    ///
    /// println!("Scene contains {} build items", scene.scene_nodes().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_reader_with_config(reader, ParserConfig::default())
    }

    /// Read a 3MF package from a reader with custom configuration
    pub fn from_reader_with_config<R: Read + Seek>(reader: R, config: ParserConfig) -> Result<Self> {
        let mut package = opc::Package::open(reader)?;
        package.read_scene(config)
    }

    /// Write the scene as a 3MF package
    ///
    /// The scene is renumbered as part of serialization.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scene3mf::Scene;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut scene = Scene::new();
    /// // ... populate scene ...
    ///
    /// let file = File::create("output.3mf")?;
    /// scene.to_writer(file)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_writer<W: Write + Seek>(&mut self, writer: W) -> Result<W> {
        let model_xml = scene_to_string(self)?;
        opc::create_package(writer, &model_xml)
    }

    /// Write the scene as a 3MF package to a file path
    pub fn write_to_file<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.to_writer(file)?;
        Ok(())
    }
}
