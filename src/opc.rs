//! OPC (Open Packaging Conventions) handling for 3MF files
//!
//! 3MF files are ZIP archives following the OPC standard. The root model
//! part is found through `_rels/.rels`; further `.model` parts hold objects
//! that the root model references with `p:path`.

use crate::error::{Error, Result};
use crate::model::{ParserConfig, Scene};
use crate::parser::ParseSession;
use crate::xml::Document;
use std::io::{Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Main 3D model file path within the 3MF archive
pub const MODEL_PATH: &str = "3D/3dmodel.model";

/// Content types file path
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Relationships file path
pub const RELS_PATH: &str = "_rels/.rels";

/// 3D model relationship type
pub const MODEL_REL_TYPE: &str = "http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel";

/// Extension of model parts
const MODEL_EXTENSION: &str = ".model";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="model" ContentType="application/vnd.ms-package.3dmanufacturing-3dmodel+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/3D/3dmodel.model" Id="rel0" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>"#;

/// Represents an OPC package (3MF file)
pub struct Package<R: Read> {
    archive: ZipArchive<R>,
    model_path: String,
}

impl<R: Read + Seek> Package<R> {
    /// Open a 3MF package from a reader
    ///
    /// # Errors
    ///
    /// Fails when the archive cannot be read, when `[Content_Types].xml` or
    /// `_rels/.rels` is missing, or when no 3D model relationship points to an
    /// existing part.
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        let mut package = Self {
            archive,
            model_path: String::new(),
        };

        for required in [CONTENT_TYPES_PATH, RELS_PATH] {
            if !package.has_file(required) {
                return Err(Error::invalid_format_context(
                    "OPC package structure",
                    &format!("Missing required file '{}'", required),
                ));
            }
        }

        let model_path = package.discover_model_path()?;
        if !package.has_file(&model_path) {
            return Err(Error::MissingFile(model_path));
        }
        package.model_path = model_path;

        Ok(package)
    }

    /// Archive path of the root model part (no leading slash)
    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    /// Content of the root model part
    pub fn get_model(&mut self) -> Result<String> {
        let path = self.model_path.clone();
        self.get_file(&path)
    }

    /// Archive paths of every model part other than the root, sorted
    pub fn model_part_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .file_names()
            .into_iter()
            .filter(|name| {
                name.to_ascii_lowercase().ends_with(MODEL_EXTENSION) && *name != self.model_path
            })
            .collect();
        names.sort();
        names
    }

    /// Decode the whole package into a scene
    ///
    /// Non-root model parts are fed to one session first, each prefixed
    /// with its `/path`, and the root model last, which finalizes the
    /// session.
    pub fn read_scene(&mut self, config: ParserConfig) -> Result<Scene> {
        let mut session = ParseSession::with_config(config);

        for name in self.model_part_names() {
            let content = self.get_file(&name)?;
            session.parse(&format!("/{}:{}", name, content))?;
        }

        let root = self.get_model()?;
        session.parse(&root)
    }

    /// Discover the model file path from the relationships file
    fn discover_model_path(&mut self) -> Result<String> {
        let rels_content = self.get_file(RELS_PATH)?;
        let rels = Document::parse(&rels_content)?;

        let target = rels
            .root_element()
            .into_iter()
            .flat_map(|root| root.children())
            .filter(|node| node.name().ends_with("Relationship"))
            .find(|node| node.attribute("Type") == MODEL_REL_TYPE)
            .map(|node| node.attribute("Target").to_string())
            .ok_or_else(|| {
                Error::invalid_format_context(
                    "OPC relationships",
                    "3D model relationship not found in _rels/.rels",
                )
            })?;

        validate_opc_part_name(&target)?;
        Ok(self.resolve_part_name(&target))
    }

    /// Map a relationship target to an archive entry name
    ///
    /// Targets are percent-encoded per OPC, but UTF-8 targets are accepted as
    /// written when such an entry exists.
    fn resolve_part_name(&mut self, target: &str) -> String {
        let stripped = target.strip_prefix('/').unwrap_or(target);
        if self.has_file(stripped) {
            return stripped.to_string();
        }
        match urlencoding::decode(stripped) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => stripped.to_string(),
        }
    }

    /// Get a file by name from the archive
    pub fn get_file(&mut self, name: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| Error::MissingFile(name.to_string()))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Check if a file exists in the archive
    pub fn has_file(&mut self, name: &str) -> bool {
        self.archive.by_name(name).is_ok()
    }

    /// Get the number of files in the archive
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive is empty
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// List all file names in the archive
    pub fn file_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }
}

/// Validate an OPC part name
///
/// Part names must not contain fragment identifiers (`#`), query strings
/// (`?`), `.` or `..` segments, or empty segments.
fn validate_opc_part_name(part_name: &str) -> Result<()> {
    if part_name.contains('#') || part_name.contains('?') {
        return Err(Error::InvalidFormat(format!(
            "Part name cannot contain a fragment or query string: {}",
            part_name
        )));
    }

    let relative = part_name.strip_prefix('/').unwrap_or(part_name);
    for segment in relative.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(Error::InvalidFormat(format!(
                "Part name contains an empty, '.' or '..' segment: {}",
                part_name
            )));
        }
    }

    Ok(())
}

/// Create a 3MF package (ZIP archive) from model data
///
/// This function creates a complete 3MF file including:
/// - `[Content_Types].xml`
/// - `_rels/.rels`
/// - `3D/3dmodel.model`
///
/// # Returns
///
/// Returns the writer after finishing the ZIP archive
pub fn create_package<W: Write + Seek>(writer: W, model_xml: &str) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    zip.start_file(CONTENT_TYPES_PATH, options)
        .map_err(|e| Error::xml_write(format!("Failed to create Content_Types file: {}", e)))?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())
        .map_err(|e| Error::xml_write(format!("Failed to write Content_Types: {}", e)))?;

    zip.start_file(RELS_PATH, options)
        .map_err(|e| Error::xml_write(format!("Failed to create relationships file: {}", e)))?;
    zip.write_all(RELS_XML.as_bytes())
        .map_err(|e| Error::xml_write(format!("Failed to write relationships: {}", e)))?;

    zip.start_file(MODEL_PATH, options)
        .map_err(|e| Error::xml_write(format!("Failed to create model file: {}", e)))?;
    zip.write_all(model_xml.as_bytes())
        .map_err(|e| Error::xml_write(format!("Failed to write model XML: {}", e)))?;

    let writer = zip
        .finish()
        .map_err(|e| Error::xml_write(format!("Failed to finalize ZIP archive: {}", e)))?;

    Ok(writer)
}
