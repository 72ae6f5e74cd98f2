//! Decoding of 3MF model documents into scenes
//!
//! A 3MF package may split its model over several parts. [`ParseSession`]
//! decodes them one at a time: every part except the root model is passed
//! with its path prefixed (`/3D/Objects/a.model:<model ...>`), and the root
//! model is passed last without a prefix, which finalizes the document.

mod core;
mod mesh;
mod scene;

use crate::error::Result;
use crate::model::{ParserConfig, Scene};
use crate::xml::Document;
use std::collections::HashMap;

/// Split an optional `/<path>:` prefix off the text handed to a session
///
/// Returns `(Some(path), xml)` when the text starts with `/` and contains a
/// colon, and `(None, text)` otherwise.
///
/// # Example
///
/// ```
/// use scene3mf::parser::split_part_path;
///
/// assert_eq!(
///     split_part_path("/3D/a.model:<model/>"),
///     (Some("/3D/a.model"), "<model/>")
/// );
/// assert_eq!(split_part_path("<model/>"), (None, "<model/>"));
/// ```
pub fn split_part_path(text: &str) -> (Option<&str>, &str) {
    if !text.starts_with('/') {
        return (None, text);
    }
    match text.split_once(':') {
        Some((path, xml)) => (Some(path), xml),
        None => (None, text),
    }
}

/// Caller-owned state of a multi-part decode
///
/// The session accumulates one [`Scene`] across calls to
/// [`ParseSession::parse`]:
///
/// - text with a path prefix is decoded on top of the accumulated scene, and
///   the merged scene is kept for the next call;
/// - text without a prefix is decoded on top of the accumulated scene, and the
///   session is emptied afterwards, so the next call starts from scratch.
///
/// Sessions are independent of each other; interleaving two multi-part
/// documents requires two sessions.
///
/// # Example
///
/// ```
/// use scene3mf::ParseSession;
///
/// # fn main() -> scene3mf::Result<()> {
/// let mut session = ParseSession::new();
///
/// let part = r#"/3D/Objects/part.model:<model>
///   <resources><object id="1"/></resources>
///   <build><item objectid="1"/></build>
/// </model>"#;
/// let partial = session.parse(part)?;
/// assert_eq!(partial.scene_nodes().len(), 1);
///
/// let root = r#"<model>
///   <resources><object id="1"/></resources>
///   <build><item objectid="1"/></build>
/// </model>"#;
/// let scene = session.parse(root)?;
/// assert_eq!(scene.scene_nodes().len(), 2);
/// assert!(session.accumulated().is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParseSession {
    config: ParserConfig,
    accumulator: Scene,
    /// Documents of path-prefixed parts, for `p:path` references
    parts: HashMap<String, Document>,
}

impl ParseSession {
    /// Create a session with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration used for every call
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Scene accumulated from path-prefixed parts so far
    pub fn accumulated(&self) -> &Scene {
        &self.accumulator
    }

    /// Discard accumulated state
    pub fn reset(&mut self) {
        self.accumulator = Scene::new();
        self.parts.clear();
    }

    /// Decode one part or the final document
    ///
    /// Text without a `model` element leaves the accumulated scene as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Xml`](crate::Error::Xml) or
    /// [`Error::InvalidXml`](crate::Error::InvalidXml) when the text is not
    /// well-formed XML. A failed path-prefixed call leaves the session
    /// unchanged; a failed call without a path still empties it.
    pub fn parse(&mut self, text: &str) -> Result<Scene> {
        let (path, xml) = split_part_path(text);

        match path {
            Some(path) => {
                let document = Document::parse(xml)?;
                if let Some(model) = document.child("model") {
                    self.accumulator
                        .fill_by_xml_node(path, model, &self.parts, &self.config);
                }
                log::debug!(
                    "Merged part '{}' into session ({} build items)",
                    path,
                    self.accumulator.scene_nodes().len()
                );
                self.parts.insert(path.to_string(), document);
                Ok(self.accumulator.clone())
            }
            None => {
                let mut scene = std::mem::take(&mut self.accumulator);
                let parts = std::mem::take(&mut self.parts);

                let document = Document::parse(xml)?;
                if let Some(model) = document.child("model") {
                    scene.fill_by_xml_node("", model, &parts, &self.config);
                }
                log::debug!(
                    "Finalized session after {} parts ({} build items, {} nodes)",
                    parts.len(),
                    scene.scene_nodes().len(),
                    scene.node_count()
                );
                Ok(scene)
            }
        }
    }
}

/// Decode a single, self-contained model document
///
/// Equivalent to a fresh [`ParseSession`] receiving `xml` without a path.
pub fn parse_model_xml(xml: &str) -> Result<Scene> {
    ParseSession::new().parse(xml)
}

/// Decode a single model document with custom configuration
pub fn parse_model_xml_with_config(xml: &str, config: ParserConfig) -> Result<Scene> {
    ParseSession::with_config(config).parse(xml)
}
