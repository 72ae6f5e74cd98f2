//! Decoder configuration

use crate::namespace::{CURA_NAMESPACE, CURA_PREFIX};

/// Default bound on component nesting while decoding
const DEFAULT_MAX_COMPONENT_DEPTH: usize = 64;

/// Default bound on the nodes one model document may instantiate
const DEFAULT_MAX_INSTANTIATED_NODES: usize = 1_000_000;

/// Configuration for decoding 3MF model documents
///
/// # Example
///
/// ```
/// use scene3mf::{ParseSession, ParserConfig};
///
/// let config = ParserConfig::new()
///     .with_legacy_prefix("slicer")
///     .with_max_component_depth(16);
/// let session = ParseSession::with_config(config);
/// assert_eq!(session.config().max_component_depth(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// URI whose prefixes qualify accepted per-object metadata
    vendor_namespace: String,
    /// Prefixes accepted even when no `xmlns` declaration binds them
    legacy_prefixes: Vec<String>,
    /// Deepest component nesting followed before references are dropped
    max_component_depth: usize,
    /// Most nodes a single model document may add to the scene
    max_instantiated_nodes: usize,
}

impl ParserConfig {
    /// Cura vendor namespace, `cura` accepted undeclared, depth bound of 64
    /// and at most one million nodes per document
    pub fn new() -> Self {
        Self {
            vendor_namespace: CURA_NAMESPACE.to_string(),
            legacy_prefixes: vec![CURA_PREFIX.to_string()],
            max_component_depth: DEFAULT_MAX_COMPONENT_DEPTH,
            max_instantiated_nodes: DEFAULT_MAX_INSTANTIATED_NODES,
        }
    }

    /// Use another vendor namespace URI for metadata prefix resolution
    pub fn with_vendor_namespace(mut self, uri: impl Into<String>) -> Self {
        self.vendor_namespace = uri.into();
        self
    }

    /// Accept an additional prefix without a namespace declaration
    pub fn with_legacy_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !self.legacy_prefixes.contains(&prefix) {
            self.legacy_prefixes.push(prefix);
        }
        self
    }

    /// Only accept prefixes that are actually bound to the vendor namespace
    pub fn without_legacy_prefixes(mut self) -> Self {
        self.legacy_prefixes.clear();
        self
    }

    /// Bound component nesting depth
    pub fn with_max_component_depth(mut self, depth: usize) -> Self {
        self.max_component_depth = depth;
        self
    }

    /// Bound the nodes decoded from one model document
    ///
    /// Shared components are instantiated once per reference, so a small
    /// document can expand to a very large tree.
    pub fn with_max_instantiated_nodes(mut self, count: usize) -> Self {
        self.max_instantiated_nodes = count;
        self
    }

    /// Vendor namespace URI
    pub fn vendor_namespace(&self) -> &str {
        &self.vendor_namespace
    }

    /// Prefixes accepted without declaration
    pub fn legacy_prefixes(&self) -> &[String] {
        &self.legacy_prefixes
    }

    /// Component nesting bound
    pub fn max_component_depth(&self) -> usize {
        self.max_component_depth
    }

    /// Node budget per model document
    pub fn max_instantiated_nodes(&self) -> usize {
        self.max_instantiated_nodes
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}
