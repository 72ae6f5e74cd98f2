//! XML namespace resolution for vendor metadata
//!
//! Per-object slicer settings are written as `metadata` elements whose `name`
//! is qualified with a prefix bound to the vendor namespace. Authors may bind
//! that namespace to any prefix, and may declare it on any ancestor, so the
//! accepted prefixes are computed per element rather than hardcoded.

use crate::xml::Node;
use std::collections::{HashMap, HashSet};

/// Namespace URI of the 3MF core specification
pub const CORE_NAMESPACE: &str = "http://schemas.microsoft.com/3dmanufacturing/core/2015/02";

/// Namespace URI of the Cura vendor extension
pub const CURA_NAMESPACE: &str = "http://software.ultimaker.com/xml/cura/3mf/2015/10";

/// Namespace URI of the 3MF production extension (`p:path`, `p:UUID`)
pub const PRODUCTION_NAMESPACE: &str =
    "http://schemas.microsoft.com/3dmanufacturing/production/2015/06";

/// Prefix under which the vendor namespace is written on output
pub const CURA_PREFIX: &str = "cura";

/// Mapping from prefix to URI; the default namespace uses the key `""`
pub type NamespaceMap = HashMap<String, String>;

/// Collect every namespace declaration in scope at `element`
///
/// Declarations are gathered from the element and all of its ancestors.
/// A declaration closer to `element` shadows one further up for the same
/// prefix. The default namespace (`xmlns="..."`) is stored under `""`.
pub fn get_ancestral_namespaces(element: Node<'_>) -> NamespaceMap {
    let mut namespaces = NamespaceMap::new();

    // Closest first: only the first declaration seen for a prefix counts.
    for node in element.ancestors() {
        for (key, value) in node.attributes() {
            let prefix = if key == "xmlns" {
                ""
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                prefix
            } else {
                continue;
            };

            namespaces
                .entry(prefix.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    namespaces
}

/// Every prefix in `namespaces` bound to `uri`, the default prefix `""` included
pub fn get_names_for(namespaces: &NamespaceMap, uri: &str) -> HashSet<String> {
    namespaces
        .iter()
        .filter(|(_, bound)| bound.as_str() == uri)
        .map(|(prefix, _)| prefix.clone())
        .collect()
}

/// Split a qualified name on its first colon
///
/// Returns `(Some(prefix), local)` for `prefix:local` and `(None, name)` when
/// the name carries no prefix.
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}
