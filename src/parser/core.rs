//! Object element decoding
//!
//! This module fills a [`SceneNode`] from one `object` element: identity
//! attributes, the mesh and both encodings of per-object settings.

use crate::model::{DEFAULT_METADATA_TYPE, MetadataEntry, ObjectType, ParserConfig, SceneNode};
use crate::namespace::{get_ancestral_namespaces, get_names_for, split_qualified_name};
use crate::xml::Node;

impl SceneNode {
    /// Populate this node from an `object` element
    ///
    /// Settings are cleared first so refilling a node is idempotent. Missing
    /// attributes read as empty strings. Children and the transformation are
    /// not touched here; they come from `components` and `build/item`.
    ///
    /// Settings are read in two passes:
    ///
    /// 1. the legacy `settings/setting[key]` form, stored as plain strings;
    /// 2. the conformant `metadatagroup/metadata[name]` form. A name of the
    ///    form `prefix:key` is only accepted when `prefix` is bound to the
    ///    vendor namespace at that element, or when it is not bound at all and
    ///    is one of the configured legacy prefixes. Unprefixed names are always
    ///    accepted.
    ///
    /// A key present in both forms ends up with the conformant value.
    pub fn fill_by_xml_node(&mut self, object: Node<'_>, config: &ParserConfig) {
        self.settings.clear();
        self.id = object.attribute("id").to_string();
        self.name = object.attribute("name").to_string();

        let type_attr = object.attribute("type");
        self.object_type = if type_attr.is_empty() {
            ObjectType::default()
        } else {
            ObjectType::from_attr(type_attr).unwrap_or_else(|| {
                log::warn!(
                    "Object '{}' has unknown type '{}', using '{}'",
                    self.id,
                    type_attr,
                    ObjectType::default()
                );
                ObjectType::default()
            })
        };

        if let Some(mesh) = object.child("mesh") {
            self.mesh_data.clear();
            self.mesh_data.fill_from_node(mesh);
        }

        if let Some(settings) = object.child("settings") {
            for setting in settings.children_named("setting") {
                self.settings
                    .insert(setting.attribute("key").to_string(), MetadataEntry::new(setting.text()));
            }
        }

        if let Some(group) = object.child("metadatagroup") {
            for metadata in group.children_named("metadata") {
                if let Some((key, entry)) = read_vendor_metadata(metadata, config) {
                    self.settings.insert(key.to_string(), entry);
                }
            }
        }
    }
}

/// Decode one `metadata` element of a `metadatagroup`
///
/// Returns `None` when the name is qualified with a prefix that is bound to
/// another namespace, or that is unbound and not a legacy prefix.
fn read_vendor_metadata<'a>(
    metadata: Node<'a>,
    config: &ParserConfig,
) -> Option<(&'a str, MetadataEntry)> {
    let name = metadata.attribute("name");
    let (prefix, key) = split_qualified_name(name);

    if let Some(prefix) = prefix {
        let namespaces = get_ancestral_namespaces(metadata);
        let accepted = if namespaces.contains_key(prefix) {
            get_names_for(&namespaces, config.vendor_namespace()).contains(prefix)
        } else {
            config.legacy_prefixes().iter().any(|legacy| legacy == prefix)
        };
        if !accepted {
            log::trace!("Dropping metadata '{}' outside the vendor namespace", name);
            return None;
        }
    }

    Some((key, read_metadata_entry(metadata)))
}

/// Read the value, `type` and `preserve` of a metadata element
pub(crate) fn read_metadata_entry(metadata: Node<'_>) -> MetadataEntry {
    let value_type = match metadata.attribute("type") {
        "" => DEFAULT_METADATA_TYPE,
        value_type => value_type,
    };
    MetadataEntry::with_type(
        metadata.text(),
        value_type,
        parse_bool(metadata.attribute("preserve")),
    )
}

/// Truthiness of an XML boolean-like attribute
///
/// `1`, `true` and `yes` (any case) are true; everything else, including an
/// absent attribute, is false.
pub(crate) fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}
