//! Vendor namespace resolution for per-object metadata

use scene3mf::namespace::CURA_NAMESPACE;
use scene3mf::{ParserConfig, Scene, parse_model_xml};

fn object_with_group(model_attrs: &str, group_attrs: &str, entries: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<model unit="millimeter" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02" {model_attrs}>
  <resources>
    <object id="1" type="model">
      <metadatagroup {group_attrs}>
        {entries}
      </metadatagroup>
    </object>
  </resources>
  <build>
    <item objectid="1"/>
  </build>
</model>"#
    )
}

fn root_settings(scene: &Scene) -> Vec<(String, String)> {
    let node = scene.node(scene.scene_nodes()[0]).unwrap();
    node.settings()
        .iter()
        .map(|(key, entry)| (key.clone(), entry.value.clone()))
        .collect()
}

#[test]
fn test_vendor_binding_on_root_accepted() {
    let xml = object_with_group(
        &format!(r#"xmlns:cura="{}""#, CURA_NAMESPACE),
        "",
        r#"<metadata name="cura:infill_sparse_density">20</metadata>"#,
    );
    let scene = parse_model_xml(&xml).unwrap();
    assert_eq!(
        root_settings(&scene),
        vec![("infill_sparse_density".to_string(), "20".to_string())]
    );
}

#[test]
fn test_foreign_binding_dropped() {
    let xml = object_with_group(
        r#"xmlns:cura="http://example.com/not-cura""#,
        "",
        r#"<metadata name="cura:infill_sparse_density">20</metadata>"#,
    );
    // A bound prefix is never treated as a legacy prefix
    let scene = parse_model_xml(&xml).unwrap();
    assert!(root_settings(&scene).is_empty());

    let config = ParserConfig::new().without_legacy_prefixes();
    let scene = scene3mf::parser::parse_model_xml_with_config(&xml, config).unwrap();
    assert!(root_settings(&scene).is_empty());
}

#[test]
fn test_foreign_prefix_dropped_with_defaults() {
    crate::init_logging();
    let xml = object_with_group(
        &format!(
            r#"xmlns:cura="{}" xmlns:other="http://example.com/other""#,
            CURA_NAMESPACE
        ),
        "",
        r#"<metadata name="other:secret">1</metadata>
        <metadata name="undeclared:thing">2</metadata>
        <metadata name="cura:kept">3</metadata>"#,
    );
    let scene = parse_model_xml(&xml).unwrap();
    assert_eq!(
        root_settings(&scene),
        vec![("kept".to_string(), "3".to_string())]
    );
}

#[test]
fn test_custom_prefix_on_group() {
    let xml = object_with_group(
        "",
        &format!(r#"xmlns:slicer="{}""#, CURA_NAMESPACE),
        r#"<metadata name="slicer:wall_thickness">1.2</metadata>"#,
    );
    let scene = parse_model_xml(&xml).unwrap();
    assert_eq!(
        root_settings(&scene),
        vec![("wall_thickness".to_string(), "1.2".to_string())]
    );
}

#[test]
fn test_closer_binding_shadows_root() {
    // The group rebinds `cura` to another URI: the root binding no longer applies
    let xml = object_with_group(
        &format!(r#"xmlns:cura="{}""#, CURA_NAMESPACE),
        r#"xmlns:cura="http://example.com/shadow""#,
        r#"<metadata name="cura:layer_height">0.1</metadata>"#,
    );
    let scene = parse_model_xml(&xml).unwrap();
    assert!(root_settings(&scene).is_empty());
}

#[test]
fn test_default_namespace_is_vendor() {
    // An empty prefix (`:key`) resolves through the default namespace
    let xml = format!(
        r#"<model><resources><object id="1">
  <metadatagroup xmlns="{}"><metadata name=":support_enable">True</metadata></metadatagroup>
</object></resources><build><item objectid="1"/></build></model>"#,
        CURA_NAMESPACE
    );
    let scene = parse_model_xml(&xml).unwrap();
    assert_eq!(
        root_settings(&scene),
        vec![("support_enable".to_string(), "True".to_string())]
    );
}

#[test]
fn test_unprefixed_names_always_accepted() {
    let xml = object_with_group(
        "",
        "",
        r#"<metadata name="extruder_nr">1</metadata>"#,
    );
    let config = ParserConfig::new().without_legacy_prefixes();
    let scene = scene3mf::parser::parse_model_xml_with_config(&xml, config).unwrap();
    assert_eq!(
        root_settings(&scene),
        vec![("extruder_nr".to_string(), "1".to_string())]
    );
}

#[test]
fn test_configured_vendor_namespace() {
    let xml = object_with_group(
        r#"xmlns:ps="urn:example:printer-settings""#,
        "",
        r#"<metadata name="ps:nozzle">0.4</metadata>"#,
    );

    let scene = parse_model_xml(&xml).unwrap();
    assert!(root_settings(&scene).is_empty());

    let config = ParserConfig::new().with_vendor_namespace("urn:example:printer-settings");
    let scene = scene3mf::parser::parse_model_xml_with_config(&xml, config).unwrap();
    assert_eq!(
        root_settings(&scene),
        vec![("nozzle".to_string(), "0.4".to_string())]
    );
}
