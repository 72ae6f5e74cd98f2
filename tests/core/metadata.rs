//! Document metadata and per-object settings

use scene3mf::{DEFAULT_METADATA_TYPE, MetadataEntry, Scene, SceneNode, parse_model_xml, scene_to_string};

#[test]
fn test_document_metadata_decoded() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<model unit="millimeter" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
  <metadata name="Title">Calibration cube</metadata>
  <metadata name="Application" preserve="1">Slicer 5.0</metadata>
  <metadata name="BuildPlateId" type="xs:integer">3</metadata>
  <resources/>
  <build/>
</model>"#;

    let scene = parse_model_xml(xml).unwrap();
    assert_eq!(scene.metadata().len(), 3);
    assert_eq!(scene.metadata_value("Title"), Some("Calibration cube"));

    let application = &scene.metadata()["Application"];
    assert!(application.preserve);
    assert_eq!(application.value_type, DEFAULT_METADATA_TYPE);

    let plate = &scene.metadata()["BuildPlateId"];
    assert_eq!(plate.value_type, "xs:integer");
    assert!(!plate.preserve);
}

#[test]
fn test_missing_metadata_attributes_read_empty() {
    let scene = parse_model_xml(r#"<model><metadata>orphan</metadata></model>"#).unwrap();
    assert_eq!(scene.metadata_value(""), Some("orphan"));
}

#[test]
fn test_legacy_and_conformant_settings_merge() {
    let xml = r#"<model><resources>
  <object id="1">
    <settings>
      <setting key="extruder_nr">0</setting>
      <setting key="layer_height">0.1</setting>
    </settings>
    <metadatagroup>
      <metadata name="cura:layer_height" type="xs:float" preserve="true">0.15</metadata>
    </metadatagroup>
  </object>
</resources><build><item objectid="1"/></build></model>"#;

    let scene = parse_model_xml(xml).unwrap();
    let node = scene.node(scene.scene_nodes()[0]).unwrap();
    assert_eq!(node.settings().len(), 2);
    assert_eq!(node.setting("extruder_nr").unwrap().value, "0");

    // Regression guard: the conformant entry is applied last
    let layer_height = node.setting("layer_height").unwrap();
    assert_eq!(layer_height.value, "0.15");
    assert_eq!(layer_height.value_type, "xs:float");
    assert!(layer_height.preserve);
}

#[test]
fn test_legacy_settings_written_as_metadatagroup() {
    let xml = r#"<model><resources>
  <object id="1"><settings><setting key="extruder_nr">1</setting></settings></object>
</resources><build><item objectid="1"/></build></model>"#;

    let mut scene = parse_model_xml(xml).unwrap();
    let output = scene_to_string(&mut scene).unwrap();
    assert!(output.contains(r#"<metadata name="extruder_nr">1</metadata>"#));
    assert!(!output.contains("<settings>"));
}

#[test]
fn test_setting_values_escaped() {
    let mut scene = Scene::new();
    let mut node = SceneNode::new();
    node.set_setting("start_gcode", "G28 ; home <all> & \"go\"");
    node.set_setting("machine", MetadataEntry::with_type("x", "xs:string", false));
    let handle = scene.add_node(node);
    scene.add_build_item(handle);

    let output = scene_to_string(&mut scene).unwrap();
    let decoded = parse_model_xml(&output).unwrap();
    let node = decoded.node(decoded.scene_nodes()[0]).unwrap();
    assert_eq!(
        node.setting("start_gcode").unwrap().value,
        "G28 ; home <all> & \"go\""
    );
    assert!(node.setting("machine").unwrap().has_default_type());
}
