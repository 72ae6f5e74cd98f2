//! Component hierarchies, transformations and the leaf invariant

use scene3mf::{
    MeshData, ParseSession, ParserConfig, Scene, SceneNode, Transform, parse_model_xml,
    scene_to_string,
};

const TRIANGLE_MESH: &str = r#"<mesh>
  <vertices>
    <vertex x="0" y="0" z="0"/>
    <vertex x="1" y="0" z="0"/>
    <vertex x="0" y="1" z="0"/>
  </vertices>
  <triangles>
    <triangle v1="0" v2="1" v3="2"/>
  </triangles>
</mesh>"#;

fn triangle() -> MeshData {
    let mut mesh = MeshData::new();
    mesh.add_vertex(0.0, 0.0, 0.0);
    mesh.add_vertex(1.0, 0.0, 0.0);
    mesh.add_vertex(0.0, 1.0, 0.0);
    mesh.add_triangle(0, 1, 2);
    mesh
}

#[test]
fn test_assembly_with_three_components() {
    crate::init_logging();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<model unit="millimeter" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
  <resources>
    <object id="1" name="brick">{TRIANGLE_MESH}</object>
    <object id="2" name="assembly">
      <components>
        <component objectid="1"/>
        <component objectid="1" transform="1 0 0 0 1 0 0 0 1 20 0 0"/>
        <component objectid="1" transform="1 0 0 0 1 0 0 0 1 0 20 0"/>
      </components>
    </object>
  </resources>
  <build>
    <item objectid="2"/>
  </build>
</model>"#
    );

    let scene = parse_model_xml(&xml).unwrap();
    assert_eq!(scene.scene_nodes().len(), 1);

    let assembly = scene.node(scene.scene_nodes()[0]).unwrap();
    assert_eq!(assembly.name(), "assembly");
    assert!(!assembly.has_geometry());
    assert_eq!(assembly.children().len(), 3);

    let translations: Vec<(f64, f64, f64)> = assembly
        .children()
        .iter()
        .map(|&child| scene.node(child).unwrap().transformation().translation())
        .collect();
    assert_eq!(
        translations,
        vec![(0.0, 0.0, 0.0), (20.0, 0.0, 0.0), (0.0, 20.0, 0.0)]
    );

    // Each reference becomes its own node
    assert_eq!(scene.all_scene_nodes().len(), 4);
}

#[test]
fn test_nested_components_written_before_referrers() {
    let xml = format!(
        r#"<model><resources>
  <object id="10">{TRIANGLE_MESH}</object>
  <object id="20"><components><component objectid="10"/></components></object>
  <object id="30"><components><component objectid="20"/></components></object>
</resources><build><item objectid="30"/></build></model>"#
    );

    let mut scene = parse_model_xml(&xml).unwrap();
    let output = scene_to_string(&mut scene).unwrap();

    let mesh_object = output.find(r#"<object id="1" type="model">"#).unwrap();
    let middle = output.find(r#"<object id="2" type="model">"#).unwrap();
    let top = output.find(r#"<object id="3" type="model">"#).unwrap();
    assert!(mesh_object < middle && middle < top);
    assert!(output.contains(r#"<component objectid="1" transform="1 0 0 0 1 0 0 0 1 0 0 0"/>"#));
    assert!(output.contains(r#"<component objectid="2" transform="1 0 0 0 1 0 0 0 1 0 0 0"/>"#));
    assert!(output.contains(r#"<item objectid="3" transform="1 0 0 0 1 0 0 0 1 0 0 0"/>"#));
}

#[test]
fn test_add_child_to_mesh_leaf_rejected() {
    let mut scene = Scene::new();
    let mut leaf = SceneNode::new();
    assert!(leaf.set_mesh_data(triangle()));
    let leaf = scene.add_node(leaf);
    let other = scene.add_node(SceneNode::new());

    let before = scene.clone();
    assert!(!scene.add_child(leaf, other));
    assert_eq!(scene, before);
}

#[test]
fn test_empty_node_is_inert() {
    let mut scene = Scene::new();
    let empty = scene.add_node(SceneNode::new());
    scene.add_build_item(empty);

    let output = scene_to_string(&mut scene).unwrap();
    assert!(output.contains(r#"<object id="1" type="model"/>"#));
    assert!(!output.contains("<mesh"));
    assert!(!output.contains("<components"));
}

#[test]
fn test_item_transform_kept_on_root() {
    let mut scene = Scene::new();
    let mut root = SceneNode::new();
    root.set_mesh_data(triangle());
    root.set_transformation(Transform([
        0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 12.5, -3.25, 0.0,
    ]));
    let root = scene.add_node(root);
    scene.add_build_item(root);

    let output = scene_to_string(&mut scene).unwrap();
    assert!(output.contains(r#"transform="0 -1 0 1 0 0 0 0 1 12.5 -3.25 0""#));

    let decoded = parse_model_xml(&output).unwrap();
    let node = decoded.node(decoded.scene_nodes()[0]).unwrap();
    assert_eq!(node.transformation(), scene.node(root).unwrap().transformation());
    assert_eq!(node.mesh_data(), &triangle());
}

#[test]
fn test_cyclic_components_terminate() {
    crate::init_logging();
    let xml = format!(
        r#"<model><resources>
  <object id="1" name="left"><components><component objectid="2"/><component objectid="2"/></components></object>
  <object id="2" name="right"><components><component objectid="1"/><component objectid="3"/></components></object>
  <object id="3" name="leaf">{TRIANGLE_MESH}</object>
</resources><build><item objectid="1"/></build></model>"#
    );

    let mut scene = parse_model_xml(&xml).unwrap();
    // left -> 2x right -> leaf; the references back to left are dropped
    assert_eq!(scene.all_scene_nodes().len(), 5);

    let output = scene_to_string(&mut scene).unwrap();
    let decoded = parse_model_xml(&output).unwrap();
    assert_eq!(decoded.all_scene_nodes().len(), 5);
}

#[test]
fn test_node_budget_from_config() {
    let mut xml = String::from(r#"<model><resources><object id="0"/>"#);
    for level in 1..=20 {
        xml.push_str(&format!(
            r#"<object id="{level}"><components><component objectid="{below}"/><component objectid="{below}"/></components></object>"#,
            below = level - 1
        ));
    }
    xml.push_str(r#"</resources><build><item objectid="20"/></build></model>"#);

    let mut session = ParseSession::with_config(ParserConfig::new().with_max_instantiated_nodes(1000));
    let scene = session.parse(&xml).unwrap();
    assert_eq!(scene.node_count(), 1000);
}
