//! Serializer ordering, renumbering and decode/encode stability

use scene3mf::{
    MESH_NODE_OBJECTID, MeshData, MetadataEntry, ObjectType, ParseSession, Scene, SceneNode,
    parse_model_xml, scene_to_string,
};
use std::collections::HashSet;

fn mesh_node() -> SceneNode {
    let mut mesh = MeshData::new();
    mesh.add_vertex(0.0, 0.0, 0.0);
    mesh.add_vertex(2.5, 0.0, 0.0);
    mesh.add_vertex(0.0, 2.5, 0.0);
    mesh.add_triangle(0, 1, 2);

    let mut node = SceneNode::new();
    node.set_mesh_data(mesh);
    node
}

/// Build a small scene: a group with two mesh children, one referenced back
fn sample_scene() -> Scene {
    let mut scene = Scene::new();

    let mut left = mesh_node();
    left.set_id("left-part");
    left.set_name("Left");
    left.set_setting("extruder_nr", "0");
    let left = scene.add_node(left);

    let mut right = mesh_node();
    right.set_id("99");
    right.set_object_type(ObjectType::Support);
    let right = scene.add_node(right);

    let mut group = SceneNode::new();
    group.set_id("group");
    group.set_name("Group");
    group.set_setting(
        "print_order",
        MetadataEntry::with_type("2", "xs:integer", true),
    );
    group.set_mesh_node(Some(right));
    let group = scene.add_node(group);
    assert!(scene.add_child(group, left));
    assert!(scene.add_child(group, right));
    assert!(scene.add_build_item(group));

    let mut loose = mesh_node();
    loose.set_id("99");
    let loose = scene.add_node(loose);
    assert!(scene.add_build_item(loose));

    scene.set_metadata("Title", "Round trip");
    scene.set_metadata("Designer", MetadataEntry::with_type("someone", "xs:string", true));
    scene
}

fn attribute_values<'a>(xml: &'a str, attribute: &str) -> Vec<&'a str> {
    let needle = format!(" {}=\"", attribute);
    xml.match_indices(&needle)
        .map(|(start, _)| {
            let rest = &xml[start + needle.len()..];
            &rest[..rest.find('"').unwrap()]
        })
        .collect()
}

#[test]
fn test_ids_are_dense_and_references_resolve() {
    let mut scene = sample_scene();
    let output = scene_to_string(&mut scene).unwrap();

    let object_ids: Vec<&str> = output
        .lines()
        .filter(|line| line.trim_start().starts_with("<object "))
        .flat_map(|line| attribute_values(line, "id"))
        .collect();
    assert_eq!(object_ids, vec!["1", "2", "3", "4"]);

    let defined: HashSet<&str> = object_ids.into_iter().collect();
    for reference in attribute_values(&output, "objectid") {
        assert!(defined.contains(reference), "dangling objectid {}", reference);
    }
}

#[test]
fn test_back_reference_uses_renumbered_id() {
    let mut scene = sample_scene();
    let output = scene_to_string(&mut scene).unwrap();

    // Table order: Left (1), right (2), Group (3), loose (4)
    assert!(output.contains(r#"<metadata name="mesh_node_objectid" preserve="true">2</metadata>"#));

    let right = scene.node(scene.node(scene.scene_nodes()[0]).unwrap().children()[1]).unwrap();
    assert_eq!(right.id(), "2");
}

#[test]
fn test_default_entries_carry_no_type_or_preserve() {
    let mut scene = sample_scene();
    let output = scene_to_string(&mut scene).unwrap();

    assert!(output.contains(r#"<metadata name="extruder_nr">0</metadata>"#));
    assert!(output.contains(r#"<metadata name="Title">Round trip</metadata>"#));
    assert!(output.contains(
        r#"<metadata name="print_order" type="xs:integer" preserve="true">2</metadata>"#
    ));
    assert!(output.contains(r#"<metadata name="Designer" preserve="true">someone</metadata>"#));
}

#[test]
fn test_decode_encode_is_byte_stable() {
    let mut scene = sample_scene();
    let first = scene_to_string(&mut scene).unwrap();

    let mut decoded = ParseSession::new().parse(&first).unwrap();
    let second = scene_to_string(&mut decoded).unwrap();
    assert_eq!(first, second);

    let mut again = parse_model_xml(&second).unwrap();
    assert_eq!(scene_to_string(&mut again).unwrap(), second);
}

#[test]
fn test_back_reference_survives_round_trip() {
    let mut scene = sample_scene();
    let output = scene_to_string(&mut scene).unwrap();
    let decoded = parse_model_xml(&output).unwrap();

    let group = decoded.node(decoded.scene_nodes()[0]).unwrap();
    assert_eq!(group.mesh_node(), Some(group.children()[1]));
    assert!(group.setting(MESH_NODE_OBJECTID).is_none());
    assert_eq!(group.setting("print_order").unwrap().value, "2");
}

#[test]
fn test_root_element_attributes() {
    let mut scene = Scene::new();
    scene.set_unit("inch");
    let output = scene_to_string(&mut scene).unwrap();

    assert!(output.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(output.contains(
        r#"<model unit="inch" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02" xmlns:cura="http://software.ultimaker.com/xml/cura/3mf/2015/10" xml:lang="en-US">"#
    ));
}

#[test]
fn test_unreachable_nodes_not_written() {
    let mut scene = Scene::new();
    let placed = scene.add_node(mesh_node());
    let mut orphan = mesh_node();
    orphan.set_name("orphan");
    scene.add_node(orphan);
    scene.add_build_item(placed);

    let output = scene_to_string(&mut scene).unwrap();
    assert!(!output.contains("orphan"));
    assert_eq!(output.matches("<object ").count(), 1);
}

#[test]
fn test_back_reference_to_unreachable_node_dropped() {
    crate::init_logging();
    let mut scene = Scene::new();
    let mut orphan = SceneNode::new();
    orphan.set_id("1");
    let orphan = scene.add_node(orphan);

    let mut item = SceneNode::new();
    item.set_id("a");
    item.set_mesh_node(Some(orphan));
    let item = scene.add_node(item);
    scene.add_build_item(item);

    let output = scene_to_string(&mut scene).unwrap();
    assert!(output.contains(r#"<object id="1" type="model"/>"#));
    assert!(!output.contains(MESH_NODE_OBJECTID));

    let decoded = parse_model_xml(&output).unwrap();
    let node = decoded.node(decoded.scene_nodes()[0]).unwrap();
    assert_eq!(node.mesh_node(), None);
}
