//! Mesh element decoding
//!
//! Geometry is read permissively: a coordinate or index that does not parse
//! is replaced by zero and reported once per mesh.

use crate::model::MeshData;
use crate::xml::Node;
use std::str::FromStr;

impl MeshData {
    /// Append the vertices and triangles of a `mesh` element
    ///
    /// Reads `vertices/vertex[x,y,z]` and `triangles/triangle[v1,v2,v3]`.
    /// Existing geometry is kept; call [`MeshData::clear`] first to replace it.
    pub fn fill_from_node(&mut self, mesh: Node<'_>) {
        let mut malformed = 0usize;

        if let Some(vertices) = mesh.child("vertices") {
            for vertex in vertices.children_named("vertex") {
                let x = parse_or_zero(vertex, "x", &mut malformed);
                let y = parse_or_zero(vertex, "y", &mut malformed);
                let z = parse_or_zero(vertex, "z", &mut malformed);
                self.add_vertex(x, y, z);
            }
        }

        if let Some(triangles) = mesh.child("triangles") {
            for triangle in triangles.children_named("triangle") {
                let v1 = parse_or_zero(triangle, "v1", &mut malformed);
                let v2 = parse_or_zero(triangle, "v2", &mut malformed);
                let v3 = parse_or_zero(triangle, "v3", &mut malformed);
                self.add_triangle(v1, v2, v3);
            }
        }

        if malformed > 0 {
            log::warn!(
                "Mesh contains {} missing or malformed numeric attributes, read as 0",
                malformed
            );
        }
    }
}

fn parse_or_zero<T: FromStr + Default>(node: Node<'_>, attribute: &str, malformed: &mut usize) -> T {
    match node.attribute(attribute).trim().parse() {
        Ok(value) => value,
        Err(_) => {
            *malformed += 1;
            T::default()
        }
    }
}
