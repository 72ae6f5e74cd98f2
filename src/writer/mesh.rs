//! Mesh element encoding

use crate::model::MeshData;
use crate::xml::XmlElement;

impl MeshData {
    /// Write `vertices` and `triangles` children into a `mesh` element
    pub fn to_node(&self, mesh: &mut XmlElement) {
        let vertices = mesh.append_child("vertices");
        for vertex in &self.vertices {
            vertices
                .append_child("vertex")
                .set_attribute("x", vertex.x.to_string())
                .set_attribute("y", vertex.y.to_string())
                .set_attribute("z", vertex.z.to_string());
        }

        let triangles = mesh.append_child("triangles");
        for triangle in &self.triangles {
            triangles
                .append_child("triangle")
                .set_attribute("v1", triangle.v1.to_string())
                .set_attribute("v2", triangle.v2.to_string())
                .set_attribute("v3", triangle.v3.to_string());
        }
    }
}
