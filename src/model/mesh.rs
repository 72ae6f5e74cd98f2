//! Triangle mesh payload of a scene node

/// A 3D vertex with x, y, z coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Index of first vertex
    pub v1: usize,
    /// Index of second vertex
    pub v2: usize,
    /// Index of third vertex
    pub v3: usize,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }
}

/// Vertex and triangle storage of one object
///
/// The geometry is carried through the codec as-is; indices are not checked
/// against the vertex list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<Triangle>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesh with pre-allocated capacity
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Vertices in file order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangles in file order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.vertices.push(Vertex::new(x, y, z));
        self.vertices.len() - 1
    }

    /// Append a triangle
    pub fn add_triangle(&mut self, v1: usize, v2: usize, v3: usize) {
        self.triangles.push(Triangle::new(v1, v2, v3));
    }

    /// Remove all geometry
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
    }

    /// Whether the mesh has neither vertices nor triangles
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }
}
