//! Cell types and their canonical local numbering.
//!
//! Elements reference their nodes in the standard ordering below; the tables
//! give the local id of every edge and face, which becomes the `local_id` of
//! the corresponding relation once the cell complex is built.
//!
//! - [`CellType::Triangle`]: `(0,1,2)`
//! - [`CellType::Quadrilateral`]: `(0,1,2,3)` counter-clockwise
//! - [`CellType::Tetrahedron`]: `(0,1,2,3)`
//! - [`CellType::Hexahedron`]: `(0..=7)` with `0..=3` the bottom face and
//!   `4..=7` the top face
//! - [`CellType::Prism`]: `(0..=5)` with `0..=2` the bottom triangle

use crate::mesh_error::MeshFractureError;

/// Common cell types for mesh entities.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D node.
    #[default]
    Vertex,
    /// 1D segment/edge.
    Segment,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Hexahedron,
    /// 3D wedge/prism.
    Prism,
}

const TRI_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];
const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
const HEX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];
const PRISM_EDGES: [[usize; 2]; 9] = [
    [0, 1],
    [1, 2],
    [2, 0],
    [3, 4],
    [4, 5],
    [5, 3],
    [0, 3],
    [1, 4],
    [2, 5],
];

const TET_FACES: [&[usize]; 4] = [&[0, 1, 2], &[0, 1, 3], &[1, 2, 3], &[0, 2, 3]];
const HEX_FACES: [&[usize]; 6] = [
    &[0, 1, 2, 3],
    &[4, 5, 6, 7],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
];
const PRISM_FACES: [&[usize]; 5] = [
    &[0, 1, 2],
    &[3, 4, 5],
    &[0, 1, 4, 3],
    &[1, 2, 5, 4],
    &[2, 0, 3, 5],
];

impl CellType {
    /// Topological dimension of the cell.
    pub fn dimension(self) -> usize {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Hexahedron | CellType::Prism => 3,
        }
    }

    /// Number of nodes in the canonical node list.
    pub fn node_count(self) -> usize {
        match self {
            CellType::Vertex => 1,
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quadrilateral | CellType::Tetrahedron => 4,
            CellType::Prism => 6,
            CellType::Hexahedron => 8,
        }
    }

    /// Local edges as pairs of local node indices; the position is the local id.
    pub fn edges(self) -> &'static [[usize; 2]] {
        match self {
            CellType::Vertex => &[],
            CellType::Segment => &[[0, 1]],
            CellType::Triangle => &TRI_EDGES,
            CellType::Quadrilateral => &QUAD_EDGES,
            CellType::Tetrahedron => &TET_EDGES,
            CellType::Hexahedron => &HEX_EDGES,
            CellType::Prism => &PRISM_EDGES,
        }
    }

    /// Local faces of a 3D cell as cyclic lists of local node indices.
    ///
    /// 2D cells have no faces below themselves and return an empty slice.
    pub fn faces(self) -> &'static [&'static [usize]] {
        match self {
            CellType::Tetrahedron => &TET_FACES,
            CellType::Hexahedron => &HEX_FACES,
            CellType::Prism => &PRISM_FACES,
            _ => &[],
        }
    }

    /// Number of codimension-1 sides: faces of a 3D cell, edges of a 2D one.
    pub fn side_count(self) -> usize {
        if self.dimension() == 3 {
            self.faces().len()
        } else {
            self.edges().len()
        }
    }

    /// Cell type of a polygonal face with `count` vertices.
    pub fn face_for_vertex_count(count: usize) -> Result<CellType, MeshFractureError> {
        match count {
            3 => Ok(CellType::Triangle),
            4 => Ok(CellType::Quadrilateral),
            n => Err(MeshFractureError::UnsupportedCellType(format!(
                "face with {n} vertices"
            ))),
        }
    }

    /// Token used by the mesh file format.
    pub fn token(self) -> &'static str {
        match self {
            CellType::Vertex => "Vertex",
            CellType::Segment => "Segment",
            CellType::Triangle => "Triangle",
            CellType::Quadrilateral => "Quadrilateral",
            CellType::Tetrahedron => "Tetrahedron",
            CellType::Hexahedron => "Hexahedron",
            CellType::Prism => "Prism",
        }
    }

    /// Parse a mesh-file token.
    pub fn from_token(token: &str) -> Result<CellType, MeshFractureError> {
        match token {
            "Vertex" => Ok(CellType::Vertex),
            "Segment" => Ok(CellType::Segment),
            "Triangle" => Ok(CellType::Triangle),
            "Quadrilateral" => Ok(CellType::Quadrilateral),
            "Tetrahedron" => Ok(CellType::Tetrahedron),
            "Hexahedron" => Ok(CellType::Hexahedron),
            "Prism" => Ok(CellType::Prism),
            _ => Err(MeshFractureError::MeshIoParse(format!(
                "unknown cell type token: {token}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn canonical_edges(faces: &[&[usize]]) -> BTreeSet<(usize, usize)> {
        let mut out = BTreeSet::new();
        for face in faces {
            for i in 0..face.len() {
                let (a, b) = (face[i], face[(i + 1) % face.len()]);
                out.insert((a.min(b), a.max(b)));
            }
        }
        out
    }

    #[test]
    fn face_edges_match_cell_edges() {
        for ct in [CellType::Tetrahedron, CellType::Hexahedron, CellType::Prism] {
            let from_faces = canonical_edges(ct.faces());
            let from_table: BTreeSet<_> =
                ct.edges().iter().map(|[a, b]| (*a.min(b), *a.max(b))).collect();
            assert_eq!(from_faces, from_table, "{ct:?}");
        }
    }

    #[test]
    fn euler_characteristic_of_3d_cells() {
        for ct in [CellType::Tetrahedron, CellType::Hexahedron, CellType::Prism] {
            let v = ct.node_count() as i64;
            let e = ct.edges().len() as i64;
            let f = ct.faces().len() as i64;
            assert_eq!(v - e + f, 2, "{ct:?}");
        }
    }

    #[test]
    fn tokens_roundtrip() {
        for ct in [
            CellType::Vertex,
            CellType::Segment,
            CellType::Triangle,
            CellType::Quadrilateral,
            CellType::Tetrahedron,
            CellType::Hexahedron,
            CellType::Prism,
        ] {
            assert_eq!(CellType::from_token(ct.token()).unwrap(), ct);
        }
        assert!(CellType::from_token("Pyramid").is_err());
    }
}
