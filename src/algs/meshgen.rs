//! Basic mesh generators for structured boxes and single cells.
//!
//! Generated meshes number nodes first (`1..=n_nodes`, x fastest, then y,
//! then z) and elements after them, all in a single element block named
//! `block_1`. Nothing is interpolated: the store holds element→node
//! relations only, exactly like a mesh read from disk.

use crate::mesh_error::MeshFractureError;
use crate::topology::cell_type::CellType;
use crate::topology::in_memory::InMemoryEntityStore;
use crate::topology::point::EntityKey;

/// Block name given to generated elements.
pub const GENERATED_BLOCK: &str = "block_1";

/// Cell-type choices for structured meshes.
#[derive(Clone, Copy, Debug)]
pub enum StructuredCellType {
    Triangle,
    Quadrilateral,
    Hexahedron,
}

fn invalid_geometry(message: impl Into<String>) -> MeshFractureError {
    MeshFractureError::InvalidGeometry(message.into())
}

/// Build a store from node coordinates and element→node index lists.
pub fn build_mesh(
    dimension: usize,
    node_coords: &[Vec<f64>],
    cells: &[Vec<usize>],
    cell_type: CellType,
) -> Result<InMemoryEntityStore, MeshFractureError> {
    let mut store = InMemoryEntityStore::new(dimension)?;
    let mut next_id = 1u64;

    let mut nodes = Vec::with_capacity(node_coords.len());
    for (idx, coord) in node_coords.iter().enumerate() {
        if coord.len() != dimension {
            return Err(invalid_geometry(format!(
                "node {idx} has dimension {}, expected {dimension}",
                coord.len()
            )));
        }
        let key = EntityKey::new(next_id)?;
        next_id += 1;
        store.insert_node(key, coord)?;
        nodes.push(key);
    }

    for (cell_idx, indices) in cells.iter().enumerate() {
        let cell_nodes = indices
            .iter()
            .map(|&i| {
                nodes.get(i).copied().ok_or_else(|| {
                    invalid_geometry(format!("cell {cell_idx} references missing node {i}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let key = EntityKey::new(next_id)?;
        next_id += 1;
        store.insert_element(key, cell_type, &cell_nodes, Some(GENERATED_BLOCK))?;
    }

    Ok(store)
}

/// Structured 2D box over `[min, max]` with `nx`×`ny` cells.
pub fn structured_box_2d(
    nx: usize,
    ny: usize,
    min: [f64; 2],
    max: [f64; 2],
    cell_type: StructuredCellType,
) -> Result<InMemoryEntityStore, MeshFractureError> {
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry("nx and ny must be positive"));
    }
    let cell_type = match cell_type {
        StructuredCellType::Triangle => CellType::Triangle,
        StructuredCellType::Quadrilateral => CellType::Quadrilateral,
        StructuredCellType::Hexahedron => {
            return Err(invalid_geometry("hex elements are not valid for 2D meshes"));
        }
    };

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let mut coords = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            coords.push(vec![min[0] + dx * i as f64, min[1] + dy * j as f64]);
        }
    }

    let mut cells = Vec::new();
    let row_stride = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * row_stride + i;
            let v1 = v0 + 1;
            let v3 = v0 + row_stride;
            let v2 = v3 + 1;
            if cell_type == CellType::Triangle {
                cells.push(vec![v0, v1, v2]);
                cells.push(vec![v0, v2, v3]);
            } else {
                cells.push(vec![v0, v1, v2, v3]);
            }
        }
    }

    build_mesh(2, &coords, &cells, cell_type)
}

/// Structured hexahedral box over `[min, max]` with `nx`×`ny`×`nz` cells.
pub fn structured_box_3d(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
) -> Result<InMemoryEntityStore, MeshFractureError> {
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(invalid_geometry("nx, ny, and nz must be positive"));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let dz = (max[2] - min[2]) / nz as f64;
    let mut coords = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                coords.push(vec![
                    min[0] + dx * i as f64,
                    min[1] + dy * j as f64,
                    min[2] + dz * k as f64,
                ]);
            }
        }
    }

    let mut cells = Vec::with_capacity(nx * ny * nz);
    let row_stride = nx + 1;
    let slab_stride = row_stride * (ny + 1);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let v0 = k * slab_stride + j * row_stride + i;
                let v1 = v0 + 1;
                let v3 = v0 + row_stride;
                let v2 = v3 + 1;
                let v4 = v0 + slab_stride;
                let v5 = v4 + 1;
                let v7 = v4 + row_stride;
                let v6 = v7 + 1;
                cells.push(vec![v0, v1, v2, v3, v4, v5, v6, v7]);
            }
        }
    }

    build_mesh(3, &coords, &cells, CellType::Hexahedron)
}

/// The unit tetrahedron: nodes 1..=4, element 5.
pub fn single_tetrahedron() -> Result<InMemoryEntityStore, MeshFractureError> {
    let coords = vec![
        vec![0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ];
    build_mesh(3, &coords, &[vec![0, 1, 2, 3]], CellType::Tetrahedron)
}
