//! Construct intermediate entities (edges/faces) from element→node meshes.
//!
//! Elements reference their nodes in the canonical ordering documented in
//! [`crate::topology::cell_type`]. Interpolation walks the elements in key
//! order, derives their edges and faces from the cell-type tables, and
//! deduplicates shared entities by a canonical key (sorted node pair for an
//! edge, sorted node list for a face). The store ends up with
//!
//! - 3D: `element → face → edge → node`, plus the redundant `element → edge`,
//!   `element → node` and `face → node` relations;
//! - 2D: `element → edge → node`, plus `element → node`.
//!
//! Every relation carries the local id of the child within its parent's
//! canonical numbering. An edge's first parent fixes its orientation: the
//! edge→node relation to its first node has local id 0.

use std::collections::BTreeMap;

use crate::mesh_error::MeshFractureError;
use crate::topology::cell_type::CellType;
use crate::topology::point::EntityKey;
use crate::topology::rank::{EntityRank, LocalId};
use crate::topology::store::EntityStore;

/// Edge/face bookkeeping produced during interpolation.
#[derive(Debug, Default)]
pub struct InterpolationResult {
    /// Canonical edge key `(min,max)` → edge entity.
    pub edge_entities: BTreeMap<(EntityKey, EntityKey), EntityKey>,
    /// Canonical face key (sorted nodes) → face entity.
    pub face_entities: BTreeMap<Vec<EntityKey>, EntityKey>,
}

/// Create every edge and face implied by the elements of `store`.
///
/// Must run inside a modification window. Running it on a store that already
/// holds a cell complex creates duplicate edges and faces.
pub fn interpolate_adjacent_entities<S: EntityStore>(
    store: &mut S,
) -> Result<InterpolationResult, MeshFractureError> {
    let dim = store.dimension();
    let element_rank = EntityRank::element(dim);
    let mut result = InterpolationResult::default();

    for element in store.entities(element_rank) {
        let cell_type = store.cell_type(element).ok_or_else(|| {
            MeshFractureError::UnsupportedCellType(format!("element {element} has no cell type"))
        })?;
        if cell_type.dimension() != dim {
            return Err(MeshFractureError::UnsupportedCellType(format!(
                "{} element {element} in a {dim}D mesh",
                cell_type.token()
            )));
        }
        let nodes = element_nodes(store, element, cell_type)?;

        for (local, [a, b]) in cell_type.edges().iter().enumerate() {
            let edge = edge_entity(&mut result.edge_entities, store, nodes[*a], nodes[*b])?;
            store.declare_relation(element, edge, local as LocalId)?;
        }

        for (local, face) in cell_type.faces().iter().enumerate() {
            let face_nodes: Vec<EntityKey> = face.iter().map(|&i| nodes[i]).collect();
            let face = face_entity(&mut result, store, &face_nodes)?;
            store.declare_relation(element, face, local as LocalId)?;
        }
    }

    log::info!(
        "interpolated {} edges and {} faces over {dim}D elements",
        result.edge_entities.len(),
        result.face_entities.len()
    );
    Ok(result)
}

/// Nodes of `element` ordered by relation local id.
pub fn element_nodes<S: EntityStore>(
    store: &S,
    element: EntityKey,
    cell_type: CellType,
) -> Result<Vec<EntityKey>, MeshFractureError> {
    let nodes: Vec<EntityKey> = store
        .cone_of_rank(element, EntityRank::NODE)
        .into_iter()
        .map(|rel| rel.dst)
        .collect();
    if nodes.len() != cell_type.node_count() {
        return Err(MeshFractureError::CellVertexCount {
            element,
            expected: cell_type.node_count(),
            found: nodes.len(),
        });
    }
    Ok(nodes)
}

fn edge_entity<S: EntityStore>(
    edges: &mut BTreeMap<(EntityKey, EntityKey), EntityKey>,
    store: &mut S,
    a: EntityKey,
    b: EntityKey,
) -> Result<EntityKey, MeshFractureError> {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&edge) = edges.get(&key) {
        return Ok(edge);
    }
    let edge = alloc_entity(store, EntityRank::EDGE)?;
    edges.insert(key, edge);
    store.declare_relation(edge, a, 0)?;
    store.declare_relation(edge, b, 1)?;
    Ok(edge)
}

fn face_entity<S: EntityStore>(
    result: &mut InterpolationResult,
    store: &mut S,
    nodes: &[EntityKey],
) -> Result<EntityKey, MeshFractureError> {
    let mut key = nodes.to_vec();
    key.sort();
    if let Some(&face) = result.face_entities.get(&key) {
        return Ok(face);
    }
    let face = alloc_entity(store, EntityRank::FACE)?;
    store.set_cell_type(face, CellType::face_for_vertex_count(nodes.len())?)?;
    result.face_entities.insert(key, face);

    let n = nodes.len();
    for j in 0..n {
        let edge = edge_entity(&mut result.edge_entities, store, nodes[j], nodes[(j + 1) % n])?;
        store.declare_relation(face, edge, j as LocalId)?;
        store.declare_relation(face, nodes[j], j as LocalId)?;
    }
    Ok(face)
}

fn alloc_entity<S: EntityStore>(store: &mut S, rank: EntityRank) -> Result<EntityKey, MeshFractureError> {
    store
        .generate_entities(rank, 1)?
        .pop()
        .ok_or(MeshFractureError::InvalidEntityKey)
}
