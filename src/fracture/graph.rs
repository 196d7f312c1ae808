//! Graph life cycle: build the cell complex, trim it to adjacent-rank
//! relations, and tear it down back to element→node connectivity.
//!
//! All three steps mutate the store and must run inside a modification
//! window.

use crate::fracture::connectivity::ConnectivityCache;
use crate::mesh_error::MeshFractureError;
use crate::topology::rank::{EntityRank, LocalId};
use crate::topology::store::EntityStore;

/// Create every edge and face of the mesh.
pub fn build_full_adjacency<S: EntityStore>(store: &mut S) -> Result<(), MeshFractureError> {
    store.create_adjacent_entities()
}

/// Snapshot element→node connectivity, then destroy every relation that
/// skips a rank.
///
/// Afterwards each element relates only to its faces (3D) or edges (2D),
/// each face only to its edges, and each edge only to its nodes.
pub fn capture_and_trim<S: EntityStore>(store: &mut S) -> Result<ConnectivityCache, MeshFractureError> {
    let cache = ConnectivityCache::capture(store);
    let dim = store.dimension();
    let mut trimmed = 0usize;
    for rank in (2..=dim as u8).rev().map(EntityRank::new) {
        for key in store.entities(rank) {
            for rel in store.cone(key) {
                if store.rank(rel.dst)?.distance(rank) != 1 {
                    store.destroy_relation(rel.src, rel.dst, rel.local_id)?;
                    trimmed += 1;
                }
            }
        }
    }
    log::debug!("trimmed {trimmed} non-adjacent relations, cached {} elements", cache.len());
    Ok(cache)
}

/// Destroy every intermediate entity and re-declare element→node relations
/// from `cache`.
pub fn graph_cleanup<S: EntityStore>(
    store: &mut S,
    cache: &ConnectivityCache,
) -> Result<(), MeshFractureError> {
    let dim = store.dimension();
    for rank in (1..dim as u8).rev().map(EntityRank::new) {
        let keys = store.entities(rank);
        for &key in &keys {
            for rel in store.cone(key).into_iter().chain(store.support(key)) {
                store.destroy_relation(rel.src, rel.dst, rel.local_id)?;
            }
            store.destroy_entity(key)?;
        }
        log::debug!("destroyed {} rank-{rank} entities", keys.len());
    }

    for record in cache.iter() {
        for (local, &node) in record.nodes.iter().enumerate() {
            store.declare_relation(record.element, node, local as LocalId)?;
        }
    }
    Ok(())
}
