//! Topology validation helpers.

use crate::fracture::connectivity::ConnectivityCache;
use crate::fracture::open::EntityOpenMap;
use crate::mesh_error::MeshFractureError;
use crate::topology::rank::EntityRank;
use crate::topology::store::EntityStore;

/// Optional validation toggles for relation-graph checks.
#[derive(Debug, Clone, Copy)]
pub struct TopologyValidationOptions {
    /// Ensure every relation joins entities of adjacent ranks.
    pub check_adjacent_ranks: bool,
    /// How to handle codimension-1 entities with more than two parent elements.
    pub non_manifold: NonManifoldHandling,
}

impl TopologyValidationOptions {
    /// Enable all topology validation checks.
    pub fn all() -> Self {
        Self {
            check_adjacent_ranks: true,
            non_manifold: NonManifoldHandling::Error,
        }
    }
}

impl Default for TopologyValidationOptions {
    /// Warn on non-manifold meshes; check ranks only with `strict-invariants`.
    fn default() -> Self {
        Self {
            check_adjacent_ranks: cfg!(feature = "strict-invariants"),
            non_manifold: NonManifoldHandling::Warn,
        }
    }
}

/// Behavior for non-manifold detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonManifoldHandling {
    /// Skip non-manifold detection.
    Ignore,
    /// Log a warning on non-manifold entities.
    Warn,
    /// Return an error on non-manifold entities.
    Error,
}

/// Validate a trimmed cell complex.
pub fn validate_topology<S: EntityStore>(
    store: &S,
    options: TopologyValidationOptions,
) -> Result<(), MeshFractureError> {
    if options.check_adjacent_ranks {
        validate_adjacent_ranks(store)?;
    }
    validate_manifold(store, options.non_manifold)
}

/// Every relation must point from rank `r` to rank `r - 1`.
pub fn validate_adjacent_ranks<S: EntityStore>(store: &S) -> Result<(), MeshFractureError> {
    for rank in 1..=store.dimension() {
        let src_rank = EntityRank::new(rank as u8);
        for src in store.entities(src_rank) {
            for rel in store.cone(src) {
                let dst_rank = store.rank(rel.dst)?;
                if src_rank.distance(dst_rank) != 1 {
                    return Err(MeshFractureError::RelationRankMismatch {
                        src,
                        dst: rel.dst,
                        src_rank,
                        dst_rank,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Everything below an open entity must be open too.
pub fn validate_open_closure<S: EntityStore>(
    store: &S,
    open: &EntityOpenMap,
) -> Result<(), MeshFractureError> {
    for key in open.open_keys() {
        for rel in store.cone(key) {
            if !open.is_open(rel.dst) {
                return Err(MeshFractureError::EntityNotOpen { key: rel.dst });
            }
        }
    }
    Ok(())
}

/// After cleanup: elements point only at nodes, in the order the cache
/// records, and nothing else holds relations.
pub fn validate_element_node_connectivity<S: EntityStore>(
    store: &S,
    cache: &ConnectivityCache,
) -> Result<(), MeshFractureError> {
    let dim = store.dimension();
    let element_rank = EntityRank::element(dim);
    for rank in 1..dim {
        let rank = EntityRank::new(rank as u8);
        if let Some(key) = store.entities(rank).into_iter().next() {
            return Err(MeshFractureError::LeftoverEntity { key, rank });
        }
    }
    for element in store.entities(element_rank) {
        let record = cache
            .get(element)
            .ok_or(MeshFractureError::ElementNotInCache { element })?;
        let cone = store.cone_of_rank(element, EntityRank::NODE);
        if cone.len() != store.cone(element).len() || cone.len() != record.nodes.len() {
            return Err(MeshFractureError::CellVertexCount {
                element,
                expected: record.nodes.len(),
                found: store.cone(element).len(),
            });
        }
        for (local, (rel, &node)) in cone.iter().zip(&record.nodes).enumerate() {
            if rel.dst != node || rel.local_id as usize != local {
                return Err(MeshFractureError::MissingRelation {
                    src: element,
                    dst: node,
                    local_id: local as u32,
                });
            }
        }
    }
    Ok(())
}

/// Detect codimension-1 entities shared by more than two elements.
pub fn validate_manifold<S: EntityStore>(
    store: &S,
    handling: NonManifoldHandling,
) -> Result<(), MeshFractureError> {
    if handling == NonManifoldHandling::Ignore {
        return Ok(());
    }
    let dim = store.dimension();
    let element_rank = EntityRank::element(dim);
    for key in store.entities(EntityRank::boundary(dim)) {
        let parents = store.parents_of_rank(key, element_rank).len();
        if parents > 2 {
            match handling {
                NonManifoldHandling::Warn => {
                    log::warn!("Non-manifold entity detected: key={key} incident_elements={parents}");
                }
                NonManifoldHandling::Error => {
                    return Err(MeshFractureError::NonManifoldBoundary { key, parents });
                }
                NonManifoldHandling::Ignore => {}
            }
        }
    }
    Ok(())
}
