//! The entity-store contract consumed by the fracture engine.
//!
//! An [`EntityStore`] is the mesh bulk data: entities labelled with a rank
//! and a globally unique key, and directed relations `(src, dst, local_id)`
//! that always point from a higher rank to a lower one. Declaring a relation
//! makes it visible from both ends: as part of `src`'s cone and of `dst`'s
//! support.
//!
//! All structural mutation (declaring or destroying relations, generating or
//! destroying entities) is only valid between
//! [`begin_modification`](EntityStore::begin_modification) and
//! [`end_modification`](EntityStore::end_modification).

use crate::mesh_error::MeshFractureError;
use crate::topology::cell_type::CellType;
use crate::topology::point::EntityKey;
use crate::topology::rank::{EntityRank, LocalId};

/// A directed relation from a higher-rank entity to a lower-rank one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Relation {
    pub src: EntityKey,
    pub dst: EntityKey,
    pub local_id: LocalId,
}

impl Relation {
    #[inline]
    pub fn new(src: EntityKey, dst: EntityKey, local_id: LocalId) -> Self {
        Relation { src, dst, local_id }
    }

    /// The end of the relation that is not `key`.
    #[inline]
    pub fn other(&self, key: EntityKey) -> EntityKey {
        if self.src == key { self.dst } else { self.src }
    }
}

/// Narrow interface to the host mesh.
///
/// Iteration methods return owned vectors in ascending key order (of the
/// entity, or of the relation's other end) so callers can mutate the store
/// while walking a snapshot, and so every traversal is reproducible.
pub trait EntityStore {
    /// Spatial and topological dimension of the mesh (2 or 3).
    fn dimension(&self) -> usize;

    /// All entities of `rank`, ascending by key.
    fn entities(&self, rank: EntityRank) -> Vec<EntityKey>;

    /// Whether `key` names a live entity.
    fn contains(&self, key: EntityKey) -> bool;

    fn rank(&self, key: EntityKey) -> Result<EntityRank, MeshFractureError>;

    /// Whether this process owns `key`.
    fn is_owned(&self, key: EntityKey) -> Result<bool, MeshFractureError>;

    /// Cell type of an element (or of an interpolated face/edge), if recorded.
    fn cell_type(&self, key: EntityKey) -> Option<CellType>;

    /// Outgoing (downward) relations of `key`.
    fn cone(&self, key: EntityKey) -> Vec<Relation>;

    /// Incoming (upward) relations of `key`.
    fn support(&self, key: EntityKey) -> Vec<Relation>;

    fn declare_relation(
        &mut self,
        src: EntityKey,
        dst: EntityKey,
        local_id: LocalId,
    ) -> Result<(), MeshFractureError>;

    fn destroy_relation(
        &mut self,
        src: EntityKey,
        dst: EntityKey,
        local_id: LocalId,
    ) -> Result<(), MeshFractureError>;

    /// Create `count` fresh entities of `rank` and return their keys.
    fn generate_entities(
        &mut self,
        rank: EntityRank,
        count: usize,
    ) -> Result<Vec<EntityKey>, MeshFractureError>;

    /// Destroy an entity that has no remaining relations.
    fn destroy_entity(&mut self, key: EntityKey) -> Result<(), MeshFractureError>;

    /// Record the cell type of an entity created during interpolation.
    fn set_cell_type(&mut self, key: EntityKey, cell_type: CellType) -> Result<(), MeshFractureError>;

    /// Copy every field payload of `from` onto `to`.
    fn copy_entity_fields(&mut self, from: EntityKey, to: EntityKey) -> Result<(), MeshFractureError>;

    /// Add `to` to every node set that holds `from`.
    fn copy_set_membership(&mut self, from: EntityKey, to: EntityKey) -> Result<(), MeshFractureError>;

    fn begin_modification(&mut self) -> Result<(), MeshFractureError>;

    fn end_modification(&mut self) -> Result<(), MeshFractureError>;

    fn in_modification(&self) -> bool;

    /// Promote an element→node mesh to a full cell complex.
    ///
    /// Creates every missing edge (and, in 3D, face) and declares
    /// element→face, face→edge, edge→node relations. Element→node relations
    /// stay in place, as do the redundant element→edge (3D) and face→node
    /// relations; the graph builder trims those.
    fn create_adjacent_entities(&mut self) -> Result<(), MeshFractureError>
    where
        Self: Sized,
    {
        crate::algs::interpolate::interpolate_adjacent_entities(self).map(|_| ())
    }

    /// Relations of `key` in either direction whose other end has `rank`.
    fn relations(&self, key: EntityKey, rank: EntityRank) -> Vec<Relation> {
        let mut out = Vec::new();
        for rel in self.cone(key).into_iter().chain(self.support(key)) {
            if self.rank(rel.other(key)).is_ok_and(|r| r == rank) {
                out.push(rel);
            }
        }
        out
    }

    /// Outgoing relations of `key` to entities of `rank`, sorted by local id.
    fn cone_of_rank(&self, key: EntityKey, rank: EntityRank) -> Vec<Relation> {
        let mut out: Vec<Relation> = self
            .cone(key)
            .into_iter()
            .filter(|rel| self.rank(rel.dst).is_ok_and(|r| r == rank))
            .collect();
        out.sort_by_key(|rel| (rel.local_id, rel.dst));
        out
    }

    /// Sources of the incoming relations of `key` that have `rank`.
    fn parents_of_rank(&self, key: EntityKey, rank: EntityRank) -> Vec<EntityKey> {
        self.support(key)
            .into_iter()
            .filter(|rel| self.rank(rel.src).is_ok_and(|r| r == rank))
            .map(|rel| rel.src)
            .collect()
    }
}
