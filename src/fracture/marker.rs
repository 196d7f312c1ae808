//! Boundary marking: choose which internal codimension-1 entities open.
//!
//! A face (3D) or edge (2D) with exactly two element parents is an internal
//! boundary and is offered to the criterion. When it opens, so does its
//! whole downward closure: its edges and nodes in 3D, its nodes in 2D.
//! External boundary entities (one parent) are never offered, and more than
//! two parents means the mesh is not manifold.

use crate::fracture::criterion::FractureCriterion;
use crate::fracture::open::EntityOpenMap;
use crate::mesh_error::MeshFractureError;
use crate::topology::point::EntityKey;
use crate::topology::rank::EntityRank;
use crate::topology::store::EntityStore;

/// Marks boundaries open using a [`FractureCriterion`].
#[derive(Clone, Debug)]
pub struct FractureMarker<C> {
    criterion: C,
    probability: f64,
}

impl<C: FractureCriterion> FractureMarker<C> {
    pub fn new(criterion: C, probability: f64) -> Result<Self, MeshFractureError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(MeshFractureError::InvalidProbability(probability));
        }
        Ok(FractureMarker {
            criterion,
            probability,
        })
    }

    /// Build the open map for the current cell complex.
    ///
    /// Requires adjacent-rank relations (after trimming). Entities are
    /// visited in ascending key order and only owned ones are considered.
    pub fn mark_open<S: EntityStore>(&mut self, store: &S) -> Result<EntityOpenMap, MeshFractureError> {
        let dim = store.dimension();
        let boundary_rank = EntityRank::boundary(dim);
        let element_rank = EntityRank::element(dim);
        let mut open = EntityOpenMap::new();
        let mut opened = 0usize;

        for key in store.entities(boundary_rank) {
            if !store.is_owned(key)? {
                continue;
            }
            let parents = store.parents_of_rank(key, element_rank).len();
            if parents < 2 {
                continue;
            }
            if parents > 2 {
                return Err(MeshFractureError::NonManifoldBoundary { key, parents });
            }
            if self.criterion.is_open(key, self.probability) {
                mark_closure_open(store, key, &mut open)?;
                opened += 1;
            }
        }
        log::info!(
            "opened {opened} rank-{boundary_rank} entities ({} entities open in total)",
            open.count_open()
        );
        Ok(open)
    }
}

/// Mark `key` and everything below it open.
pub fn mark_closure_open<S: EntityStore>(
    store: &S,
    key: EntityKey,
    open: &mut EntityOpenMap,
) -> Result<(), MeshFractureError> {
    let mut stack = vec![key];
    while let Some(k) = stack.pop() {
        if open.is_open(k) {
            continue;
        }
        open.set_open(k, true);
        let rank = store.rank(k)?;
        for rel in store.cone(k) {
            if store.rank(rel.dst)? < rank {
                stack.push(rel.dst);
            }
        }
    }
    Ok(())
}
