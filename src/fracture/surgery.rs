//! Surgery primitives on a [`Subgraph`]: clone an open boundary entity and
//! split an articulation point.
//!
//! Both primitives close the entity they process. Neither is undone on
//! error; a failure leaves the mesh corrupt.

use std::collections::BTreeMap;

use crate::fracture::open::EntityOpenMap;
use crate::fracture::projection::UndirectedProjection;
use crate::fracture::subgraph::{Subgraph, Vertex};
use crate::mesh_error::MeshFractureError;
use crate::topology::point::EntityKey;
use crate::topology::rank::EntityRank;
use crate::topology::store::EntityStore;

/// Result of [`Subgraph::split_articulation_point`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticulationSplit {
    /// Entities created for components 1..k, in component order.
    pub new_entities: Vec<EntityKey>,
    /// For a node split: element → the copy of the node it now uses.
    pub replacements: BTreeMap<EntityKey, EntityKey>,
}

impl<S: EntityStore> Subgraph<'_, S> {
    /// Duplicate an open entity shared by exactly two parents, giving the
    /// copy to the first parent.
    ///
    /// Returns the new vertex, or `None` (and changes nothing) when the
    /// entity does not have exactly two in-edges or is not open.
    pub fn clone_boundary_entity(
        &mut self,
        v: Vertex,
        open: &mut EntityOpenMap,
    ) -> Result<Option<Vertex>, MeshFractureError> {
        if self.in_degree(v)? != 2 {
            return Ok(None);
        }
        let key = self.local_to_global(v)?;
        if !open.is_open(key) {
            return Ok(None);
        }

        let copy = self.add_vertex(self.vertex_rank(v)?)?;
        for (edge, local_id) in self.out_edges(v)? {
            self.add_edge(local_id, copy, edge.target)?;
        }
        self.clone_out_edges(v, copy)?;

        let (first, local_id) = self.in_edges(v)?[0];
        self.remove_edge(first.source, v)?;
        self.add_edge(local_id, first.source, copy)?;

        open.set_open(key, false);
        log::trace!("cloned boundary entity {key} as {}", self.local_to_global(copy)?);
        Ok(Some(copy))
    }

    /// Split `v` into one entity per connected component of the subgraph
    /// without it.
    ///
    /// A `v` whose projection stays connected is left untouched, including
    /// its open flag.
    ///
    /// Components are numbered by first appearance among `v`'s in-edge
    /// sources; component 0 keeps `v`, every other component gets a fresh
    /// entity that inherits `v`'s downward relations and takes over the
    /// in-edges from that component.
    pub fn split_articulation_point(
        &mut self,
        v: Vertex,
        open: &mut EntityOpenMap,
    ) -> Result<ArticulationSplit, MeshFractureError> {
        let key = self.local_to_global(v)?;
        if !open.is_open(key) {
            return Err(MeshFractureError::EntityNotOpen { key });
        }
        let rank = self.vertex_rank(v)?;

        let projection = UndirectedProjection::without(self, v)?;
        let (count, labels) = projection.connected_components();
        let in_edges = self.in_edges(v)?;

        // renumber: parents of `v` first, then anything left over
        let mut renumber = vec![usize::MAX; count];
        let mut next = 0;
        let parent_slots = in_edges
            .iter()
            .filter_map(|(edge, _)| projection.index_of(edge.source));
        for slot in parent_slots.chain(0..projection.order.len()) {
            let raw = labels[slot];
            if renumber[raw] == usize::MAX {
                renumber[raw] = next;
                next += 1;
            }
        }
        let component_of = |u: Vertex| projection.index_of(u).map(|i| renumber[labels[i]]);

        let mut split = ArticulationSplit::default();
        if count <= 1 {
            return Ok(split);
        }

        let mut copies = Vec::with_capacity(count - 1);
        for _ in 1..count {
            let copy = self.add_vertex(rank)?;
            copies.push(copy);
            split.new_entities.push(self.local_to_global(copy)?);
        }

        if rank == EntityRank::NODE {
            let element_rank = EntityRank::element(self.store().dimension());
            for &u in &projection.order {
                match component_of(u) {
                    Some(c) if c != 0 && self.vertex_rank(u)? == element_rank => {
                        split
                            .replacements
                            .insert(self.local_to_global(u)?, split.new_entities[c - 1]);
                    }
                    _ => {}
                }
            }
        }

        for &copy in &copies {
            self.clone_out_edges(v, copy)?;
        }

        for (edge, local_id) in in_edges {
            let c = component_of(edge.source)
                .ok_or(MeshFractureError::UnknownVertex { vertex: edge.source.index() })?;
            if c == 0 {
                continue;
            }
            self.remove_edge(edge.source, v)?;
            let (_, inserted) = self.add_edge(local_id, edge.source, copies[c - 1])?;
            if !inserted {
                return Err(MeshFractureError::DuplicateRelation {
                    src: self.local_to_global(edge.source)?,
                    dst: split.new_entities[c - 1],
                });
            }
        }

        open.set_open(key, false);
        log::debug!(
            "split rank-{rank} entity {key} into {count} ({} new)",
            split.new_entities.len()
        );
        Ok(split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::{StructuredCellType, structured_box_2d, structured_box_3d};
    use crate::fracture::graph::{build_full_adjacency, capture_and_trim};
    use crate::fracture::marker::mark_closure_open;
    use crate::fracture::star::star;
    use crate::topology::in_memory::InMemoryEntityStore;

    fn trimmed(mut s: InMemoryEntityStore) -> InMemoryEntityStore {
        s.begin_modification().unwrap();
        build_full_adjacency(&mut s).unwrap();
        capture_and_trim(&mut s).unwrap();
        s
    }

    fn interior(s: &InMemoryEntityStore, rank: EntityRank) -> EntityKey {
        let up = EntityRank::element(s.dimension());
        s.entities(rank)
            .into_iter()
            .find(|&e| s.parents_of_rank(e, up).len() == 2)
            .unwrap()
    }

    #[test]
    fn clone_requires_two_parents_and_open() {
        let mut s = trimmed(structured_box_3d(1, 1, 2, [0.0; 3], [1.0, 1.0, 2.0]).unwrap());
        let face = interior(&s, EntityRank::FACE);
        let edge = s.cone(face)[0].dst;
        let mut open = EntityOpenMap::new();

        let st = star(&s, edge).unwrap();
        let mut g = Subgraph::from_star(&mut s, &st).unwrap();
        let fv = g.global_to_local(face).unwrap();
        assert_eq!(g.clone_boundary_entity(fv, &mut open).unwrap(), None);

        open.set_open(face, true);
        let copy = g.clone_boundary_entity(fv, &mut open).unwrap().unwrap();
        assert!(!open.is_open(face));
        assert_eq!(g.in_degree(fv).unwrap(), 1);
        assert_eq!(g.in_degree(copy).unwrap(), 1);
        assert_eq!(g.clone_boundary_entity(fv, &mut open).unwrap(), None);

        let copy_key = g.local_to_global(copy).unwrap();
        let store = g.store();
        assert_eq!(store.cone(copy_key).len(), 4);
        let face_edges: Vec<_> = store.cone(face).iter().map(|r| (r.dst, r.local_id)).collect();
        let copy_edges: Vec<_> = store.cone(copy_key).iter().map(|r| (r.dst, r.local_id)).collect();
        assert_eq!(face_edges, copy_edges);
    }

    #[test]
    fn split_requires_open() {
        let mut s = trimmed(structured_box_2d(2, 1, [0.0; 2], [2.0, 1.0], StructuredCellType::Quadrilateral).unwrap());
        let edge = interior(&s, EntityRank::EDGE);
        let st = star(&s, edge).unwrap();
        let mut g = Subgraph::from_star(&mut s, &st).unwrap();
        let ev = g.global_to_local(edge).unwrap();
        assert_eq!(
            g.split_articulation_point(ev, &mut EntityOpenMap::new()),
            Err(MeshFractureError::EntityNotOpen { key: edge })
        );
    }

    #[test]
    fn split_edge_between_quads() {
        let mut s = trimmed(structured_box_2d(2, 1, [0.0; 2], [2.0, 1.0], StructuredCellType::Quadrilateral).unwrap());
        let edge = interior(&s, EntityRank::EDGE);
        let mut open = EntityOpenMap::new();
        mark_closure_open(&s, edge, &mut open).unwrap();
        let parents = s.parents_of_rank(edge, EntityRank::FACE);

        let st = star(&s, edge).unwrap();
        let mut g = Subgraph::from_star(&mut s, &st).unwrap();
        let ev = g.global_to_local(edge).unwrap();
        let split = g.split_articulation_point(ev, &mut open).unwrap();
        assert_eq!(split.new_entities.len(), 1);
        assert!(split.replacements.is_empty());
        assert!(!open.is_open(edge));

        let copy = split.new_entities[0];
        let store = g.store();
        let mut sides = store.parents_of_rank(edge, EntityRank::FACE);
        let copy_side = store.parents_of_rank(copy, EntityRank::FACE);
        assert_eq!((sides.len(), copy_side.len()), (1, 1));
        sides.extend(copy_side);
        sides.sort();
        assert_eq!(sides, parents);
        assert_eq!(store.cone(copy).len(), 2);
    }

    #[test]
    fn node_with_connected_star_is_not_split() {
        let mut s = trimmed(structured_box_2d(2, 2, [0.0; 2], [2.0; 2], StructuredCellType::Quadrilateral).unwrap());
        let centre = EntityKey::new(5).unwrap();
        let mut open: EntityOpenMap = [centre].into_iter().collect();
        let before = s.num_entities();
        let st = star(&s, centre).unwrap();
        let mut g = Subgraph::from_star(&mut s, &st).unwrap();
        let nv = g.global_to_local(centre).unwrap();
        let split = g.split_articulation_point(nv, &mut open).unwrap();
        assert_eq!(split, ArticulationSplit::default());
        assert!(open.is_open(centre));
        assert_eq!(s.num_entities(), before);
    }
}
