//! Local directed graph over the star of an entity.
//!
//! A [`Subgraph`] holds its own adjacency with small local vertex
//! descriptors, a bidirectional map to global entity keys, and a mutable
//! borrow of the entity store. Every structural edit goes to both sides:
//! adding an edge declares the relation in the store, removing a vertex
//! destroys the entity. Descriptors of removed vertices are never reused.

use hashbrown::HashMap;

use crate::fracture::star::{Star, StarEdge};
use crate::mesh_error::MeshFractureError;
use crate::topology::point::EntityKey;
use crate::topology::rank::{EntityRank, LocalId};
use crate::topology::store::EntityStore;

/// Local vertex descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vertex(usize);

impl Vertex {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Directed edge between two local vertices, pointing from higher rank to lower.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: Vertex,
    pub target: Vertex,
}

#[derive(Clone, Debug)]
struct Slot {
    key: EntityKey,
    rank: EntityRank,
    out_edges: Vec<(Vertex, LocalId)>,
    in_edges: Vec<(Vertex, LocalId)>,
}

/// Mutable view of a star, kept consistent with the store.
pub struct Subgraph<'s, S: EntityStore> {
    store: &'s mut S,
    slots: Vec<Option<Slot>>,
    global_to_local: HashMap<EntityKey, Vertex>,
}

impl<'s, S: EntityStore> Subgraph<'s, S> {
    /// Register `vertices` and `edges`; every edge endpoint must be a vertex.
    pub fn new(
        store: &'s mut S,
        vertices: impl IntoIterator<Item = EntityKey>,
        edges: impl IntoIterator<Item = StarEdge>,
    ) -> Result<Self, MeshFractureError> {
        let mut graph = Subgraph {
            store,
            slots: Vec::new(),
            global_to_local: HashMap::new(),
        };
        for key in vertices {
            let rank = graph.store.rank(key)?;
            graph.register(key, rank);
        }
        for edge in edges {
            let source = graph.global_to_local(edge.source)?;
            let target = graph.global_to_local(edge.target)?;
            if graph.has_edge(source, target)? {
                return Err(MeshFractureError::DuplicateRelation {
                    src: edge.source,
                    dst: edge.target,
                });
            }
            graph.link(source, target, edge.local_id)?;
        }
        Ok(graph)
    }

    /// Subgraph over the star of some entity.
    pub fn from_star(store: &'s mut S, star: &Star) -> Result<Self, MeshFractureError> {
        Self::new(store, star.vertices.iter().copied(), star.edges.iter().copied())
    }

    fn register(&mut self, key: EntityKey, rank: EntityRank) -> Vertex {
        let v = Vertex(self.slots.len());
        self.slots.push(Some(Slot {
            key,
            rank,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }));
        self.global_to_local.insert(key, v);
        v
    }

    fn slot(&self, v: Vertex) -> Result<&Slot, MeshFractureError> {
        self.slots
            .get(v.0)
            .and_then(Option::as_ref)
            .ok_or(MeshFractureError::UnknownVertex { vertex: v.0 })
    }

    fn slot_mut(&mut self, v: Vertex) -> Result<&mut Slot, MeshFractureError> {
        self.slots
            .get_mut(v.0)
            .and_then(Option::as_mut)
            .ok_or(MeshFractureError::UnknownVertex { vertex: v.0 })
    }

    fn link(&mut self, source: Vertex, target: Vertex, local_id: LocalId) -> Result<(), MeshFractureError> {
        self.slot(target)?;
        self.slot_mut(source)?.out_edges.push((target, local_id));
        self.slot_mut(target)?.in_edges.push((source, local_id));
        Ok(())
    }

    fn unlink(&mut self, source: Vertex, target: Vertex) -> Result<Option<LocalId>, MeshFractureError> {
        let outs = &mut self.slot_mut(source)?.out_edges;
        let Some(pos) = outs.iter().position(|&(t, _)| t == target) else {
            return Ok(None);
        };
        let (_, local_id) = outs.remove(pos);
        let ins = &mut self.slot_mut(target)?.in_edges;
        if let Some(pos) = ins.iter().position(|&(s, _)| s == source) {
            ins.remove(pos);
        }
        Ok(Some(local_id))
    }

    /// The store this subgraph mirrors into.
    pub fn store(&self) -> &S {
        &*self.store
    }

    pub fn local_to_global(&self, v: Vertex) -> Result<EntityKey, MeshFractureError> {
        Ok(self.slot(v)?.key)
    }

    pub fn global_to_local(&self, key: EntityKey) -> Result<Vertex, MeshFractureError> {
        self.global_to_local
            .get(&key)
            .copied()
            .ok_or(MeshFractureError::MissingLocalVertex { key })
    }

    pub fn vertex_rank(&self, v: Vertex) -> Result<EntityRank, MeshFractureError> {
        Ok(self.slot(v)?.rank)
    }

    /// Live vertices in ascending descriptor order.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| Vertex(i))
    }

    pub fn num_vertices(&self) -> usize {
        self.global_to_local.len()
    }

    pub fn num_edges(&self) -> usize {
        self.slots.iter().flatten().map(|s| s.out_edges.len()).sum()
    }

    /// Out-edges of `v` with their local ids, in insertion order.
    pub fn out_edges(&self, v: Vertex) -> Result<Vec<(Edge, LocalId)>, MeshFractureError> {
        Ok(self
            .slot(v)?
            .out_edges
            .iter()
            .map(|&(target, id)| (Edge { source: v, target }, id))
            .collect())
    }

    /// In-edges of `v` with their local ids, in insertion order.
    pub fn in_edges(&self, v: Vertex) -> Result<Vec<(Edge, LocalId)>, MeshFractureError> {
        Ok(self
            .slot(v)?
            .in_edges
            .iter()
            .map(|&(source, id)| (Edge { source, target: v }, id))
            .collect())
    }

    pub fn in_degree(&self, v: Vertex) -> Result<usize, MeshFractureError> {
        Ok(self.slot(v)?.in_edges.len())
    }

    pub fn out_degree(&self, v: Vertex) -> Result<usize, MeshFractureError> {
        Ok(self.slot(v)?.out_edges.len())
    }

    pub fn has_edge(&self, source: Vertex, target: Vertex) -> Result<bool, MeshFractureError> {
        Ok(self.slot(source)?.out_edges.iter().any(|&(t, _)| t == target))
    }

    /// Local id carried by `edge`.
    pub fn edge_local_id(&self, edge: Edge) -> Result<LocalId, MeshFractureError> {
        self.slot(edge.source)?
            .out_edges
            .iter()
            .find(|&&(t, _)| t == edge.target)
            .map(|&(_, id)| id)
            .ok_or(MeshFractureError::MissingRelation {
                src: self.local_to_global(edge.source)?,
                dst: self.local_to_global(edge.target)?,
                local_id: LocalId::MAX,
            })
    }

    /// Generate a fresh entity of `rank` in the store and register it.
    pub fn add_vertex(&mut self, rank: EntityRank) -> Result<Vertex, MeshFractureError> {
        let key = self
            .store
            .generate_entities(rank, 1)?
            .pop()
            .ok_or(MeshFractureError::InvalidEntityKey)?;
        Ok(self.register(key, rank))
    }

    /// Disconnect `v` in the subgraph and the store, then destroy its entity.
    pub fn remove_vertex(&mut self, v: Vertex) -> Result<(), MeshFractureError> {
        let key = self.local_to_global(v)?;
        for (edge, _) in self.in_edges(v)? {
            self.unlink(edge.source, v)?;
        }
        for (edge, _) in self.out_edges(v)? {
            self.unlink(v, edge.target)?;
        }
        for rel in self.store.cone(key).into_iter().chain(self.store.support(key)) {
            self.store.destroy_relation(rel.src, rel.dst, rel.local_id)?;
        }
        self.store.destroy_entity(key)?;
        self.slots[v.0] = None;
        self.global_to_local.remove(&key);
        Ok(())
    }

    /// Add `source → target` unless it already exists.
    ///
    /// Returns the edge and whether it was inserted; the store relation is
    /// declared only on insertion.
    pub fn add_edge(
        &mut self,
        local_id: LocalId,
        source: Vertex,
        target: Vertex,
    ) -> Result<(Edge, bool), MeshFractureError> {
        let edge = Edge { source, target };
        if self.has_edge(source, target)? {
            return Ok((edge, false));
        }
        let src = self.local_to_global(source)?;
        let dst = self.local_to_global(target)?;
        self.store.declare_relation(src, dst, local_id)?;
        self.link(source, target, local_id)?;
        Ok((edge, true))
    }

    /// Remove `source → target` from the subgraph and the store.
    pub fn remove_edge(&mut self, source: Vertex, target: Vertex) -> Result<(), MeshFractureError> {
        let src = self.local_to_global(source)?;
        let dst = self.local_to_global(target)?;
        let local_id = self
            .unlink(source, target)?
            .ok_or(MeshFractureError::MissingRelation {
                src,
                dst,
                local_id: LocalId::MAX,
            })?;
        self.store.destroy_relation(src, dst, local_id)
    }

    /// Declare on `copy` every downward store relation of `original` it lacks.
    ///
    /// Only the store changes: downward neighbours lie outside an upward star.
    pub fn clone_out_edges(&mut self, original: Vertex, copy: Vertex) -> Result<(), MeshFractureError> {
        let Some(child_rank) = self.vertex_rank(original)?.down() else {
            return Ok(());
        };
        let original = self.local_to_global(original)?;
        let copy = self.local_to_global(copy)?;
        let existing: Vec<EntityKey> = self.store.cone(copy).iter().map(|rel| rel.dst).collect();
        for rel in self.store.cone_of_rank(original, child_rank) {
            if !existing.contains(&rel.dst) {
                self.store.declare_relation(copy, rel.dst, rel.local_id)?;
            }
        }
        Ok(())
    }
}
