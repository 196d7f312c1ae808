//! Undirected projection of a subgraph with one vertex removed.
//!
//! Connected components of the projection tell whether the removed vertex
//! is an articulation point of its star, and which side each neighbour of it
//! falls on.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::fracture::subgraph::{Subgraph, Vertex};
use crate::mesh_error::MeshFractureError;
use crate::topology::store::EntityStore;

/// CSR-style undirected graph over the live subgraph vertices except one.
#[derive(Debug, Clone)]
pub struct UndirectedProjection {
    /// CSR offsets into `adjncy` for each projected vertex.
    pub xadj: Vec<usize>,
    /// CSR adjacency list (indices into `order`).
    pub adjncy: Vec<usize>,
    /// Subgraph vertices in projection order.
    pub order: Vec<Vertex>,
    index: HashMap<Vertex, usize>,
}

impl UndirectedProjection {
    /// Project `graph` without `removed`: each directed edge not incident to
    /// `removed` becomes an undirected one.
    pub fn without<S: EntityStore>(graph: &Subgraph<'_, S>, removed: Vertex) -> Result<Self, MeshFractureError> {
        let order: Vec<Vertex> = graph.vertices().filter(|&v| v != removed).collect();
        let index: HashMap<Vertex, usize> = order.iter().enumerate().map(|(i, &v)| (v, i)).collect();

        let mut neighbours = vec![Vec::new(); order.len()];
        for (i, &v) in order.iter().enumerate() {
            for (edge, _) in graph.out_edges(v)? {
                if let Some(&j) = index.get(&edge.target) {
                    neighbours[i].push(j);
                    neighbours[j].push(i);
                }
            }
        }

        let mut xadj = Vec::with_capacity(order.len() + 1);
        let mut adjncy = Vec::new();
        xadj.push(0);
        for mut list in neighbours {
            list.sort_unstable();
            list.dedup();
            adjncy.extend(list);
            xadj.push(adjncy.len());
        }
        Ok(UndirectedProjection {
            xadj,
            adjncy,
            order,
            index,
        })
    }

    /// Neighbour index slice of projected vertex `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.adjncy[self.xadj[i]..self.xadj[i + 1]]
    }

    /// Projection index of a subgraph vertex.
    pub fn index_of(&self, v: Vertex) -> Option<usize> {
        self.index.get(&v).copied()
    }

    /// Label every projected vertex with a component id.
    ///
    /// Returns `(count, labels)` where `labels[i]` is the component of
    /// `order[i]`; components are numbered in order of their lowest vertex.
    pub fn connected_components(&self) -> (usize, Vec<usize>) {
        let mut labels = vec![usize::MAX; self.order.len()];
        let mut count = 0;
        let mut queue = VecDeque::new();
        for start in 0..self.order.len() {
            if labels[start] != usize::MAX {
                continue;
            }
            labels[start] = count;
            queue.push_back(start);
            while let Some(i) = queue.pop_front() {
                for &j in self.neighbors(i) {
                    if labels[j] == usize::MAX {
                        labels[j] = count;
                        queue.push_back(j);
                    }
                }
            }
            count += 1;
        }
        (count, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::{StructuredCellType, structured_box_2d};
    use crate::fracture::graph::{build_full_adjacency, capture_and_trim};
    use crate::fracture::star::star;
    use crate::topology::point::EntityKey;
    use crate::topology::rank::EntityRank;

    #[test]
    fn edge_between_two_quads_is_an_articulation_point() {
        let mut s = structured_box_2d(2, 1, [0.0; 2], [2.0, 1.0], StructuredCellType::Quadrilateral)
            .unwrap();
        s.begin_modification().unwrap();
        build_full_adjacency(&mut s).unwrap();
        capture_and_trim(&mut s).unwrap();

        let n2 = EntityKey::new(2).unwrap();
        let interior = s
            .parents_of_rank(n2, EntityRank::EDGE)
            .into_iter()
            .find(|&e| s.parents_of_rank(e, EntityRank::FACE).len() == 2)
            .unwrap();
        let st = star(&s, interior).unwrap();
        let g = Subgraph::from_star(&mut s, &st).unwrap();
        let v = g.global_to_local(interior).unwrap();

        let p = UndirectedProjection::without(&g, v).unwrap();
        assert_eq!(p.order.len(), 2);
        assert!(p.index_of(v).is_none());
        let (count, labels) = p.connected_components();
        assert_eq!(count, 2);
        assert_ne!(labels[0], labels[1]);
    }

    #[test]
    fn interior_node_of_closed_grid_is_not_an_articulation_point() {
        let mut s = structured_box_2d(2, 2, [0.0; 2], [2.0; 2], StructuredCellType::Quadrilateral)
            .unwrap();
        s.begin_modification().unwrap();
        build_full_adjacency(&mut s).unwrap();
        capture_and_trim(&mut s).unwrap();

        let centre = EntityKey::new(5).unwrap();
        let st = star(&s, centre).unwrap();
        let g = Subgraph::from_star(&mut s, &st).unwrap();
        let p = UndirectedProjection::without(&g, g.global_to_local(centre).unwrap()).unwrap();
        assert_eq!(p.order.len(), 8);
        assert_eq!(p.connected_components().0, 1);
    }
}
