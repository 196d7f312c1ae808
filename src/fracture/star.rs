//! Upward star of an entity.

use std::collections::BTreeSet;

use crate::mesh_error::MeshFractureError;
use crate::topology::point::EntityKey;
use crate::topology::rank::LocalId;
use crate::topology::store::EntityStore;

/// A relation inside a star, ordered by `(source, target, local_id)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StarEdge {
    pub source: EntityKey,
    pub target: EntityKey,
    pub local_id: LocalId,
}

/// The entity, every entity reachable from it through upward relations to
/// the next rank, and those relations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Star {
    pub vertices: BTreeSet<EntityKey>,
    pub edges: BTreeSet<StarEdge>,
}

/// Collect the star of `key`.
///
/// In a trimmed complex the star of a node holds its edges, their faces and
/// the elements above them; the star of an element is the element alone.
pub fn star<S: EntityStore>(store: &S, key: EntityKey) -> Result<Star, MeshFractureError> {
    let mut star = Star::default();
    let mut stack = vec![key];
    star.vertices.insert(key);
    while let Some(k) = stack.pop() {
        let up = store.rank(k)?.up();
        for rel in store.support(k) {
            if store.rank(rel.src)? != up {
                continue;
            }
            star.edges.insert(StarEdge {
                source: rel.src,
                target: k,
                local_id: rel.local_id,
            });
            if star.vertices.insert(rel.src) {
                stack.push(rel.src);
            }
        }
    }
    Ok(star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::{StructuredCellType, structured_box_2d};
    use crate::fracture::graph::{build_full_adjacency, capture_and_trim};
    use crate::topology::rank::EntityRank;

    #[test]
    fn star_of_interior_node_in_quad_grid() {
        let mut s = structured_box_2d(2, 2, [0.0; 2], [2.0; 2], StructuredCellType::Quadrilateral)
            .unwrap();
        s.begin_modification().unwrap();
        build_full_adjacency(&mut s).unwrap();
        capture_and_trim(&mut s).unwrap();
        s.end_modification().unwrap();

        let centre = EntityKey::new(5).unwrap();
        let st = star(&s, centre).unwrap();
        let count = |rank| st.vertices.iter().filter(|&&v| s.rank(v).unwrap() == rank).count();
        assert_eq!(count(EntityRank::NODE), 1);
        assert_eq!(count(EntityRank::EDGE), 4);
        assert_eq!(count(EntityRank::FACE), 4);
        // 4 node→edge relations plus 2 element parents per interior edge
        assert_eq!(st.edges.len(), 12);

        let element = s.entities(EntityRank::FACE)[0];
        let alone = star(&s, element).unwrap();
        assert_eq!(alone.vertices.len(), 1);
        assert!(alone.edges.is_empty());
    }
}
