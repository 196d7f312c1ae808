#![allow(dead_code)]
use std::collections::BTreeSet;

use mesh_fracture::prelude::*;

pub fn key(u: u64) -> EntityKey {
    EntityKey::new(u).unwrap()
}

/// Wrap `store` in a topology and build its trimmed cell complex.
pub fn initialized(store: InMemoryEntityStore) -> Topology<InMemoryEntityStore> {
    let mut topology = Topology::new(store).unwrap();
    topology.graph_initialization().unwrap();
    topology
}

/// Codimension-1 entities shared by two elements, ascending.
pub fn interior_boundary(store: &InMemoryEntityStore) -> Vec<EntityKey> {
    let dim = store.dimension();
    store
        .entities(EntityRank::boundary(dim))
        .into_iter()
        .filter(|&e| store.parents_of_rank(e, EntityRank::element(dim)).len() == 2)
        .collect()
}

/// The rank-`D-1` entity shared by exactly `elements`.
pub fn shared_boundary(store: &InMemoryEntityStore, elements: [EntityKey; 2]) -> EntityKey {
    let dim = store.dimension();
    let want: BTreeSet<_> = elements.into_iter().collect();
    interior_boundary(store)
        .into_iter()
        .find(|&e| {
            store
                .parents_of_rank(e, EntityRank::element(dim))
                .into_iter()
                .collect::<BTreeSet<_>>()
                == want
        })
        .unwrap()
}

/// Mark with `criterion`, fracture and clean up.
pub fn fracture<C: FractureCriterion>(
    topology: &mut Topology<InMemoryEntityStore>,
    criterion: C,
    probability: f64,
) -> (FractureSummary, EntityOpenMap) {
    let mut open = topology.mark_open(criterion, probability).unwrap();
    topology.modification_begin().unwrap();
    let summary = topology.fracture_boundary(&mut open).unwrap();
    topology.graph_cleanup().unwrap();
    topology.modification_end().unwrap();
    (summary, open)
}

/// Serialize a store with the Exodus writer.
pub fn exodus_bytes(store: &InMemoryEntityStore) -> Vec<u8> {
    let mut out = Vec::new();
    ExodusWriter.write(&mut out, store).unwrap();
    out
}

/// Node set of an element according to the store's element→node relations.
pub fn element_nodes(store: &InMemoryEntityStore, element: EntityKey) -> BTreeSet<EntityKey> {
    store
        .cone_of_rank(element, EntityRank::NODE)
        .into_iter()
        .map(|r| r.dst)
        .collect()
}
