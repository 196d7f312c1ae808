//! Element→node connectivity snapshot.
//!
//! Captured once the cell complex is built and trimmed, updated in place
//! while nodes are split, and used at teardown to re-declare the
//! element→node relations of the fractured mesh.

use std::collections::BTreeMap;

use crate::mesh_error::MeshFractureError;
use crate::topology::point::EntityKey;
use crate::topology::rank::EntityRank;
use crate::topology::store::EntityStore;

/// Node list of one element, in local-id order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementConnectivity {
    pub element: EntityKey,
    pub nodes: Vec<EntityKey>,
}

/// Ordered sequence of element connectivity records, indexed by element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectivityCache {
    records: Vec<ElementConnectivity>,
    index: BTreeMap<EntityKey, usize>,
}

impl ConnectivityCache {
    /// Snapshot the element→node relations of every element, ascending by key.
    pub fn capture<S: EntityStore>(store: &S) -> Self {
        let mut cache = ConnectivityCache::default();
        for element in store.entities(EntityRank::element(store.dimension())) {
            let nodes = store
                .cone_of_rank(element, EntityRank::NODE)
                .into_iter()
                .map(|rel| rel.dst)
                .collect();
            cache.index.insert(element, cache.records.len());
            cache.records.push(ElementConnectivity { element, nodes });
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, element: EntityKey) -> Option<&ElementConnectivity> {
        self.index.get(&element).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementConnectivity> {
        self.records.iter()
    }

    /// Replace every occurrence of `old` in `element`'s node list with `new`.
    ///
    /// Returns how many slots changed.
    pub fn replace_node(
        &mut self,
        element: EntityKey,
        old: EntityKey,
        new: EntityKey,
    ) -> Result<usize, MeshFractureError> {
        let &i = self
            .index
            .get(&element)
            .ok_or(MeshFractureError::ElementNotInCache { element })?;
        let mut replaced = 0;
        for node in self.records[i].nodes.iter_mut().filter(|n| **n == old) {
            *node = new;
            replaced += 1;
        }
        Ok(replaced)
    }
}
