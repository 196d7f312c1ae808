//! Named node sets and side sets carried by a mesh.
//!
//! Node sets group node keys; side sets group `(element, local side)` pairs,
//! where the side is the local face (3D) or edge (2D) number of the element.
//! Both are kept in `BTreeMap`/`BTreeSet` so output order is stable.

use std::collections::{BTreeMap, BTreeSet};

use crate::topology::point::EntityKey;
use crate::topology::rank::LocalId;

/// Named node and side sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshSets {
    node_sets: BTreeMap<String, BTreeSet<EntityKey>>,
    side_sets: BTreeMap<String, BTreeSet<(EntityKey, LocalId)>>,
}

impl MeshSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node` to the node set `name`, creating the set if needed.
    ///
    /// Returns `false` if the node was already a member.
    pub fn insert_node(&mut self, name: &str, node: EntityKey) -> bool {
        self.node_sets.entry(name.to_string()).or_default().insert(node)
    }

    /// Add side `side` of `element` to the side set `name`.
    pub fn insert_side(&mut self, name: &str, element: EntityKey, side: LocalId) -> bool {
        self.side_sets
            .entry(name.to_string())
            .or_default()
            .insert((element, side))
    }

    /// Create an empty node set, leaving an existing one untouched.
    pub fn declare_node_set(&mut self, name: &str) {
        self.node_sets.entry(name.to_string()).or_default();
    }

    /// Create an empty side set, leaving an existing one untouched.
    pub fn declare_side_set(&mut self, name: &str) {
        self.side_sets.entry(name.to_string()).or_default();
    }

    pub fn node_set(&self, name: &str) -> Option<&BTreeSet<EntityKey>> {
        self.node_sets.get(name)
    }

    pub fn side_set(&self, name: &str) -> Option<&BTreeSet<(EntityKey, LocalId)>> {
        self.side_sets.get(name)
    }

    /// Node sets in name order.
    pub fn node_sets(&self) -> impl Iterator<Item = (&str, &BTreeSet<EntityKey>)> {
        self.node_sets.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Side sets in name order.
    pub fn side_sets(&self) -> impl Iterator<Item = (&str, &BTreeSet<(EntityKey, LocalId)>)> {
        self.side_sets.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Names of the node sets that contain `node`.
    pub fn node_sets_of(&self, node: EntityKey) -> Vec<&str> {
        self.node_sets
            .iter()
            .filter(|(_, members)| members.contains(&node))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Put `to` into every node set that holds `from`; returns how many.
    pub fn copy_node_membership(&mut self, from: EntityKey, to: EntityKey) -> usize {
        let mut copied = 0;
        for members in self.node_sets.values_mut() {
            if members.contains(&from) && members.insert(to) {
                copied += 1;
            }
        }
        copied
    }

    /// Drop `key` from every node set and every side it anchors.
    pub fn remove_entity(&mut self, key: EntityKey) {
        for members in self.node_sets.values_mut() {
            members.remove(&key);
        }
        for sides in self.side_sets.values_mut() {
            sides.retain(|&(element, _)| element != key);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node_sets.is_empty() && self.side_sets.is_empty()
    }
}
