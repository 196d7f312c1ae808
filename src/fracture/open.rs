//! Open/closed flags for mesh entities.

use std::collections::BTreeMap;

use crate::topology::point::EntityKey;
use crate::topology::rank::EntityRank;
use crate::topology::store::EntityStore;

/// Per-entity boolean "open" flag; entities never set read as closed.
///
/// A node, edge or face is open when it lies on a surface that is about to
/// be split. Surgery clears the flag once the entity has been processed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityOpenMap {
    flags: BTreeMap<EntityKey, bool>,
}

impl EntityOpenMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_open(&self, key: EntityKey) -> bool {
        self.flags.get(&key).copied().unwrap_or(false)
    }

    #[inline]
    pub fn set_open(&mut self, key: EntityKey, open: bool) {
        self.flags.insert(key, open);
    }

    /// Open keys in ascending order.
    pub fn open_keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.flags.iter().filter(|(_, open)| **open).map(|(&k, _)| k)
    }

    pub fn count_open(&self) -> usize {
        self.open_keys().count()
    }

    /// Open entities of `rank`, ascending.
    pub fn open_of_rank<S: EntityStore>(&self, store: &S, rank: EntityRank) -> Vec<EntityKey> {
        self.open_keys()
            .filter(|&k| store.rank(k).is_ok_and(|r| r == rank))
            .collect()
    }

    /// Close every entity.
    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

impl FromIterator<EntityKey> for EntityOpenMap {
    fn from_iter<I: IntoIterator<Item = EntityKey>>(iter: I) -> Self {
        let mut map = EntityOpenMap::new();
        for key in iter {
            map.set_open(key, true);
        }
        map
    }
}
