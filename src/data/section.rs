//! Section: per-entity field payload storage.
//!
//! A `Section<V>` couples an atlas (entity key → `(offset, len)` in a
//! contiguous buffer) with the buffer itself. Every entity in a section holds
//! the same number of components: a coordinate section over nodes of a 3D
//! mesh has three per node, a scalar nodal field has one.
//!
//! The entity store keeps one section per named field and copies slices
//! between entities when a node is cloned during fracture.

use crate::mesh_error::MeshFractureError;
use crate::topology::point::EntityKey;
use std::collections::BTreeMap;

/// Fixed-width per-entity data, iterated in key order.
#[derive(Clone, Debug, PartialEq)]
pub struct Section<V = f64> {
    components: usize,
    atlas: BTreeMap<EntityKey, (usize, usize)>,
    data: Vec<V>,
}

impl<V: Clone + Default> Section<V> {
    /// Empty section with `components` values per entity.
    pub fn new(components: usize) -> Self {
        Section {
            components,
            atlas: BTreeMap::new(),
            data: Vec::new(),
        }
    }

    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atlas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atlas.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: EntityKey) -> bool {
        self.atlas.contains_key(&key)
    }

    /// Read-only view of the slice stored for `key`.
    pub fn try_restrict(&self, key: EntityKey) -> Result<&[V], MeshFractureError> {
        let (offset, len) = self
            .atlas
            .get(&key)
            .copied()
            .ok_or(MeshFractureError::UnknownEntity { key })?;
        Ok(&self.data[offset..offset + len])
    }

    /// Mutable view of the slice stored for `key`.
    pub fn try_restrict_mut(&mut self, key: EntityKey) -> Result<&mut [V], MeshFractureError> {
        let (offset, len) = self
            .atlas
            .get(&key)
            .copied()
            .ok_or(MeshFractureError::UnknownEntity { key })?;
        Ok(&mut self.data[offset..offset + len])
    }

    /// Upsert the values for `key`; `values` must have `components` entries.
    pub fn try_set(&mut self, key: EntityKey, values: &[V]) -> Result<(), MeshFractureError> {
        if values.len() != self.components {
            return Err(MeshFractureError::SliceLengthMismatch {
                key,
                expected: self.components,
                found: values.len(),
            });
        }
        if !self.atlas.contains_key(&key) {
            let offset = self.data.len();
            self.data.resize(offset + self.components, V::default());
            self.atlas.insert(key, (offset, self.components));
        }
        self.try_restrict_mut(key)?.clone_from_slice(values);
        Ok(())
    }

    /// Copy the slice of `from` onto `to`, adding `to` if needed.
    ///
    /// Returns `false` when `from` has no values in this section.
    pub fn copy_point(&mut self, from: EntityKey, to: EntityKey) -> Result<bool, MeshFractureError> {
        if !self.contains(from) {
            return Ok(false);
        }
        let values = self.try_restrict(from)?.to_vec();
        self.try_set(to, &values)?;
        Ok(true)
    }

    /// Remove `key`, rebuilding the buffer so slices stay contiguous.
    pub fn remove_point(&mut self, key: EntityKey) -> bool {
        if self.atlas.remove(&key).is_none() {
            return false;
        }
        let mut data = Vec::with_capacity(self.atlas.len() * self.components);
        for (offset, len) in self.atlas.values_mut() {
            let start = data.len();
            data.extend_from_slice(&self.data[*offset..*offset + *len]);
            *offset = start;
        }
        self.data = data;
        true
    }

    /// Iterate `(key, slice)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &[V])> + '_ {
        self.atlas
            .iter()
            .map(move |(&key, &(offset, len))| (key, &self.data[offset..offset + len]))
    }

    /// Keys with stored values, ascending.
    pub fn keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.atlas.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(raw: u64) -> EntityKey {
        EntityKey::new(raw).unwrap()
    }

    #[test]
    fn set_restrict_and_copy() {
        let mut s = Section::<f64>::new(2);
        s.try_set(k(1), &[1.0, 2.0]).unwrap();
        assert_eq!(s.try_restrict(k(1)).unwrap(), &[1.0, 2.0]);
        assert!(s.copy_point(k(1), k(5)).unwrap());
        assert_eq!(s.try_restrict(k(5)).unwrap(), &[1.0, 2.0]);
        assert!(!s.copy_point(k(9), k(10)).unwrap());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let mut s = Section::<f64>::new(3);
        let err = s.try_set(k(1), &[1.0]).unwrap_err();
        assert_eq!(
            err,
            MeshFractureError::SliceLengthMismatch {
                key: k(1),
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn remove_keeps_remaining_slices() {
        let mut s = Section::<f64>::new(1);
        for i in 1..=4 {
            s.try_set(k(i), &[i as f64 * 10.0]).unwrap();
        }
        assert!(s.remove_point(k(2)));
        assert!(!s.remove_point(k(2)));
        let got: Vec<_> = s.iter().map(|(key, v)| (key.get(), v[0])).collect();
        assert_eq!(got, vec![(1, 10.0), (3, 30.0), (4, 40.0)]);
    }

    #[test]
    fn missing_key_is_an_error() {
        let s = Section::<f64>::new(1);
        assert_eq!(
            s.try_restrict(k(3)).unwrap_err(),
            MeshFractureError::UnknownEntity { key: k(3) }
        );
    }
}
