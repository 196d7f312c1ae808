//! `EntityKey`: a strong, zero-cost handle for mesh entities
//!
//! Every node, edge, face and element in the entity store is identified by a
//! globally unique, opaque key that stays stable for the entity's lifetime.
//! `EntityKey` wraps a nonzero `u64` so that 0 stays reserved as an invalid
//! or sentinel value.
//!
//! Keys are totally ordered; the entity store iterates in key order, which is
//! what makes surgery reproducible under a fixed seed.

use crate::mesh_error::MeshFractureError;
use std::{fmt, num::NonZeroU64};

/// Globally unique identifier of a mesh entity.
///
/// # Memory layout
/// This type is `repr(transparent)`: it has the same ABI and alignment as
/// its single field (`NonZeroU64`), and `Option<EntityKey>` is the size of a
/// `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct EntityKey(NonZeroU64);

impl EntityKey {
    /// Creates a new `EntityKey` from a raw `u64` value.
    ///
    /// Returns [`MeshFractureError::InvalidEntityKey`] if `raw == 0`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mesh_fracture::topology::point::EntityKey;
    /// let k = EntityKey::new(1).unwrap();
    /// assert_eq!(k.get(), 1);
    /// assert!(EntityKey::new(0).is_err());
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshFractureError> {
        NonZeroU64::new(raw)
            .map(EntityKey)
            .ok_or(MeshFractureError::InvalidEntityKey)
    }

    /// Returns the inner `u64` value of this key.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityKey").field(&self.get()).finish()
    }
}

/// Prints only the raw integer, as used in reports and GraphViz labels.
impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zero_is_rejected() {
        assert_eq!(EntityKey::new(0), Err(MeshFractureError::InvalidEntityKey));
    }

    #[test]
    fn new_and_get() {
        let k = EntityKey::new(42).unwrap();
        assert_eq!(k.get(), 42);
        assert_eq!(EntityKey::new(u64::MAX).unwrap().get(), u64::MAX);
    }

    #[test]
    fn debug_and_display() {
        let k = EntityKey::new(7).unwrap();
        assert_eq!(format!("{:?}", k), "EntityKey(7)");
        assert_eq!(format!("{}", k), "7");
    }

    #[test]
    fn ordering_follows_raw_value() {
        let a = EntityKey::new(1).unwrap();
        let b = EntityKey::new(2).unwrap();
        assert!(a < b);
        let mut keys = vec![b, a];
        keys.sort();
        assert_eq!(keys, vec![a, b]);
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let k = EntityKey::new(123).unwrap();
        let s = serde_json::to_string(&k).unwrap();
        assert_eq!(s, "123");
        let k2: EntityKey = serde_json::from_str(&s).unwrap();
        assert_eq!(k2, k);
    }

    #[test]
    fn bincode_roundtrip() {
        let k = EntityKey::new(456).unwrap();
        let bytes = bincode::serialize(&k).unwrap();
        let k2: EntityKey = bincode::deserialize(&bytes).unwrap();
        assert_eq!(k2, k);
    }

    #[test]
    fn json_zero_is_rejected() {
        assert!(serde_json::from_str::<EntityKey>("0").is_err());
    }
}
