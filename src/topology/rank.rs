//! Entity ranks and relation local identifiers.

use std::fmt;

/// Ordinal of a child entity within its parent's canonical local numbering.
pub type LocalId = u32;

/// Topological dimension of a mesh entity: 0 node, 1 edge, 2 face, 3 element.
///
/// In a 2D mesh elements have rank 2, so [`EntityRank::FACE`] and the element
/// rank coincide; use [`EntityRank::element`] with the mesh dimension rather
/// than assuming rank 3.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct EntityRank(u8);

impl EntityRank {
    pub const NODE: EntityRank = EntityRank(0);
    pub const EDGE: EntityRank = EntityRank(1);
    pub const FACE: EntityRank = EntityRank(2);
    pub const ELEMENT_3D: EntityRank = EntityRank(3);

    /// Rank from a raw dimension. Ranks above 3 do not occur in 2D/3D meshes.
    #[inline]
    pub const fn new(raw: u8) -> Self {
        EntityRank(raw)
    }

    /// Element rank of a mesh of dimension `dim`.
    #[inline]
    pub fn element(dim: usize) -> Self {
        EntityRank(dim as u8)
    }

    /// Rank of the codimension-1 (fracturable) entities of a mesh of dimension `dim`.
    #[inline]
    pub fn boundary(dim: usize) -> Self {
        EntityRank(dim.saturating_sub(1) as u8)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Next rank up, i.e. the rank of this entity's parents.
    #[inline]
    pub const fn up(self) -> EntityRank {
        EntityRank(self.0 + 1)
    }

    /// Next rank down, `None` for nodes.
    #[inline]
    pub fn down(self) -> Option<EntityRank> {
        self.0.checked_sub(1).map(EntityRank)
    }

    /// Absolute rank distance between two entities.
    #[inline]
    pub fn distance(self, other: EntityRank) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for EntityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
