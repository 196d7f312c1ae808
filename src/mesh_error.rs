//! MeshFractureError: unified error type for mesh-fracture public APIs
//!
//! Every fallible operation in the crate returns this error instead of
//! panicking. Variants that describe broken topology (non-manifold
//! boundaries, missing relations, entities that are not open) mean the mesh
//! must be considered corrupt: surgery is never retried or rolled back.

use crate::topology::point::EntityKey;
use crate::topology::rank::{EntityRank, LocalId};
use thiserror::Error;

/// Unified error type for mesh-fracture operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshFractureError {
    /// Attempted to construct an `EntityKey` with a zero value (invalid).
    #[error("EntityKey must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidEntityKey,
    /// The entity store has no entity with this key.
    #[error("unknown entity {key}")]
    UnknownEntity { key: EntityKey },
    /// An entity with this key already exists.
    #[error("entity {key} already exists")]
    DuplicateEntity { key: EntityKey },
    /// A global key has no vertex in the subgraph.
    #[error("entity {key} is not a vertex of the subgraph")]
    MissingLocalVertex { key: EntityKey },
    /// A local vertex descriptor is stale or out of range.
    #[error("vertex {vertex} is not live in the subgraph")]
    UnknownVertex { vertex: usize },
    /// A relation `(src, dst)` already exists.
    #[error("relation {src} -> {dst} already declared")]
    DuplicateRelation { src: EntityKey, dst: EntityKey },
    /// The relation to destroy does not exist.
    #[error("no relation {src} -> {dst} with local id {local_id}")]
    MissingRelation {
        src: EntityKey,
        dst: EntityKey,
        local_id: LocalId,
    },
    /// Relations must point from a higher rank to a strictly lower rank.
    #[error("relation {src} (rank {src_rank}) -> {dst} (rank {dst_rank}) must point downward")]
    RelationRankMismatch {
        src: EntityKey,
        dst: EntityKey,
        src_rank: EntityRank,
        dst_rank: EntityRank,
    },
    /// Entities can only be destroyed once they carry no relations.
    #[error("entity {key} still has {count} relations")]
    EntityHasRelations { key: EntityKey, count: usize },
    /// An intermediate entity outlived graph cleanup.
    #[error("rank-{rank} entity {key} survived graph cleanup")]
    LeftoverEntity { key: EntityKey, rank: EntityRank },
    /// A store mutation was requested outside `begin_modification`/`end_modification`.
    #[error("store mutation outside a modification window: {0}")]
    OutsideModification(&'static str),
    /// `begin_modification` was called twice without `end_modification`.
    #[error("modification window already open")]
    ModificationAlreadyOpen,
    /// A codimension-1 entity bounded by more than two elements.
    #[error("non-manifold boundary entity {key}: {parents} parent elements")]
    NonManifoldBoundary { key: EntityKey, parents: usize },
    /// Surgery was requested on an entity that is not marked open.
    #[error("entity {key} is not marked open")]
    EntityNotOpen { key: EntityKey },
    /// A node split produced an element that the connectivity cache does not know.
    #[error("element {element} is not present in the connectivity cache")]
    ElementNotInCache { element: EntityKey },
    /// The cell type cannot be interpolated or is unknown.
    #[error("unsupported cell type: {0}")]
    UnsupportedCellType(String),
    /// Only 2D and 3D meshes are supported.
    #[error("unsupported mesh dimension {0} (expected 2 or 3)")]
    UnsupportedDimension(usize),
    /// An element's node list does not match its cell type.
    #[error("element {element} expects {expected} nodes, found {found}")]
    CellVertexCount {
        element: EntityKey,
        expected: usize,
        found: usize,
    },
    /// Field payload slice has the wrong length.
    #[error("field slice for {key} has length {found}, expected {expected}")]
    SliceLengthMismatch {
        key: EntityKey,
        expected: usize,
        found: usize,
    },
    /// Generator input that cannot describe a mesh.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Fracture probability outside `[0, 1]`.
    #[error("fracture probability {0} outside [0, 1]")]
    InvalidProbability(f64),
    /// Invalid configuration file or value.
    #[error("configuration error: {0}")]
    Config(String),
    /// A node set or side set member of the wrong kind.
    #[error("invalid member {key} of set {set}: {reason}")]
    SetMember {
        set: String,
        key: EntityKey,
        reason: String,
    },
    /// Malformed mesh file contents.
    #[error("mesh parse error: {0}")]
    MeshIoParse(String),
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MeshFractureError {
    fn from(err: std::io::Error) -> Self {
        MeshFractureError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MeshFractureError {
    fn from(err: serde_json::Error) -> Self {
        MeshFractureError::Config(err.to_string())
    }
}
