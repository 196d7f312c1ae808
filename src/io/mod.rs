//! Mesh I/O for entity stores.
//!
//! Readers produce an [`InMemoryEntityStore`] holding nodes, elements and
//! nodal fields; writers serialize one back. Edges and faces are never
//! written: a store is expected to be cleaned up (elements pointing at
//! nodes only) before output.

pub mod exodus;

use crate::mesh_error::MeshFractureError;
use crate::topology::in_memory::InMemoryEntityStore;
use std::io::{Read, Write};

/// Trait for mesh readers that produce an entity store.
pub trait MeshReader {
    /// Parse a mesh from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<InMemoryEntityStore, MeshFractureError>;
}

/// Trait for mesh writers that serialize an entity store.
pub trait MeshWriter {
    /// Write the mesh to a writer.
    fn write<W: Write>(&self, writer: W, store: &InMemoryEntityStore) -> Result<(), MeshFractureError>;
}
