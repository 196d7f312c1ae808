#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-fracture
//!
//! mesh-fracture splits a finite-element mesh along internal boundaries. It
//! turns an element→node mesh into an explicit cell complex (elements, faces,
//! edges, nodes with adjacent-rank relations), marks shared faces (3D) or
//! edges (2D) open with a pluggable criterion, and performs the topological
//! surgery that gives each side of an open boundary its own copy of every
//! shared face, edge and node.
//!
//! ## Features
//! - Rank-indexed entity store with bidirectional, deterministic adjacency
//! - Interpolation of intermediate edges and faces for tri/quad/tet/hex/prism meshes
//! - Subgraph views over an entity's upward star with mirrored mutation
//! - Articulation-point detection on an undirected projection
//! - GraphViz output of the cell complex and of single subgraphs
//! - Exodus-style ASCII mesh I/O and a JSON-configured command-line driver
//!
//! ## Determinism
//!
//! All randomized decisions use `SmallRng` seeds drawn from configuration so runs are
//! reproducible. Stores iterate in ascending key order, so two runs with the same
//! seed produce byte-identical output meshes.
//!
//! ## Usage
//!
//! ```no_run
//! use mesh_fracture::prelude::*;
//!
//! # fn main() -> Result<(), MeshFractureError> {
//! let store = structured_box_3d(2, 2, 2, [0.0; 3], [1.0; 3])?;
//! let mut topology = Topology::new(store)?;
//! topology.graph_initialization()?;
//! let mut open = topology.mark_open(BernoulliCriterion::new(42), 0.3)?;
//!
//! topology.modification_begin()?;
//! let summary = topology.fracture_boundary(&mut open)?;
//! topology.graph_cleanup()?;
//! topology.modification_end()?;
//! println!("{} new nodes", summary.new_nodes);
//! # Ok(())
//! # }
//! ```

pub mod algs;
pub mod config;
pub mod data;
pub mod fracture;
pub mod io;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::meshgen::{
        StructuredCellType, build_mesh, single_tetrahedron, structured_box_2d, structured_box_3d,
    };
    pub use crate::config::FractureConfig;
    pub use crate::data::section::Section;
    pub use crate::fracture::{
        BernoulliCriterion, ConnectivityCache, EntityOpenMap, ForcedCriterion, FractureCriterion,
        FractureMarker, FractureSummary, Subgraph, Topology,
    };
    pub use crate::io::exodus::{ExodusReader, ExodusWriter};
    pub use crate::io::{MeshReader, MeshWriter};
    pub use crate::mesh_error::MeshFractureError;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::in_memory::InMemoryEntityStore;
    pub use crate::topology::point::EntityKey;
    pub use crate::topology::rank::{EntityRank, LocalId};
    pub use crate::topology::sets::MeshSets;
    pub use crate::topology::store::{EntityStore, Relation};
}
