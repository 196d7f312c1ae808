//! `Topology`: the fracture driver.
//!
//! A `Topology` owns the entity store and the element→node connectivity
//! cache and runs one fracture episode:
//!
//! 1. [`Topology::graph_initialization`] builds the cell complex and trims
//!    it to adjacent-rank relations;
//! 2. [`Topology::mark_open`] marks internal boundaries open;
//! 3. inside a modification window, [`Topology::fracture_boundary`] clones
//!    open faces, splits open edges and splits open nodes, then
//!    [`Topology::graph_cleanup`] restores element→node relations.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::config::FractureConfig;
use crate::fracture::connectivity::ConnectivityCache;
use crate::fracture::criterion::{BernoulliCriterion, FractureCriterion};
use crate::fracture::graph::{build_full_adjacency, capture_and_trim, graph_cleanup};
use crate::fracture::graphviz::write_mesh_graphviz;
use crate::fracture::marker::FractureMarker;
use crate::fracture::open::EntityOpenMap;
use crate::fracture::star::star;
use crate::fracture::subgraph::Subgraph;
use crate::fracture::surgery::ArticulationSplit;
use crate::io::exodus;
use crate::mesh_error::MeshFractureError;
use crate::topology::in_memory::InMemoryEntityStore;
use crate::topology::point::EntityKey;
use crate::topology::rank::EntityRank;
use crate::topology::store::EntityStore;
use crate::topology::validation::{TopologyValidationOptions, validate_topology};

/// Entities created by one call to [`Topology::fracture_boundary`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FractureSummary {
    /// Open nodes visited by the sweep.
    pub open_nodes: usize,
    pub new_nodes: usize,
    pub new_edges: usize,
    /// Always 0 in 2D.
    pub new_faces: usize,
}

/// Mesh topology with fracture support.
#[derive(Debug)]
pub struct Topology<S: EntityStore> {
    store: S,
    connectivity: ConnectivityCache,
    output_mesh: Option<PathBuf>,
    validation: TopologyValidationOptions,
}

impl<S: EntityStore> Topology<S> {
    pub fn new(store: S) -> Result<Self, MeshFractureError> {
        let dim = store.dimension();
        if !(2..=3).contains(&dim) {
            return Err(MeshFractureError::UnsupportedDimension(dim));
        }
        Ok(Topology {
            store,
            connectivity: ConnectivityCache::default(),
            output_mesh: None,
            validation: TopologyValidationOptions::default(),
        })
    }

    /// Checks run on the cell complex at the end of [`Self::graph_initialization`].
    pub fn with_validation(mut self, options: TopologyValidationOptions) -> Self {
        self.validation = options;
        self
    }

    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable store access; must not be used between marking and the end
    /// of [`Self::fracture_boundary`].
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn connectivity(&self) -> &ConnectivityCache {
        &self.connectivity
    }

    pub fn output_mesh(&self) -> Option<&Path> {
        self.output_mesh.as_deref()
    }

    pub fn modification_begin(&mut self) -> Result<(), MeshFractureError> {
        self.store.begin_modification()
    }

    pub fn modification_end(&mut self) -> Result<(), MeshFractureError> {
        self.store.end_modification()
    }

    /// Build the full cell complex, snapshot connectivity, and trim
    /// relations that skip a rank. Opens and closes its own window.
    pub fn graph_initialization(&mut self) -> Result<(), MeshFractureError> {
        self.store.begin_modification()?;
        build_full_adjacency(&mut self.store)?;
        self.connectivity = capture_and_trim(&mut self.store)?;
        self.store.end_modification()?;
        validate_topology(&self.store, self.validation)?;
        log::info!(
            "cell complex ready: {} elements, {} faces, {} edges, {} nodes",
            self.connectivity.len(),
            self.count(EntityRank::FACE),
            self.count(EntityRank::EDGE),
            self.count(EntityRank::NODE)
        );
        Ok(())
    }

    fn count(&self, rank: EntityRank) -> usize {
        if rank.as_usize() > self.dimension() {
            0
        } else {
            self.store.entities(rank).len()
        }
    }

    /// Mark internal codimension-1 entities open with `criterion`.
    pub fn mark_open<C: FractureCriterion>(
        &self,
        criterion: C,
        probability: f64,
    ) -> Result<EntityOpenMap, MeshFractureError> {
        FractureMarker::new(criterion, probability)?.mark_open(&self.store)
    }

    /// Run surgery for every open node, in ascending key order.
    ///
    /// For each open node, every open edge above it has its open faces
    /// cloned (3D only) and is then split; finally the node itself is split
    /// and the connectivity cache follows the new node copies. Must run
    /// inside a modification window.
    pub fn fracture_boundary(
        &mut self,
        open: &mut EntityOpenMap,
    ) -> Result<FractureSummary, MeshFractureError> {
        if !self.store.in_modification() {
            return Err(MeshFractureError::OutsideModification("fracture_boundary"));
        }
        let dim = self.dimension();
        let before = [
            self.count(EntityRank::NODE),
            self.count(EntityRank::EDGE),
            self.count(EntityRank::FACE),
        ];

        let mut nodes = Vec::new();
        for node in open.open_of_rank(&self.store, EntityRank::NODE) {
            if self.store.is_owned(node)? {
                nodes.push(node);
            }
        }

        for &node in &nodes {
            self.fracture_node(node, open)?;
        }

        let summary = FractureSummary {
            open_nodes: nodes.len(),
            new_nodes: self.count(EntityRank::NODE) - before[0],
            new_edges: self.count(EntityRank::EDGE) - before[1],
            new_faces: if dim == 3 {
                self.count(EntityRank::FACE) - before[2]
            } else {
                0
            },
        };
        log::info!(
            "fracture created {} nodes, {} edges, {} faces from {} open nodes",
            summary.new_nodes,
            summary.new_edges,
            summary.new_faces,
            summary.open_nodes
        );
        Ok(summary)
    }

    /// Surgery around one open node: clone the open faces (3D) and split
    /// every open edge above `node`, then split `node` itself.
    ///
    /// Returns the node split; `new_entities` is empty when the node still
    /// has a single component. Must run inside a modification window.
    pub fn fracture_node(
        &mut self,
        node: EntityKey,
        open: &mut EntityOpenMap,
    ) -> Result<ArticulationSplit, MeshFractureError> {
        if !self.store.in_modification() {
            return Err(MeshFractureError::OutsideModification("fracture_node"));
        }
        let segments: Vec<EntityKey> = self
            .store
            .parents_of_rank(node, EntityRank::EDGE)
            .into_iter()
            .filter(|&s| open.is_open(s))
            .collect();
        for segment in segments {
            self.split_segment(segment, open)?;
        }
        let split = self.split_node(node, open)?;

        #[cfg(feature = "strict-invariants")]
        crate::topology::validation::validate_adjacent_ranks(&self.store)?;

        Ok(split)
    }

    fn split_segment(&mut self, segment: EntityKey, open: &mut EntityOpenMap) -> Result<(), MeshFractureError> {
        let faces: Vec<EntityKey> = if self.dimension() == 3 {
            self.store
                .parents_of_rank(segment, EntityRank::FACE)
                .into_iter()
                .filter(|&f| open.is_open(f))
                .collect()
        } else {
            Vec::new()
        };
        let star = star(&self.store, segment)?;
        let mut graph = Subgraph::from_star(&mut self.store, &star)?;
        for face in faces {
            let v = graph.global_to_local(face)?;
            graph.clone_boundary_entity(v, open)?;
        }
        let v = graph.global_to_local(segment)?;
        graph.split_articulation_point(v, open)?;
        Ok(())
    }

    fn split_node(
        &mut self,
        node: EntityKey,
        open: &mut EntityOpenMap,
    ) -> Result<ArticulationSplit, MeshFractureError> {
        let star = star(&self.store, node)?;
        let mut graph = Subgraph::from_star(&mut self.store, &star)?;
        let v = graph.global_to_local(node)?;
        let split = graph.split_articulation_point(v, open)?;
        for (&element, &copy) in &split.replacements {
            self.connectivity.replace_node(element, node, copy)?;
        }
        for &copy in &split.new_entities {
            self.store.copy_entity_fields(node, copy)?;
            self.store.copy_set_membership(node, copy)?;
        }
        Ok(split)
    }

    /// Destroy edges and faces and re-declare element→node relations from
    /// the connectivity cache. Must run inside a modification window.
    pub fn graph_cleanup(&mut self) -> Result<(), MeshFractureError> {
        graph_cleanup(&mut self.store, &self.connectivity)
    }

    /// `(identifier, rank, local id)` of every relation of `key`, optionally
    /// only those whose other end has `rank`.
    pub fn relation_report(
        &self,
        key: EntityKey,
        rank: Option<EntityRank>,
    ) -> Result<String, MeshFractureError> {
        let own_rank = self.store.rank(key)?;
        let mut out = format!("Relations for entity ({key},{own_rank}):\n");
        for rel in self.store.cone(key).into_iter().chain(self.store.support(key)) {
            let other = rel.other(key);
            let other_rank = self.store.rank(other)?;
            if rank.is_some_and(|r| r != other_rank) {
                continue;
            }
            out.push_str(&format!("  ({other},{other_rank}) local id {}\n", rel.local_id));
        }
        log::debug!("{out}");
        Ok(out)
    }

    /// Node list of every cached element, one element per line.
    pub fn connectivity_report(&self) -> String {
        let mut out = String::new();
        for record in self.connectivity.iter() {
            out.push_str(&format!(
                "Element {}: {}\n",
                record.element,
                record.nodes.iter().join(" ")
            ));
        }
        log::debug!("{out}");
        out
    }

    /// Write the current cell complex as GraphViz.
    pub fn output_to_graphviz<W: Write>(
        &self,
        open: &EntityOpenMap,
        out: &mut W,
    ) -> Result<(), MeshFractureError> {
        write_mesh_graphviz(&self.store, open, out)
    }
}

impl Topology<InMemoryEntityStore> {
    /// Read `input` and remember `output` for [`Self::write_output`].
    pub fn from_exodus(input: &Path, output: &Path) -> Result<Self, MeshFractureError> {
        let store = exodus::read_exodus_file(input)?;
        let mut topology = Topology::new(store)?;
        topology.output_mesh = Some(output.to_path_buf());
        Ok(topology)
    }

    /// Write the mesh to the output path given at construction.
    pub fn write_output(&self) -> Result<(), MeshFractureError> {
        let path = self
            .output_mesh
            .as_deref()
            .ok_or_else(|| MeshFractureError::Config("no output mesh path".into()))?;
        exodus::write_exodus_file(path, &self.store)
    }
}

/// Read, fracture with a seeded Bernoulli criterion, and write the mesh
/// named by `config`.
pub fn run(config: &FractureConfig) -> Result<FractureSummary, MeshFractureError> {
    config.validate()?;
    let mut topology = Topology::from_exodus(&config.input_mesh, &config.output_mesh)?;
    topology.graph_initialization()?;
    let mut open = topology.mark_open(BernoulliCriterion::new(config.seed), config.probability)?;

    topology.modification_begin()?;
    let summary = topology.fracture_boundary(&mut open)?;
    if let Some(path) = &config.graphviz_output {
        let mut out = BufWriter::new(File::create(path)?);
        topology.output_to_graphviz(&open, &mut out)?;
        out.flush()?;
    }
    topology.graph_cleanup()?;
    topology.modification_end()?;

    topology.write_output()?;
    Ok(summary)
}
