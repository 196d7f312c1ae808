//! GraphViz `.dot` output of the cell complex or of a single subgraph.
//!
//! Nodes are named `"<key>_<rank>"` and filled by rank and openness using
//! the `paired12` colour scheme (open entities take the odd index, closed
//! ones the even index after it). Edges are coloured by local id. Render
//! with `dot -Tpng mesh.dot -o mesh.png`.

use std::io::Write;

use crate::fracture::open::EntityOpenMap;
use crate::fracture::subgraph::Subgraph;
use crate::mesh_error::MeshFractureError;
use crate::topology::point::EntityKey;
use crate::topology::rank::{EntityRank, LocalId};
use crate::topology::store::EntityStore;

const HEADER: &str = "digraph mesh {\n  node [colorscheme=paired12]\n  edge [colorscheme=paired12]\n";
const EDGE_COLORS: [u8; 6] = [6, 4, 2, 8, 10, 12];

/// Label prefix for an entity of `rank` in a mesh of dimension `dim`.
pub fn entity_label(rank: EntityRank, dim: usize) -> &'static str {
    if rank == EntityRank::element(dim) {
        return "Element";
    }
    match rank {
        EntityRank::NODE => "Node",
        EntityRank::EDGE => "Segment",
        _ => "Face",
    }
}

/// `paired12` fill colour for an entity.
pub fn fill_color(rank: EntityRank, dim: usize, open: bool) -> u8 {
    let closed = match entity_label(rank, dim) {
        "Face" => 2,
        "Segment" => 4,
        "Node" => 6,
        _ => 8,
    };
    if open { closed - 1 } else { closed }
}

/// `paired12` colour of a relation with `local_id`.
pub fn edge_color(local_id: LocalId) -> u8 {
    EDGE_COLORS[(local_id % 6) as usize]
}

fn write_entity<W: Write>(
    out: &mut W,
    key: EntityKey,
    rank: EntityRank,
    dim: usize,
    open: bool,
) -> Result<(), MeshFractureError> {
    writeln!(
        out,
        "  \"{key}_{rank}\" [label=\"{} {key}\",style=filled,fillcolor=\"{}\"]",
        entity_label(rank, dim),
        fill_color(rank, dim, open)
    )?;
    Ok(())
}

fn write_relation<W: Write>(
    out: &mut W,
    (src, src_rank): (EntityKey, EntityRank),
    (dst, dst_rank): (EntityKey, EntityRank),
    local_id: LocalId,
) -> Result<(), MeshFractureError> {
    writeln!(
        out,
        "  \"{src}_{src_rank}\" -> \"{dst}_{dst_rank}\" [color=\"{}\"]",
        edge_color(local_id)
    )?;
    Ok(())
}

/// Write every entity (highest rank first) followed by every downward relation.
pub fn write_mesh_graphviz<S: EntityStore, W: Write>(
    store: &S,
    open: &EntityOpenMap,
    out: &mut W,
) -> Result<(), MeshFractureError> {
    let dim = store.dimension();
    out.write_all(HEADER.as_bytes())?;
    let mut relations = Vec::new();
    for rank in (0..=dim as u8).rev().map(EntityRank::new) {
        for key in store.entities(rank) {
            write_entity(out, key, rank, dim, open.is_open(key))?;
            for rel in store.cone(key) {
                relations.push((key, rank, rel.dst, store.rank(rel.dst)?, rel.local_id));
            }
        }
    }
    for (src, src_rank, dst, dst_rank, local_id) in relations {
        write_relation(out, (src, src_rank), (dst, dst_rank), local_id)?;
    }
    out.write_all(b"}")?;
    Ok(())
}

/// Write the vertices of `graph`, each followed by its out-edges.
pub fn write_subgraph_graphviz<S: EntityStore, W: Write>(
    graph: &Subgraph<'_, S>,
    open: &EntityOpenMap,
    out: &mut W,
) -> Result<(), MeshFractureError> {
    let dim = graph.store().dimension();
    out.write_all(HEADER.as_bytes())?;
    for v in graph.vertices() {
        let key = graph.local_to_global(v)?;
        let rank = graph.vertex_rank(v)?;
        write_entity(out, key, rank, dim, open.is_open(key))?;
        for (edge, local_id) in graph.out_edges(v)? {
            let target = (graph.local_to_global(edge.target)?, graph.vertex_rank(edge.target)?);
            write_relation(out, (key, rank), target, local_id)?;
        }
    }
    out.write_all(b"}")?;
    Ok(())
}
