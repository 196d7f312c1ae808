//! Exodus ASCII mesh reader/writer.
//!
//! ```text
//! EXODUS
//! DIM 2
//! NODES 4
//! 1 0 0
//! ...
//! ELEMENTS 1
//! 5 Quadrilateral block_1 4 1 2 4 3
//! FIELD temperature 1 4
//! 1 300
//! ...
//! NODESET left 2
//! 1
//! 3
//! SIDESET bottom 1
//! 5 0
//! END
//! ```
//!
//! `FIELD`, `NODESET` and `SIDESET` sections are optional and repeatable.
//! A side set entry is an element and its local side number (face in 3D,
//! edge in 2D). Output is deterministic: nodes, elements, fields and sets are
//! written in ascending key/name order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::{Lines, SplitWhitespace};

use itertools::Itertools;

use crate::io::{MeshReader, MeshWriter};
use crate::mesh_error::MeshFractureError;
use crate::topology::cell_type::CellType;
use crate::topology::in_memory::{COORDINATES, InMemoryEntityStore};
use crate::topology::point::EntityKey;
use crate::topology::rank::EntityRank;
use crate::topology::store::EntityStore;

/// Simple Exodus ASCII reader.
#[derive(Debug, Default, Clone)]
pub struct ExodusReader;

/// Simple Exodus ASCII writer.
#[derive(Debug, Default, Clone)]
pub struct ExodusWriter;

fn parse_error(msg: impl Into<String>) -> MeshFractureError {
    MeshFractureError::MeshIoParse(msg.into())
}

fn next_line<'a>(lines: &mut Lines<'a>, what: &str) -> Result<&'a str, MeshFractureError> {
    lines
        .by_ref()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| parse_error(format!("missing {what}")))
}

fn next_value<T: std::str::FromStr>(parts: &mut SplitWhitespace<'_>, what: &str) -> Result<T, MeshFractureError> {
    parts
        .next()
        .ok_or_else(|| parse_error(format!("missing {what}")))?
        .parse::<T>()
        .map_err(|_| parse_error(format!("invalid {what}")))
}

fn next_key(parts: &mut SplitWhitespace<'_>, what: &str) -> Result<EntityKey, MeshFractureError> {
    let id: u64 = next_value(parts, what)?;
    EntityKey::new(id).map_err(|_| parse_error(format!("invalid {what} {id}")))
}

/// Parse a `KEYWORD count` header line.
fn section_header(line: &str, keyword: &str) -> Result<usize, MeshFractureError> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some(keyword) {
        return Err(parse_error(format!("missing {keyword} section")));
    }
    next_value(&mut parts, &format!("{keyword} count"))
}

impl MeshReader for ExodusReader {
    fn read<R: Read>(&self, mut reader: R) -> Result<InMemoryEntityStore, MeshFractureError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut lines = contents.lines();

        if next_line(&mut lines, "exodus header")?.trim() != "EXODUS" {
            return Err(parse_error("invalid exodus header"));
        }
        let dim = section_header(next_line(&mut lines, "dimension line")?, "DIM")?;
        let mut store = InMemoryEntityStore::new(dim)
            .map_err(|_| parse_error(format!("unsupported mesh dimension: {dim}")))?;

        let node_count = section_header(next_line(&mut lines, "nodes header")?, "NODES")?;
        let mut coords = Vec::with_capacity(dim);
        for _ in 0..node_count {
            let mut parts = next_line(&mut lines, "node entry")?.split_whitespace();
            let key = next_key(&mut parts, "node id")?;
            coords.clear();
            for _ in 0..dim {
                coords.push(next_value::<f64>(&mut parts, "coordinate")?);
            }
            store.insert_node(key, &coords)?;
        }

        let element_count = section_header(next_line(&mut lines, "elements header")?, "ELEMENTS")?;
        for _ in 0..element_count {
            let mut parts = next_line(&mut lines, "element entry")?.split_whitespace();
            let key = next_key(&mut parts, "element id")?;
            let cell_type = CellType::from_token(
                parts.next().ok_or_else(|| parse_error("missing cell type"))?,
            )?;
            let block = parts.next().ok_or_else(|| parse_error("missing element block"))?;
            let count: usize = next_value(&mut parts, "element node count")?;
            let nodes = (0..count)
                .map(|_| next_key(&mut parts, "element node"))
                .collect::<Result<Vec<_>, _>>()?;
            store.insert_element(key, cell_type, &nodes, Some(block))?;
        }

        loop {
            let line = next_line(&mut lines, "END marker")?;
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("END") => break,
                Some("FIELD") => {
                    let name = parts.next().ok_or_else(|| parse_error("missing field name"))?;
                    if name == COORDINATES {
                        return Err(parse_error("coordinates cannot be given as a FIELD"));
                    }
                    let components: usize = next_value(&mut parts, "field components")?;
                    let count: usize = next_value(&mut parts, "field entry count")?;
                    let mut entries = Vec::with_capacity(count);
                    for _ in 0..count {
                        let mut parts = next_line(&mut lines, "field entry")?.split_whitespace();
                        let key = next_key(&mut parts, "field entity")?;
                        if !store.contains(key) {
                            return Err(MeshFractureError::UnknownEntity { key });
                        }
                        let values = (0..components)
                            .map(|_| next_value::<f64>(&mut parts, "field value"))
                            .collect::<Result<Vec<_>, _>>()?;
                        entries.push((key, values));
                    }
                    let section = store.add_field(name, components);
                    for (key, values) in entries {
                        section.try_set(key, &values)?;
                    }
                }
                Some("NODESET") => {
                    let name = parts.next().ok_or_else(|| parse_error("missing node set name"))?;
                    let count: usize = next_value(&mut parts, "node set count")?;
                    store.declare_node_set(name);
                    for _ in 0..count {
                        let mut parts = next_line(&mut lines, "node set entry")?.split_whitespace();
                        let node = next_key(&mut parts, "node set member")?;
                        store.add_to_node_set(name, node)?;
                    }
                }
                Some("SIDESET") => {
                    let name = parts.next().ok_or_else(|| parse_error("missing side set name"))?;
                    let count: usize = next_value(&mut parts, "side set count")?;
                    store.declare_side_set(name);
                    for _ in 0..count {
                        let mut parts = next_line(&mut lines, "side set entry")?.split_whitespace();
                        let element = next_key(&mut parts, "side set element")?;
                        let side = next_value(&mut parts, "side set side")?;
                        store.add_to_side_set(name, element, side)?;
                    }
                }
                other => return Err(parse_error(format!("unexpected section {other:?}"))),
            }
        }

        log::info!(
            "read {dim}D exodus mesh: {} nodes, {} elements",
            node_count,
            element_count
        );
        Ok(store)
    }
}

impl MeshWriter for ExodusWriter {
    fn write<W: Write>(&self, mut writer: W, store: &InMemoryEntityStore) -> Result<(), MeshFractureError> {
        let dim = store.dimension();
        writeln!(writer, "EXODUS")?;
        writeln!(writer, "DIM {dim}")?;

        let nodes = store.entities(EntityRank::NODE);
        writeln!(writer, "NODES {}", nodes.len())?;
        for node in &nodes {
            let coords = store
                .coordinates(*node)
                .ok_or_else(|| parse_error(format!("node {node} has no coordinates")))?;
            writeln!(writer, "{node} {}", coords.iter().join(" "))?;
        }

        let elements = store.entities(EntityRank::element(dim));
        writeln!(writer, "ELEMENTS {}", elements.len())?;
        for element in &elements {
            let cell_type = store
                .cell_type(*element)
                .ok_or_else(|| parse_error(format!("missing cell type for {element}")))?;
            let conn: Vec<EntityKey> = store
                .cone_of_rank(*element, EntityRank::NODE)
                .into_iter()
                .map(|r| r.dst)
                .collect();
            if conn.len() != cell_type.node_count() {
                return Err(MeshFractureError::CellVertexCount {
                    element: *element,
                    expected: cell_type.node_count(),
                    found: conn.len(),
                });
            }
            let block = store.block(*element).unwrap_or(crate::algs::meshgen::GENERATED_BLOCK);
            writeln!(
                writer,
                "{element} {} {block} {} {}",
                cell_type.token(),
                conn.len(),
                conn.iter().join(" ")
            )?;
        }

        for (name, section) in store.fields().filter(|(name, _)| *name != COORDINATES) {
            writeln!(writer, "FIELD {name} {} {}", section.components(), section.len())?;
            for (key, values) in section.iter() {
                writeln!(writer, "{key} {}", values.iter().join(" "))?;
            }
        }

        let sets = store.sets();
        for (name, members) in sets.node_sets() {
            writeln!(writer, "NODESET {name} {}", members.len())?;
            for node in members {
                writeln!(writer, "{node}")?;
            }
        }
        for (name, sides) in sets.side_sets() {
            writeln!(writer, "SIDESET {name} {}", sides.len())?;
            for (element, side) in sides {
                writeln!(writer, "{element} {side}")?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }
}

/// Read an Exodus ASCII file.
pub fn read_exodus_file(path: &Path) -> Result<InMemoryEntityStore, MeshFractureError> {
    let file = File::open(path)?;
    ExodusReader.read(BufReader::new(file))
}

/// Write `store` to an Exodus ASCII file, replacing it.
pub fn write_exodus_file(path: &Path, store: &InMemoryEntityStore) -> Result<(), MeshFractureError> {
    let mut writer = BufWriter::new(File::create(path)?);
    ExodusWriter.write(&mut writer, store)?;
    writer.flush()?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "EXODUS\nDIM 2\nNODES 4\n1 0 0\n2 1 0\n3 0 1\n4 1 1\nELEMENTS 1\n5 Quadrilateral left 4 1 2 4 3\nFIELD temperature 1 2\n1 300\n2 310.5\nEND\n";

    #[test]
    fn read_quad_with_field() {
        let store = ExodusReader.read(QUAD.as_bytes()).unwrap();
        let e = EntityKey::new(5).unwrap();
        assert_eq!(store.dimension(), 2);
        assert_eq!(store.count(EntityRank::NODE), 4);
        assert_eq!(store.cell_type(e), Some(CellType::Quadrilateral));
        assert_eq!(store.block(e), Some("left"));
        let n4 = EntityKey::new(4).unwrap();
        assert_eq!(store.coordinates(n4), Some(&[1.0, 1.0][..]));
        let t = store.field("temperature").unwrap();
        assert_eq!(t.try_restrict(EntityKey::new(2).unwrap()).unwrap(), &[310.5]);
        assert!(!t.contains(n4));
    }

    #[test]
    fn write_is_stable() {
        let store = ExodusReader.read(QUAD.as_bytes()).unwrap();
        let mut first = Vec::new();
        ExodusWriter.write(&mut first, &store).unwrap();
        let text = String::from_utf8(first.clone()).unwrap();
        assert_eq!(text, QUAD);

        let again = ExodusReader.read(first.as_slice()).unwrap();
        let mut second = Vec::new();
        ExodusWriter.write(&mut second, &again).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_input() {
        let bad_header = "MESH\nDIM 2\n";
        assert!(matches!(
            ExodusReader.read(bad_header.as_bytes()),
            Err(MeshFractureError::MeshIoParse(_))
        ));
        let bad_dim = "EXODUS\nDIM 1\nNODES 0\nELEMENTS 0\nEND\n";
        assert!(matches!(
            ExodusReader.read(bad_dim.as_bytes()),
            Err(MeshFractureError::MeshIoParse(_))
        ));
        let truncated = "EXODUS\nDIM 2\nNODES 2\n1 0 0\n";
        assert!(matches!(
            ExodusReader.read(truncated.as_bytes()),
            Err(MeshFractureError::MeshIoParse(_))
        ));
        let unknown_cell = "EXODUS\nDIM 2\nNODES 1\n1 0 0\nELEMENTS 1\n2 Pentagon b 1 1\nEND\n";
        assert!(ExodusReader.read(unknown_cell.as_bytes()).is_err());
        let no_end = "EXODUS\nDIM 2\nNODES 0\nELEMENTS 0\n";
        assert!(matches!(
            ExodusReader.read(no_end.as_bytes()),
            Err(MeshFractureError::MeshIoParse(_))
        ));
    }

    const SETS: &str = "EXODUS\nDIM 2\nNODES 4\n1 0 0\n2 1 0\n3 0 1\n4 1 1\nELEMENTS 1\n5 Quadrilateral left 4 1 2 4 3\nNODESET empty 0\nNODESET left 2\n1\n3\nSIDESET bottom 1\n5 0\nEND\n";

    #[test]
    fn node_and_side_sets_survive_a_round_trip() {
        let store = ExodusReader.read(SETS.as_bytes()).unwrap();
        let k = |raw| EntityKey::new(raw).unwrap();
        let left: Vec<_> = store.sets().node_set("left").unwrap().iter().copied().collect();
        assert_eq!(left, vec![k(1), k(3)]);
        assert!(store.sets().node_set("empty").unwrap().is_empty());
        assert!(store.sets().side_set("bottom").unwrap().contains(&(k(5), 0)));

        let mut out = Vec::new();
        ExodusWriter.write(&mut out, &store).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), SETS);
    }

    #[test]
    fn bad_set_members() {
        let element_in_node_set = SETS.replace("NODESET left 2\n1\n", "NODESET left 2\n5\n");
        assert!(matches!(
            ExodusReader.read(element_in_node_set.as_bytes()),
            Err(MeshFractureError::SetMember { .. })
        ));
        let side_out_of_range = SETS.replace("5 0\nEND", "5 4\nEND");
        assert!(matches!(
            ExodusReader.read(side_out_of_range.as_bytes()),
            Err(MeshFractureError::SetMember { .. })
        ));
        let unknown_node = SETS.replace("1\n3\nSIDESET", "1\n9\nSIDESET");
        assert!(matches!(
            ExodusReader.read(unknown_node.as_bytes()),
            Err(MeshFractureError::UnknownEntity { .. })
        ));
    }

    #[test]
    fn element_with_missing_node() {
        let text = "EXODUS\nDIM 2\nNODES 2\n1 0 0\n2 1 0\nELEMENTS 1\n3 Triangle b 3 1 2 9\nEND\n";
        assert_eq!(
            ExodusReader.read(text.as_bytes()).unwrap_err(),
            MeshFractureError::UnknownEntity { key: EntityKey::new(9).unwrap() }
        );
    }
}
