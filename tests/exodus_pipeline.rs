mod util;

use std::fs;
use std::path::PathBuf;

use mesh_fracture::fracture::driver::run;
use mesh_fracture::prelude::*;
use util::{element_nodes, exodus_bytes, fracture, initialized, key, shared_boundary};

const PAIR: &str = r#"EXODUS
DIM 2
NODES 6
1 0 0
2 1 0
3 2 0
4 0 1
5 1 1
6 2 1
ELEMENTS 2
7 Quadrilateral left 4 1 2 5 4
8 Quadrilateral right 4 2 3 6 5
FIELD damage 2 6
1 0 0.5
2 1 0.5
3 2 0.5
4 0 1.5
5 1 1.5
6 2 1.5
END
"#;

const PAIR_WITH_SETS: &str = r#"EXODUS
DIM 2
NODES 6
1 0 0
2 1 0
3 2 0
4 0 1
5 1 1
6 2 1
ELEMENTS 2
7 Quadrilateral left 4 1 2 5 4
8 Quadrilateral right 4 2 3 6 5
NODESET interface 2
2
5
NODESET west 2
1
4
SIDESET south 2
7 0
8 0
END
"#;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mesh-fracture-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn reader_and_writer_agree() {
    let store = ExodusReader.read(PAIR.as_bytes()).expect("read exodus");
    assert_eq!(store.block(key(7)), Some("left"));
    assert_eq!(store.field("damage").unwrap().components(), 2);
    assert_eq!(String::from_utf8(exodus_bytes(&store)).unwrap(), PAIR);
}

#[test]
fn pipeline_from_config() {
    let input = scratch("pair_in.exo");
    let output = scratch("pair_out.exo");
    let dot = scratch("pair.dot");
    fs::write(&input, PAIR).unwrap();

    let mut config = FractureConfig::new(&input, &output);
    config.probability = 1.0;
    config.graphviz_output = Some(dot.clone());
    let summary = run(&config).expect("fracture run");
    assert_eq!((summary.new_edges, summary.new_nodes), (1, 2));

    let written = fs::read_to_string(&output).unwrap();
    let store = ExodusReader.read(written.as_bytes()).unwrap();
    assert_eq!(store.count(EntityRank::NODE), 8);
    assert_eq!(store.block(key(8)), Some("right"));
    let damage = store.field("damage").unwrap();
    assert_eq!(damage.len(), 8);

    let graph = fs::read_to_string(&dot).unwrap();
    assert!(graph.starts_with("digraph mesh {"));
    assert!(graph.contains("[label=\"Element 7\""));
    assert!(graph.ends_with('}'));

    // a second run over the same input is byte-identical
    run(&config).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), written);
}

#[test]
fn missing_input_is_an_io_error() {
    let config = FractureConfig::new(scratch("does_not_exist.exo"), scratch("never.exo"));
    assert!(matches!(run(&config), Err(MeshFractureError::Io(_))));
}

#[test]
fn config_file_round_trip() {
    let path = scratch("config.json");
    let mut config = FractureConfig::new("in.exo", "out.exo");
    config.seed = 7;
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    assert_eq!(FractureConfig::from_json_file(&path).unwrap(), config);
}

#[test]
fn split_nodes_join_the_sets_of_their_original() {
    let store = ExodusReader.read(PAIR_WITH_SETS.as_bytes()).unwrap();
    let mut topology = initialized(store);
    let crack = shared_boundary(topology.store(), [key(7), key(8)]);
    let (summary, _) = fracture(&mut topology, ForcedCriterion::new([crack]), 1.0);
    assert_eq!(summary.new_nodes, 2);

    let store = topology.store();
    let interface = store.sets().node_set("interface").unwrap();
    assert_eq!(interface.len(), 4);
    for element in [key(7), key(8)] {
        let on_interface = element_nodes(store, element)
            .into_iter()
            .filter(|n| interface.contains(n))
            .count();
        assert_eq!(on_interface, 2, "element {element}");
    }
    let west: Vec<_> = store.sets().node_set("west").unwrap().iter().copied().collect();
    assert_eq!(west, vec![key(1), key(4)]);
    assert_eq!(store.sets().side_set("south").unwrap().len(), 2);

    let written = String::from_utf8(exodus_bytes(store)).unwrap();
    let again = ExodusReader.read(written.as_bytes()).unwrap();
    assert_eq!(again.sets(), store.sets());
}
