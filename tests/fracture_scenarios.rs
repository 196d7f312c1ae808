mod util;

use std::collections::BTreeSet;

use mesh_fracture::prelude::*;
use util::{
    element_nodes, exodus_bytes, fracture, initialized, interior_boundary, key, shared_boundary,
};

fn quads(nx: usize, ny: usize) -> InMemoryEntityStore {
    structured_box_2d(
        nx,
        ny,
        [0.0; 2],
        [nx as f64, ny as f64],
        StructuredCellType::Quadrilateral,
    )
    .unwrap()
}

fn coords(store: &InMemoryEntityStore, nodes: &BTreeSet<EntityKey>) -> BTreeSet<Vec<u64>> {
    nodes
        .iter()
        .map(|&n| store.coordinates(n).unwrap().iter().map(|x| x.to_bits()).collect())
        .collect()
}

#[test]
fn no_fracture_without_probability() {
    let store = quads(2, 2);
    let before = exodus_bytes(&store);
    let mut topology = initialized(store);
    let connectivity = topology.connectivity().clone();

    let (summary, open) = fracture(&mut topology, BernoulliCriterion::new(42), 0.0);
    assert_eq!(open.count_open(), 0);
    assert_eq!(summary, FractureSummary::default());
    assert_eq!(topology.connectivity(), &connectivity);
    assert_eq!(exodus_bytes(topology.store()), before);
}

#[test]
fn single_crack_between_two_quads() {
    let mut topology = initialized(quads(2, 1));
    let crack = shared_boundary(topology.store(), [key(7), key(8)]);

    let (summary, open) = fracture(&mut topology, ForcedCriterion::new([crack]), 1.0);
    assert_eq!(summary.open_nodes, 2);
    assert_eq!((summary.new_edges, summary.new_nodes, summary.new_faces), (1, 2, 0));
    assert!(!open.is_open(crack));

    let store = topology.store();
    assert_eq!(store.count(EntityRank::NODE), 8);
    let left = element_nodes(store, key(7));
    let right = element_nodes(store, key(8));
    assert!(left.is_disjoint(&right));
    assert_eq!(left.len(), 4);
    assert_eq!(right.len(), 4);
    // the copies sit where the originals did
    let shared = [vec![1.0f64, 0.0], vec![1.0, 1.0]]
        .map(|c| c.iter().map(|x| x.to_bits()).collect::<Vec<_>>());
    for side in [&left, &right] {
        let at = coords(store, side);
        assert!(shared.iter().all(|c| at.contains(c)));
    }
}

#[test]
fn single_face_between_two_hexes() {
    let store = structured_box_3d(1, 1, 2, [0.0; 3], [1.0, 1.0, 2.0]).unwrap();
    let mut topology = initialized(store);
    let face = shared_boundary(topology.store(), [key(13), key(14)]);

    let (summary, _) = fracture(&mut topology, ForcedCriterion::new([face]), 1.0);
    assert_eq!(summary.open_nodes, 4);
    assert_eq!((summary.new_faces, summary.new_edges, summary.new_nodes), (1, 4, 4));

    let store = topology.store();
    let bottom = element_nodes(store, key(13));
    let top = element_nodes(store, key(14));
    assert_eq!((bottom.len(), top.len()), (8, 8));
    assert!(bottom.is_disjoint(&top));
    // topologically disjoint, geometrically coincident at z = 1
    let interface = |nodes: &BTreeSet<EntityKey>| -> BTreeSet<Vec<u64>> {
        coords(store, nodes)
            .into_iter()
            .filter(|c| f64::from_bits(c[2]) == 1.0)
            .collect()
    };
    assert_eq!(interface(&bottom).len(), 4);
    assert_eq!(interface(&bottom), interface(&top));
}

#[test]
fn corner_element_breaks_off() {
    let store = structured_box_3d(2, 2, 2, [0.0; 3], [2.0; 3]).unwrap();
    let mut topology = initialized(store);
    let corner = key(28);
    let faces: Vec<EntityKey> = [key(29), key(30), key(32)]
        .into_iter()
        .map(|n| shared_boundary(topology.store(), [corner, n]))
        .collect();

    let (summary, open) = fracture(&mut topology, ForcedCriterion::new(faces), 1.0);
    assert_eq!(summary.open_nodes, 7);
    assert_eq!((summary.new_faces, summary.new_edges, summary.new_nodes), (3, 9, 7));
    assert_eq!(open.open_of_rank(topology.store(), EntityRank::NODE), vec![]);

    let store = topology.store();
    let corner_nodes = element_nodes(store, corner);
    for other in 29..=35 {
        assert!(corner_nodes.is_disjoint(&element_nodes(store, key(other))), "element {other}");
    }
    let unit_cube: BTreeSet<Vec<u64>> = (0..8)
        .map(|i| {
            [i & 1, (i >> 1) & 1, (i >> 2) & 1]
                .iter()
                .map(|&b| (b as f64).to_bits())
                .collect()
        })
        .collect();
    assert_eq!(coords(store, &corner_nodes), unit_cube);
    // the centroid stays with the other seven elements
    for other in 29..=35 {
        assert!(element_nodes(store, key(other)).contains(&key(14)));
    }
}

#[test]
fn centroid_splits_once_per_element() {
    let store = structured_box_3d(2, 2, 2, [0.0; 3], [2.0; 3]).unwrap();
    let mut topology = initialized(store);
    let faces = interior_boundary(topology.store());
    assert_eq!(faces.len(), 12);

    let (summary, _) = fracture(&mut topology, ForcedCriterion::new(faces), 1.0);
    assert_eq!((summary.new_faces, summary.new_edges, summary.new_nodes), (12, 42, 37));

    let store = topology.store();
    assert_eq!(store.count(EntityRank::NODE), 64);
    let centre: Vec<u64> = [1.0f64; 3].iter().map(|x| x.to_bits()).collect();
    let mut at_centre = BTreeSet::new();
    for element in 28..=35 {
        let nodes = element_nodes(store, key(element));
        let here: Vec<_> = nodes
            .iter()
            .filter(|&&n| coords(store, &BTreeSet::from([n])).contains(&centre))
            .collect();
        assert_eq!(here.len(), 1, "element {element}");
        at_centre.insert(*here[0]);
        for other in element + 1..=35 {
            assert!(nodes.is_disjoint(&element_nodes(store, key(other))));
        }
    }
    assert_eq!(at_centre.len(), 8);
    assert!(at_centre.contains(&key(14)));
}

#[test]
fn exterior_faces_never_open() {
    let mut topology = initialized(single_tetrahedron().unwrap());
    let faces = topology.store().entities(EntityRank::FACE);
    assert_eq!(faces.len(), 4);

    let (summary, open) = fracture(&mut topology, ForcedCriterion::new(faces), 1.0);
    assert_eq!(open.count_open(), 0);
    assert_eq!(summary, FractureSummary::default());
    assert_eq!(topology.store().count(EntityRank::NODE), 4);
}

#[test]
fn same_seed_same_bytes() {
    let run = || {
        let mut topology = initialized(quads(2, 1));
        fracture(&mut topology, BernoulliCriterion::new(42), 0.5);
        exodus_bytes(topology.store())
    };
    assert_eq!(run(), run());
}
