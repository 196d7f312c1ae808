use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mesh_fracture::prelude::*;

fn cube(n: usize) -> InMemoryEntityStore {
    structured_box_3d(n, n, n, [0.0; 3], [1.0; 3]).expect("structured hex box")
}

fn bench_graph_initialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_initialization");
    for &n in &[4usize, 8] {
        group.bench_with_input(BenchmarkId::new("hex_box", n), &n, |b, &n| {
            b.iter_batched(
                || cube(n),
                |store| {
                    let mut topology = Topology::new(store).expect("3D store");
                    topology.graph_initialization().expect("cell complex");
                    black_box(topology);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_fracture(c: &mut Criterion) {
    let mut group = c.benchmark_group("fracture_boundary");
    for &p in &[0.1f64, 0.5] {
        group.bench_with_input(BenchmarkId::new("hex_box_6", p), &p, |b, &p| {
            b.iter_batched(
                || {
                    let mut topology = Topology::new(cube(6)).expect("3D store");
                    topology.graph_initialization().expect("cell complex");
                    let open = topology
                        .mark_open(BernoulliCriterion::new(42), p)
                        .expect("valid probability");
                    (topology, open)
                },
                |(mut topology, mut open)| {
                    topology.modification_begin().expect("window");
                    let summary = topology.fracture_boundary(&mut open).expect("fracture");
                    topology.graph_cleanup().expect("cleanup");
                    topology.modification_end().expect("window");
                    black_box(summary);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph_initialization, bench_fracture);
criterion_main!(benches);
