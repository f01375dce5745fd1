//! Benchmarks for mesh operations.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use polyforge::prelude::*;

fn sphere(segments: usize, rings: usize) -> Mesh {
    SphereBuilder::default()
        .with_segment_count(segments)
        .with_ring_count(rings)
        .build()
        .unwrap()
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function("sphere_64x32", |b| b.iter(|| sphere(64, 32)));

    let mesh = sphere(64, 32);
    c.bench_function("mesh_data_64x32", |b| {
        b.iter(|| MeshData::from_mesh(&mesh).to_mesh::<u32>().unwrap())
    });
}

fn bench_editing(c: &mut Criterion) {
    let mesh = sphere(64, 32);
    // A meridian edge crosses the quad band around the equator.
    let edge = mesh
        .edge_ids()
        .find(|&e| find_belt(&mesh, e).len() == 64)
        .unwrap();

    c.bench_function("loop_cut_sphere_64x32", |b| {
        b.iter_batched(
            || mesh.clone(),
            |mut mesh| {
                loop_cut(&mut mesh, edge, 0.5);
                mesh
            },
            BatchSize::SmallInput,
        )
    });

    let mut cut = mesh.clone();
    for _ in 0..8 {
        let belt_edge = cut
            .edge_ids()
            .find(|&e| find_belt(&cut, e).len() == 64)
            .unwrap();
        loop_cut(&mut cut, belt_edge, 0.5);
    }
    c.bench_function("collect_garbage_after_cuts", |b| b.iter(|| cut.collect_garbage()));
}

fn bench_queries(c: &mut Criterion) {
    let mesh = sphere(128, 64);

    c.bench_function("face_normals_sequential", |b| b.iter(|| mesh.face_normals(false)));
    c.bench_function("face_normals_parallel", |b| b.iter(|| mesh.face_normals(true)));

    c.bench_function("find_loop_all_edges", |b| {
        b.iter(|| {
            mesh.edge_ids()
                .map(|e| find_loop(&mesh, e).len())
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_construction, bench_editing, bench_queries);
criterion_main!(benches);
