use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scene_viewer::mesh;

/// Benchmark: sphere tessellation across densities
fn bench_sphere_tessellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere_tessellation");

    for &(sectors, stacks) in &[(12u32, 6u32), (36, 18), (72, 36), (144, 72)] {
        group.bench_with_input(
            BenchmarkId::new("sectors_stacks", format!("{}x{}", sectors, stacks)),
            &(sectors, stacks),
            |b, &(sectors, stacks)| {
                b.iter(|| black_box(mesh::sphere(black_box(0.5), sectors, stacks)))
            },
        );
    }

    group.finish();
}

/// Benchmark: torus tessellation across densities
fn bench_torus_tessellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("torus_tessellation");

    for &(sectors, sides) in &[(12u32, 6u32), (36, 18), (72, 36), (144, 72)] {
        group.bench_with_input(
            BenchmarkId::new("sectors_sides", format!("{}x{}", sectors, sides)),
            &(sectors, sides),
            |b, &(sectors, sides)| {
                b.iter(|| black_box(mesh::torus(black_box(0.7), black_box(0.25), sectors, sides)))
            },
        );
    }

    group.finish();
}

/// Benchmark: the fixed-geometry builders the demo uses every startup
fn bench_fixed_meshes(c: &mut Criterion) {
    c.bench_function("pyramid", |b| b.iter(|| black_box(mesh::pyramid())));
    c.bench_function("cube", |b| b.iter(|| black_box(mesh::cube())));
    c.bench_function("light_cube", |b| b.iter(|| black_box(mesh::light_cube())));
}

criterion_group!(
    benches,
    bench_sphere_tessellation,
    bench_torus_tessellation,
    bench_fixed_meshes,
);

criterion_main!(benches);
