use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_convex_hull::{ConvexHull3D, testdata};

fn bench_sphere_hulls(c: &mut Criterion) {
    let mut group = c.benchmark_group("quickhull_fibonacci_sphere");
    for n in [180, 840, 5100] {
        let vertices = testdata::fibonacci_sphere_points(n, 1.0);
        group.bench_with_input(BenchmarkId::from_parameter(n), &vertices, |b, v| {
            b.iter(|| ConvexHull3D::build(black_box(v)))
        });
    }
    group.finish();
}

fn bench_interior_points(c: &mut Criterion) {
    // Mostly interior points: dominated by point assignment and discard
    let vertices = testdata::cube_with_interior_points(2.0, 10_000);

    c.bench_function("quickhull_cube_10k_interior", |b| {
        b.iter(|| ConvexHull3D::build(black_box(&vertices)))
    });
}

criterion_group!(benches, bench_sphere_hulls, bench_interior_points);
criterion_main!(benches);
