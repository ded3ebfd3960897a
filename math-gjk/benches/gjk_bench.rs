use criterion::{Criterion, black_box, criterion_group, criterion_main};
use math_convex_hull::{ConvexHull3D, Vertex, testdata};
use math_gjk::{GjkConfig, Translated, closest, contact};

fn bench_distance(c: &mut Criterion) {
    let config = GjkConfig::default();
    let cloud = testdata::fibonacci_sphere_points(840, 1.0);
    let far = Translated::new(cloud.as_slice(), Vertex::new(2.5, 0.4, -0.3));

    c.bench_function("gjk_sphere_cloud_840_separated", |b| {
        b.iter(|| closest(black_box(&cloud), black_box(&far), &config))
    });

    // Hulls keep only the boundary points, so support queries get cheaper
    let points = testdata::cube_with_interior_points(2.0, 5000);
    let hull = ConvexHull3D::build(&points).unwrap();
    let moved = Translated::new(&hull, Vertex::new(3.0, 1.0, 0.0));

    c.bench_function("gjk_cube_cloud_5000", |b| {
        b.iter(|| closest(black_box(&points), black_box(&moved), &config))
    });
    c.bench_function("gjk_cube_hull_5000", |b| {
        b.iter(|| closest(black_box(&hull), black_box(&moved), &config))
    });
}

fn bench_penetration(c: &mut Criterion) {
    let config = GjkConfig::default();
    let a = testdata::icosahedron_vertices();
    let b = testdata::icosahedron_vertices()
        .into_iter()
        .map(|v| v.add(&Vertex::new(0.7, 0.2, 0.1)))
        .collect::<Vec<_>>();

    c.bench_function("gjk_icosahedron_contact", |bench| {
        bench.iter(|| contact(black_box(&a), black_box(&b), &config))
    });
}

criterion_group!(benches, bench_distance, bench_penetration);
criterion_main!(benches);
