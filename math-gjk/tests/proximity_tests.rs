//! Integration tests for GJK distance, intersection and penetration depth
//!
//! Distances are checked against a brute force minimum over all triangles of
//! the Minkowski difference; intersection is checked against its convex hull.

use approx::assert_relative_eq;
use math_convex_hull::{ConvexHull3D, Vertex, closest_point_on_triangle, testdata};
use math_gjk::{Contact, GjkConfig, GjkError, Translated, closest, contact, distance, penetration};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_cloud(rng: &mut StdRng, n: usize, center: Vertex) -> Vec<Vertex> {
    (0..n)
        .map(|_| {
            Vertex::new(
                center.x + rng.random_range(-1.0..1.0),
                center.y + rng.random_range(-1.0..1.0),
                center.z + rng.random_range(-1.0..1.0),
            )
        })
        .collect()
}

fn random_direction(rng: &mut StdRng) -> Vertex {
    loop {
        let v = Vertex::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if let Some(d) = v.try_normalize() {
            return d;
        }
    }
}

fn minkowski_difference(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    a.iter()
        .flat_map(|p| b.iter().map(move |q| p.sub(q)))
        .collect()
}

/// Distance between the hulls of `a` and `b`, assuming they are disjoint
///
/// Repeated indices cover the segments and points of the difference.
fn brute_force_distance(a: &[Vertex], b: &[Vertex]) -> f64 {
    let d = minkowski_difference(a, b);
    let origin = Vertex::zero();
    let mut best = f64::INFINITY;
    for i in 0..d.len() {
        for j in i..d.len() {
            for k in j..d.len() {
                let proj = closest_point_on_triangle(&origin, &d[i], &d[j], &d[k]);
                best = best.min(proj.point.magnitude());
            }
        }
    }
    best
}

#[test]
fn test_unit_cubes_three_apart() {
    init_logging();
    let a = testdata::cube_vertices(1.0);
    let b = testdata::cube_vertices_at(1.0, Vertex::new(3.0, 0.0, 0.0));

    let result = closest(&a, &b, &GjkConfig::default()).unwrap();
    assert!(!result.intersecting);
    assert_relative_eq!(result.distance, 2.0, epsilon = 1e-12);
    assert_relative_eq!(result.point1.x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(result.point2.x, 2.5, epsilon = 1e-12);
}

#[test]
fn test_unit_cubes_half_apart() {
    init_logging();
    let a = testdata::cube_vertices(1.0);
    let b = testdata::cube_vertices_at(1.0, Vertex::new(0.5, 0.0, 0.0));
    let config = GjkConfig::default();

    let result = closest(&a, &b, &config).unwrap();
    assert!(result.intersecting);

    let p = penetration(&a, &b, &result.simplex, &config).unwrap();
    assert_relative_eq!(p.depth, 0.5, epsilon = 1e-9);
    assert_relative_eq!(p.normal.x.abs(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(p.normal.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(p.normal.z, 0.0, epsilon = 1e-9);
}

#[test]
fn test_distance_matches_brute_force() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    let config = GjkConfig::default();

    for trial in 0..60 {
        let n1 = rng.random_range(1..=8);
        let n2 = rng.random_range(1..=8);
        // Boxes of half-width 1 with centres 3.5 apart never overlap
        let offset = random_direction(&mut rng).scale(3.5 + rng.random_range(0.0..2.0));
        let a = random_cloud(&mut rng, n1, Vertex::zero());
        let b = random_cloud(&mut rng, n2, offset);

        let result = closest(&a, &b, &config).unwrap();
        let expected = brute_force_distance(&a, &b);

        assert!(!result.intersecting, "trial {trial}");
        assert_relative_eq!(result.distance, expected, max_relative = 1e-7);
        assert_relative_eq!(
            result.point1.distance(&result.point2),
            result.distance,
            max_relative = 1e-7
        );
    }
}

#[test]
fn test_intersection_agrees_with_hull() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(11);
    let config = GjkConfig::default();
    let mut checked = (0, 0);

    for trial in 0..80 {
        let offset = random_direction(&mut rng).scale(rng.random_range(0.0..3.0));
        let a = random_cloud(&mut rng, 6, Vertex::zero());
        let b = random_cloud(&mut rng, 6, offset);

        let minkowski = ConvexHull3D::build(&minkowski_difference(&a, &b)).unwrap();
        let depth = (0..minkowski.num_faces())
            .map(|i| minkowski.face_plane(i).1)
            .fold(f64::INFINITY, f64::min);

        let result = closest(&a, &b, &config).unwrap();
        if depth > 1e-6 {
            assert!(result.intersecting, "trial {trial}: origin {depth:e} inside");
            checked.0 += 1;
        } else if depth < -1e-6 {
            assert!(!result.intersecting, "trial {trial}: origin outside");
            let (expected, _) = minkowski.closest_point(&Vertex::zero());
            assert_relative_eq!(result.distance, expected, max_relative = 1e-7);
            checked.1 += 1;
        }
    }

    assert!(checked.0 > 0 && checked.1 > 0, "{checked:?}");
}

#[test]
fn test_translation_separates_sets() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(23);
    let config = GjkConfig::default();
    let mut refined = 0;

    for trial in 0..40 {
        let offset = random_direction(&mut rng).scale(rng.random_range(0.0..0.6));
        let a = random_cloud(&mut rng, 8, Vertex::zero());
        let b = random_cloud(&mut rng, 8, offset);

        let p = match contact(&a, &b, &config) {
            Ok(Contact::Penetrating(p)) => p,
            Ok(Contact::Separated { .. }) | Err(GjkError::Inconclusive { .. }) => continue,
            Err(e) => panic!("trial {trial}: {e}"),
        };
        assert!(p.depth > 0.0);
        refined += 1;

        let t = p.translation();
        let apart = Translated::new(b.as_slice(), t.scale(1.01));
        let result = closest(&a, &apart, &config).unwrap();
        assert!(!result.intersecting, "trial {trial}: still overlapping");
        assert_relative_eq!(result.distance, 0.01 * p.depth, max_relative = 1e-6);

        let still = Translated::new(b.as_slice(), t.scale(0.99));
        assert!(closest(&a, &still, &config).unwrap().intersecting);
    }

    assert!(refined > 10);
}

#[test]
fn test_touching_cubes_are_inconclusive() {
    init_logging();
    let a = testdata::cube_vertices(1.0);
    let b = testdata::cube_vertices_at(1.0, Vertex::new(1.0, 0.0, 0.0));

    assert_eq!(distance(&a, &b).unwrap(), 0.0);
    let err = contact(&a, &b, &GjkConfig::default()).unwrap_err();
    assert!(err.is_inconclusive(), "got {err:?}");
}

#[test]
fn test_identical_sets() {
    init_logging();
    let a = testdata::cube_vertices(1.0);
    match contact(&a, &a, &GjkConfig::default()).unwrap() {
        Contact::Penetrating(p) => {
            assert_relative_eq!(p.depth, 1.0, epsilon = 1e-9);
            assert!(p.point1.x.is_finite() && p.point2.x.is_finite());
        }
        other => panic!("expected penetration, got {other:?}"),
    }
}

#[test]
fn test_hulls_and_translated_shapes() {
    init_logging();
    let sphere = testdata::fibonacci_sphere_points(300, 1.0);
    let hull = ConvexHull3D::build(&sphere).unwrap();
    let moved = Translated::new(&hull, Vertex::new(0.0, 0.0, 5.0));

    let d = distance(&hull, &moved).unwrap();
    // Poles sit 1/300 inside the sphere
    assert!(d > 3.0 && d < 3.02, "distance {d}");

    let octahedron = ConvexHull3D::build(&testdata::octahedron_vertices()).unwrap();
    let near = Translated::new(&octahedron, Vertex::new(1.5, 0.0, 0.0));
    let result = closest(&octahedron, &near, &GjkConfig::default()).unwrap();
    assert!(result.intersecting);
}

#[test]
fn test_concurrent_queries_are_independent() {
    init_logging();
    let a = testdata::icosahedron_vertices();
    let offsets: Vec<f64> = (0..32).map(|i| 1.0 + 0.25 * i as f64).collect();

    let sequential: Vec<f64> = offsets
        .iter()
        .map(|&x| distance(&a, &Translated::new(a.as_slice(), Vertex::new(x, 0.0, 0.0))).unwrap())
        .collect();
    let parallel: Vec<f64> = offsets
        .par_iter()
        .map(|&x| distance(&a, &Translated::new(a.as_slice(), Vertex::new(x, 0.0, 0.0))).unwrap())
        .collect();

    assert_eq!(sequential, parallel);
}
