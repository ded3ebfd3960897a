//! Test data for convex hull tests
//!
//! Point sets shared by the unit tests, integration tests and benchmarks of
//! the hull and proximity crates.

use crate::types::Vertex;
use rand::Rng;

/// Generate random points on a sphere
pub fn random_sphere_points(n: usize, radius: f64) -> Vec<Vertex> {
    let mut rng = rand::rng();
    let mut vertices = Vec::with_capacity(n);

    for _ in 0..n {
        let azimuth = rng.random::<f64>() * 2.0 * std::f64::consts::PI;
        let elevation = (rng.random::<f64>() * 2.0 - 1.0).asin();
        let r = radius * (0.9 + 0.2 * rng.random::<f64>()); // Add some radius variation

        vertices.push(Vertex::from_spherical(azimuth, elevation, r));
    }

    vertices
}

/// Generate uniformly distributed points on a sphere using Fibonacci lattice
pub fn fibonacci_sphere_points(n: usize, radius: f64) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(n);
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;

    for i in 0..n {
        let theta = 2.0 * std::f64::consts::PI * (i as f64) / golden_ratio;
        let phi = ((2 * i + 1) as f64 / n as f64 - 1.0).acos();

        let x = radius * phi.sin() * theta.cos();
        let y = radius * phi.sin() * theta.sin();
        let z = radius * phi.cos();

        vertices.push(Vertex::new(x, y, z));
    }

    vertices
}

/// Generate a cube's vertices
pub fn cube_vertices(size: f64) -> Vec<Vertex> {
    let s = size / 2.0;
    vec![
        Vertex::new(-s, -s, -s),
        Vertex::new(s, -s, -s),
        Vertex::new(s, s, -s),
        Vertex::new(-s, s, -s),
        Vertex::new(-s, -s, s),
        Vertex::new(s, -s, s),
        Vertex::new(s, s, s),
        Vertex::new(-s, s, s),
    ]
}

/// Generate vertices for a more complex shape (cube with interior points)
pub fn cube_with_interior_points(size: f64, n_interior: usize) -> Vec<Vertex> {
    let mut vertices = cube_vertices(size);
    let mut rng = rand::rng();
    let s = size / 2.0;

    for _ in 0..n_interior {
        let x = rng.random::<f64>() * size - s;
        let y = rng.random::<f64>() * size - s;
        let z = rng.random::<f64>() * size - s;
        vertices.push(Vertex::new(x, y, z));
    }

    vertices
}

/// Generate a simple tetrahedron
pub fn tetrahedron_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new(0.0, 0.0, 0.0),
        Vertex::new(1.0, 0.0, 0.0),
        Vertex::new(0.5, (3.0_f64).sqrt() / 2.0, 0.0),
        Vertex::new(0.5, (3.0_f64).sqrt() / 6.0, (2.0 / 3.0_f64).sqrt()),
    ]
}

/// Generate vertices for an icosahedron
pub fn icosahedron_vertices() -> Vec<Vertex> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0; // Golden ratio

    vec![
        Vertex::new(-1.0, phi, 0.0),
        Vertex::new(1.0, phi, 0.0),
        Vertex::new(-1.0, -phi, 0.0),
        Vertex::new(1.0, -phi, 0.0),
        Vertex::new(0.0, -1.0, phi),
        Vertex::new(0.0, 1.0, phi),
        Vertex::new(0.0, -1.0, -phi),
        Vertex::new(0.0, 1.0, -phi),
        Vertex::new(phi, 0.0, -1.0),
        Vertex::new(phi, 0.0, 1.0),
        Vertex::new(-phi, 0.0, -1.0),
        Vertex::new(-phi, 0.0, 1.0),
    ]
}

/// Generate vertices for an octahedron
pub fn octahedron_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new(1.0, 0.0, 0.0),
        Vertex::new(-1.0, 0.0, 0.0),
        Vertex::new(0.0, 1.0, 0.0),
        Vertex::new(0.0, -1.0, 0.0),
        Vertex::new(0.0, 0.0, 1.0),
        Vertex::new(0.0, 0.0, -1.0),
    ]
}

/// Cube vertices shifted so the cube is centred on `center`
pub fn cube_vertices_at(size: f64, center: Vertex) -> Vec<Vertex> {
    cube_vertices(size)
        .into_iter()
        .map(|v| v.add(&center))
        .collect()
}

/// Grid of `n x n` points on the plane `z = height`, each nudged by `noise`
///
/// With `noise` far below the hull tolerance the set stays coplanar.
pub fn noisy_square_grid(n: usize, height: f64, noise: f64) -> Vec<Vertex> {
    let step = 1.0 / (n.max(2) - 1) as f64;
    let mut vertices = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let v = Vertex::new(i as f64 * step, j as f64 * step, height);
            vertices.push(if noise > 0.0 { v.add_noise(noise) } else { v });
        }
    }
    vertices
}

/// Integer lattice of `n x n x n` points centred on the origin
///
/// Most points sit on the faces and edges of the bounding cube.
pub fn lattice_points(n: usize) -> Vec<Vertex> {
    let half = (n as f64 - 1.0) / 2.0;
    let mut vertices = Vec::with_capacity(n * n * n);
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                vertices.push(Vertex::new(
                    i as f64 - half,
                    j as f64 - half,
                    k as f64 - half,
                ));
            }
        }
    }
    vertices
}

/// Random points uniformly drawn in the axis-aligned box `[-half, half]^3 + center`
pub fn random_box_points(n: usize, half: f64, center: Vertex) -> Vec<Vertex> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            Vertex::new(
                center.x + half * (2.0 * rng.random::<f64>() - 1.0),
                center.y + half * (2.0 * rng.random::<f64>() - 1.0),
                center.z + half * (2.0 * rng.random::<f64>() - 1.0),
            )
        })
        .collect()
}
