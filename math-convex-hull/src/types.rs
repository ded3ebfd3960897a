//! Core data types for 3D convex hull computation

use crate::geometry::{closest_point_on_triangle, tetrahedron_volume};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this length a vector has no usable direction.
const DIRECTION_EPSILON: f64 = 1e-12;

/// A 3D vertex/point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin
    pub fn zero() -> Self {
        Self::default()
    }

    /// Create a vertex from spherical coordinates (azimuth, elevation in radians, radius)
    pub fn from_spherical(azimuth: f64, elevation: f64, radius: f64) -> Self {
        let x = radius * elevation.cos() * azimuth.cos();
        let y = radius * elevation.cos() * azimuth.sin();
        let z = radius * elevation.sin();
        Self { x, y, z }
    }

    /// Dot product with another vertex
    pub fn dot(&self, other: &Vertex) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another vertex
    pub fn cross(&self, other: &Vertex) -> Vertex {
        Vertex {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Subtract another vertex
    pub fn sub(&self, other: &Vertex) -> Vertex {
        Vertex {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Add another vertex
    pub fn add(&self, other: &Vertex) -> Vertex {
        Vertex {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Scale by a scalar
    pub fn scale(&self, s: f64) -> Vertex {
        Vertex {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Compute the magnitude/length
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Squared length, avoids the square root in comparisons
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalize to unit length
    ///
    /// Vectors too short to carry a direction are returned unchanged.
    pub fn normalize(&self) -> Vertex {
        self.try_normalize().unwrap_or(*self)
    }

    /// Normalize to unit length, or `None` when the vector is (nearly) zero
    pub fn try_normalize(&self) -> Option<Vertex> {
        let mag = self.magnitude();
        if mag > DIRECTION_EPSILON && mag.is_finite() {
            Some(self.scale(1.0 / mag))
        } else {
            None
        }
    }

    /// Distance to another vertex
    pub fn distance(&self, other: &Vertex) -> f64 {
        self.sub(other).magnitude()
    }

    /// Squared distance to another vertex
    pub fn distance_squared(&self, other: &Vertex) -> f64 {
        self.sub(other).magnitude_squared()
    }

    /// Add noise for numerical stability
    pub fn add_noise(&self, epsilon: f64) -> Vertex {
        use rand::Rng;
        let mut rng = rand::rng();
        Vertex {
            x: self.x + epsilon * (rng.random::<f64>() - 0.5),
            y: self.y + epsilon * (rng.random::<f64>() - 0.5),
            z: self.z + epsilon * (rng.random::<f64>() - 0.5),
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

/// A face of the convex hull (triangle defined by 3 vertex indices)
///
/// Vertices are ordered counter-clockwise when seen from outside the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    /// Create a new face from three vertex indices
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }

    /// Get vertex indices as an array
    pub fn indices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Compute the normal vector of this face
    pub fn normal(&self, vertices: &[Vertex]) -> Vertex {
        let v0 = &vertices[self.v0];
        let v1 = &vertices[self.v1];
        let v2 = &vertices[self.v2];

        let e1 = v1.sub(v0);
        let e2 = v2.sub(v0);
        e1.cross(&e2).normalize()
    }

    /// Check if a point is strictly in front of this face
    pub fn is_visible_from(&self, point: &Vertex, vertices: &[Vertex], tolerance: f64) -> bool {
        let v0 = &vertices[self.v0];
        let normal = self.normal(vertices);
        let to_point = point.sub(v0);
        normal.dot(&to_point) > tolerance
    }
}

/// The result of a convex hull computation
///
/// Immutable once built. Vertices are owned copies of the input points that
/// ended up on the hull, faces index into them with outward orientation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvexHull3D {
    /// Hull vertices
    vertices: Vec<Vertex>,
    /// Faces of the convex hull (each face is a triangle)
    faces: Vec<Face>,
    /// Position of each hull vertex in the input slice
    source_indices: Vec<usize>,
}

impl ConvexHull3D {
    /// Create a new convex hull from vertices and faces
    pub(crate) fn new(vertices: Vec<Vertex>, faces: Vec<Face>, source_indices: Vec<usize>) -> Self {
        Self {
            vertices,
            faces,
            source_indices,
        }
    }

    /// Build a convex hull from vertices using the Quickhull algorithm
    pub fn build(vertices: &[Vertex]) -> crate::Result<Self> {
        Self::build_with_config(vertices, &crate::HullConfig::default())
    }

    /// Build a convex hull with explicit tolerances
    pub fn build_with_config(vertices: &[Vertex], config: &crate::HullConfig) -> crate::Result<Self> {
        crate::quickhull::quickhull_3d(vertices, config)
    }

    /// Get the vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get the faces
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Index in the original input of every hull vertex
    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    /// Get the number of faces
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of vertices
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Average of the hull vertices (always inside the hull)
    pub fn centroid(&self) -> Vertex {
        let sum = self
            .vertices
            .iter()
            .fold(Vertex::zero(), |acc, v| acc.add(v));
        sum.scale(1.0 / self.vertices.len().max(1) as f64)
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounding_box(&self) -> (Vertex, Vertex) {
        let init = (
            Vertex::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            Vertex::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        );
        self.vertices.iter().fold(init, |(lo, hi), v| {
            (
                Vertex::new(lo.x.min(v.x), lo.y.min(v.y), lo.z.min(v.z)),
                Vertex::new(hi.x.max(v.x), hi.y.max(v.y), hi.z.max(v.z)),
            )
        })
    }

    /// Supporting plane of face `index` as `(unit outward normal, offset)`
    ///
    /// A point `p` lies in front of the face when `normal.dot(p) > offset`.
    pub fn face_plane(&self, index: usize) -> (Vertex, f64) {
        let face = &self.faces[index];
        let normal = face.normal(&self.vertices);
        (normal, normal.dot(&self.vertices[face.v0]))
    }

    /// Check whether a point is inside the hull or within `tolerance` of its boundary
    pub fn contains(&self, point: &Vertex, tolerance: f64) -> bool {
        !self
            .faces
            .iter()
            .any(|face| face.is_visible_from(point, &self.vertices, tolerance))
    }

    /// Closest point of the solid hull to `point`, with its distance
    ///
    /// Points inside the hull are their own closest point at distance 0.
    pub fn closest_point(&self, point: &Vertex) -> (f64, Vertex) {
        if self.contains(point, 0.0) {
            return (0.0, *point);
        }

        let mut best = (f64::INFINITY, *point);
        for face in &self.faces {
            let projection = closest_point_on_triangle(
                point,
                &self.vertices[face.v0],
                &self.vertices[face.v1],
                &self.vertices[face.v2],
            );
            let distance = projection.point.distance(point);
            if distance < best.0 {
                best = (distance, projection.point);
            }
        }
        best
    }

    /// Compute the volume of the convex hull
    pub fn volume(&self) -> f64 {
        // Tetrahedra fanned from the centroid, which lies inside the hull
        let c = self.centroid();
        self.faces
            .iter()
            .map(|face| {
                tetrahedron_volume(
                    &c,
                    &self.vertices[face.v0],
                    &self.vertices[face.v1],
                    &self.vertices[face.v2],
                )
            })
            .sum()
    }

    /// Compute the surface area of the convex hull
    pub fn surface_area(&self) -> f64 {
        let mut area = 0.0;

        for face in &self.faces {
            let v0 = &self.vertices[face.v0];
            let v1 = &self.vertices[face.v1];
            let v2 = &self.vertices[face.v2];

            let e1 = v1.sub(v0);
            let e2 = v2.sub(v0);
            let cross = e1.cross(&e2);
            area += cross.magnitude() / 2.0;
        }

        area
    }
}
