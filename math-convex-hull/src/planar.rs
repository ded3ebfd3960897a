//! Planar fallback for coplanar point sets
//!
//! Points are projected onto an orthonormal basis of their common plane,
//! wrapped with a Graham scan and triangulated as a fan.

use crate::types::{Face, Vertex};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Convex polygon of a coplanar point set, embedded in 3D
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarHull {
    /// Polygon corners, counter-clockwise about `normal`
    vertices: Vec<Vertex>,
    /// Fan triangulation `(0, i, i + 1)` of the polygon
    faces: Vec<Face>,
    /// Unit normal of the supporting plane
    normal: Vertex,
}

impl PlanarHull {
    /// Polygon corners in counter-clockwise order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Fan triangles covering the polygon
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Unit normal of the plane, oriented so the polygon winds counter-clockwise
    pub fn normal(&self) -> Vertex {
        self.normal
    }

    /// Number of polygon corners
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Area of the polygon
    pub fn area(&self) -> f64 {
        self.faces
            .iter()
            .map(|f| {
                let e1 = self.vertices[f.v1].sub(&self.vertices[f.v0]);
                let e2 = self.vertices[f.v2].sub(&self.vertices[f.v0]);
                e1.cross(&e2).magnitude() / 2.0
            })
            .sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct Projected {
    index: usize,
    x: f64,
    y: f64,
}

/// z-component of `(b - a) x (c - a)` in the plane
fn turn(a: &Projected, b: &Projected, c: &Projected) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Build the 2D hull of `points` lying in the plane through `basis`
///
/// `basis` must name three non-collinear points of the set. Points off the
/// plane are projected onto it. Returns `None` if fewer than three corners
/// survive, which only happens when `basis` is itself degenerate.
pub(crate) fn planar_hull(
    points: &[Vertex],
    basis: [usize; 3],
    tolerance: f64,
) -> Option<PlanarHull> {
    let origin = points[basis[0]];
    let u = points[basis[1]].sub(&origin).try_normalize()?;
    let normal = u.cross(&points[basis[2]].sub(&origin)).try_normalize()?;
    let v = normal.cross(&u);

    let projected: Vec<Projected> = points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let d = p.sub(&origin);
            Projected {
                index,
                x: d.dot(&u),
                y: d.dot(&v),
            }
        })
        .collect();

    let pivot = *projected.iter().min_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    })?;

    let mut rest: Vec<(f64, f64, Projected)> = projected
        .iter()
        .filter_map(|p| {
            let dx = p.x - pivot.x;
            let dy = p.y - pivot.y;
            let dist = (dx * dx + dy * dy).sqrt();
            (dist > tolerance).then(|| (dy.atan2(dx), dist, *p))
        })
        .collect();
    rest.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });

    let mut stack: Vec<Projected> = vec![pivot];
    for (_, _, p) in rest {
        while stack.len() >= 2 {
            let a = &stack[stack.len() - 2];
            let b = &stack[stack.len() - 1];
            let base = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
            // Pop unless p lies strictly left of a->b
            if turn(a, b, &p) <= tolerance * base {
                stack.pop();
            } else {
                break;
            }
        }
        stack.push(p);
    }

    if stack.len() < 3 {
        return None;
    }

    let vertices: Vec<Vertex> = stack.iter().map(|p| points[p.index]).collect();
    let faces = (1..vertices.len() - 1).map(|i| Face::new(0, i, i + 1)).collect();

    log::debug!(
        "Planar hull: {} input points -> {} corners",
        points.len(),
        vertices.len()
    );

    Some(PlanarHull {
        vertices,
        faces,
        normal,
    })
}
