//! Geometric utility functions

use crate::types::Vertex;

/// Compute the volume of a tetrahedron formed by 4 points
pub fn tetrahedron_volume(p0: &Vertex, p1: &Vertex, p2: &Vertex, p3: &Vertex) -> f64 {
    let v1 = p1.sub(p0);
    let v2 = p2.sub(p0);
    let v3 = p3.sub(p0);

    v1.dot(&v2.cross(&v3)).abs() / 6.0
}

/// Find the extreme points (min/max in each dimension)
pub fn find_extreme_points(vertices: &[Vertex]) -> [usize; 6] {
    let mut min_x_idx = 0;
    let mut max_x_idx = 0;
    let mut min_y_idx = 0;
    let mut max_y_idx = 0;
    let mut min_z_idx = 0;
    let mut max_z_idx = 0;

    for (i, v) in vertices.iter().enumerate() {
        if v.x < vertices[min_x_idx].x {
            min_x_idx = i;
        }
        if v.x > vertices[max_x_idx].x {
            max_x_idx = i;
        }
        if v.y < vertices[min_y_idx].y {
            min_y_idx = i;
        }
        if v.y > vertices[max_y_idx].y {
            max_y_idx = i;
        }
        if v.z < vertices[min_z_idx].z {
            min_z_idx = i;
        }
        if v.z > vertices[max_z_idx].z {
            max_z_idx = i;
        }
    }

    [
        min_x_idx, max_x_idx, min_y_idx, max_y_idx, min_z_idx, max_z_idx,
    ]
}

/// Scale-aware distance tolerance for a point set
///
/// `epsilon` is relative: it is multiplied by the sum of the largest absolute
/// coordinate along each axis, so the same setting works at any unit scale.
pub fn compute_relative_epsilon(vertices: &[Vertex], epsilon: f64) -> f64 {
    let (mx, my, mz) = vertices.iter().fold((0.0_f64, 0.0_f64, 0.0_f64), |acc, v| {
        (acc.0.max(v.x.abs()), acc.1.max(v.y.abs()), acc.2.max(v.z.abs()))
    });
    (epsilon * (mx + my + mz)).max(f64::MIN_POSITIVE)
}

/// Closest point of a triangle to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleProjection {
    /// The closest point on the triangle
    pub point: Vertex,
    /// Weights of `a`, `b`, `c` reproducing `point`; non-negative, sum to 1
    pub barycentric: [f64; 3],
}

/// Closest point on triangle `abc` to `p`
///
/// Walks the Voronoi regions of the vertices, then the edges, then the face
/// (Ericson, Real-Time Collision Detection, 5.1.5). Degenerate triangles fall
/// through to an edge or vertex region.
pub fn closest_point_on_triangle(
    p: &Vertex,
    a: &Vertex,
    b: &Vertex,
    c: &Vertex,
) -> TriangleProjection {
    let ab = b.sub(a);
    let ac = c.sub(a);
    let ap = p.sub(a);

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return TriangleProjection {
            point: *a,
            barycentric: [1.0, 0.0, 0.0],
        };
    }

    let bp = p.sub(b);
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return TriangleProjection {
            point: *b,
            barycentric: [0.0, 1.0, 0.0],
        };
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 && d1 > d3 {
        let v = d1 / (d1 - d3);
        return TriangleProjection {
            point: a.add(&ab.scale(v)),
            barycentric: [1.0 - v, v, 0.0],
        };
    }

    let cp = p.sub(c);
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return TriangleProjection {
            point: *c,
            barycentric: [0.0, 0.0, 1.0],
        };
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 && d2 > d6 {
        let w = d2 / (d2 - d6);
        return TriangleProjection {
            point: a.add(&ac.scale(w)),
            barycentric: [1.0 - w, 0.0, w],
        };
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 && (d4 - d3) + (d5 - d6) > 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return TriangleProjection {
            point: b.add(&c.sub(b).scale(w)),
            barycentric: [0.0, 1.0 - w, w],
        };
    }

    let denom = va + vb + vc;
    if denom.abs() <= f64::MIN_POSITIVE {
        // Zero-area triangle whose regions all failed: keep the nearest corner
        let corners = [*a, *b, *c];
        let (i, _) = corners
            .iter()
            .map(|q| q.distance_squared(p))
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, d)| {
                if d < best.1 { (i, d) } else { best }
            });
        let mut barycentric = [0.0; 3];
        barycentric[i] = 1.0;
        return TriangleProjection {
            point: corners[i],
            barycentric,
        };
    }

    let v = vb / denom;
    let w = vc / denom;
    TriangleProjection {
        point: a.add(&ab.scale(v)).add(&ac.scale(w)),
        barycentric: [1.0 - v - w, v, w],
    }
}
