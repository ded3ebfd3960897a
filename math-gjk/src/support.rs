//! Support mappings of convex sets and of their Minkowski difference

use math_convex_hull::{ConvexHull3D, Vertex};

/// Positive and negative coordinate axes, in `+x, -x, +y, -y, +z, -z` order
pub(crate) const AXES: [Vertex; 6] = [
    Vertex { x: 1.0, y: 0.0, z: 0.0 },
    Vertex { x: -1.0, y: 0.0, z: 0.0 },
    Vertex { x: 0.0, y: 1.0, z: 0.0 },
    Vertex { x: 0.0, y: -1.0, z: 0.0 },
    Vertex { x: 0.0, y: 0.0, z: 1.0 },
    Vertex { x: 0.0, y: 0.0, z: -1.0 },
];

/// A convex set described by its support function
///
/// `support(d)` returns a point of the set maximizing `p · d`. Ties may be
/// broken arbitrarily, but consistently for the same direction.
pub trait SupportMap {
    fn support(&self, direction: &Vertex) -> Vertex;
}

/// Point clouds: brute force over the points, first maximum wins
///
/// The support of an empty cloud is the origin.
impl SupportMap for [Vertex] {
    fn support(&self, direction: &Vertex) -> Vertex {
        let mut best = match self.first() {
            Some(p) => *p,
            None => return Vertex::zero(),
        };
        let mut best_dot = best.dot(direction);
        for p in &self[1..] {
            let d = p.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = *p;
            }
        }
        best
    }
}

impl SupportMap for Vec<Vertex> {
    fn support(&self, direction: &Vertex) -> Vertex {
        self.as_slice().support(direction)
    }
}

impl SupportMap for ConvexHull3D {
    fn support(&self, direction: &Vertex) -> Vertex {
        self.vertices().support(direction)
    }
}

impl<T: SupportMap + ?Sized> SupportMap for &T {
    fn support(&self, direction: &Vertex) -> Vertex {
        (**self).support(direction)
    }
}

/// A shape rigidly shifted by `offset`
#[derive(Debug, Clone, Copy)]
pub struct Translated<'a, S: ?Sized> {
    shape: &'a S,
    offset: Vertex,
}

impl<'a, S: ?Sized> Translated<'a, S> {
    pub fn new(shape: &'a S, offset: Vertex) -> Self {
        Self { shape, offset }
    }

    pub fn offset(&self) -> Vertex {
        self.offset
    }
}

impl<S: SupportMap + ?Sized> SupportMap for Translated<'_, S> {
    fn support(&self, direction: &Vertex) -> Vertex {
        self.shape.support(direction).add(&self.offset)
    }
}

/// A point of the Minkowski difference `set1 - set2` with the support
/// points that produced it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SupportPoint {
    /// `support1 - support2`
    pub point: Vertex,
    /// Support point on the first set
    pub support1: Vertex,
    /// Support point on the second set
    pub support2: Vertex,
}

impl SupportPoint {
    pub fn new(support1: Vertex, support2: Vertex) -> Self {
        Self {
            point: support1.sub(&support2),
            support1,
            support2,
        }
    }
}

/// Support point of `set1 - set2` along `direction`
pub fn minkowski_support<A, B>(set1: &A, set2: &B, direction: &Vertex) -> SupportPoint
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    SupportPoint::new(
        set1.support(direction),
        set2.support(&direction.scale(-1.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_convex_hull::testdata;

    #[test]
    fn test_point_cloud_support() {
        let cube = testdata::cube_vertices(2.0);
        let p = cube.support(&Vertex::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vertex::new(1.0, 1.0, 1.0));
        let p = cube.support(&Vertex::new(-1.0, 0.2, -0.1));
        assert_eq!(p, Vertex::new(-1.0, 1.0, -1.0));
    }

    #[test]
    fn test_hull_support_matches_cloud() {
        let points = testdata::cube_with_interior_points(2.0, 50);
        let hull = ConvexHull3D::build(&points).unwrap();
        for d in testdata::fibonacci_sphere_points(40, 1.0) {
            assert_eq!(hull.support(&d).dot(&d), points.support(&d).dot(&d));
        }
    }

    #[test]
    fn test_translated_support() {
        let cube = testdata::cube_vertices(1.0);
        let moved = Translated::new(cube.as_slice(), Vertex::new(3.0, 0.0, 0.0));
        assert_eq!(moved.support(&Vertex::new(-1.0, 0.0, 0.0)).x, 2.5);
        assert_eq!(moved.offset().x, 3.0);
    }

    #[test]
    fn test_minkowski_support() {
        let a = testdata::cube_vertices(1.0);
        let b = testdata::cube_vertices_at(1.0, Vertex::new(3.0, 0.0, 0.0));
        let s = minkowski_support(&a, &b, &Vertex::new(1.0, 0.0, 0.0));
        assert_eq!(s.point.x, -2.0);
        assert_eq!(s.support1.x, 0.5);
        assert_eq!(s.support2.x, 2.5);
    }

    #[test]
    fn test_empty_cloud_supports_origin() {
        let empty: Vec<Vertex> = Vec::new();
        assert_eq!(empty.support(&Vertex::new(1.0, 0.0, 0.0)), Vertex::zero());
    }
}
