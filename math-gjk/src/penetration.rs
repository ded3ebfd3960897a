//! Penetration depth of overlapping convex sets
//!
//! Starting from the terminal GJK simplex, a cloud of Minkowski points is
//! grown around the origin. Each round hulls the cloud, takes the face
//! closest to the origin and asks for the support point along its normal,
//! until the hull boundary stops moving. The closest boundary point is the
//! minimum translation vector.

use crate::config::GjkConfig;
use crate::error::{GjkError, Result, Stage};
use crate::simplex::Simplex;
use crate::support::{AXES, SupportMap, SupportPoint, minkowski_support};
use math_convex_hull::geometry::compute_relative_epsilon;
use math_convex_hull::{ConvexHull3D, TriangleProjection, Vertex, closest_point_on_triangle};

/// Minimum translation between two overlapping sets
#[derive(Debug, Clone)]
pub struct Penetration {
    /// Deepest point of the first set
    pub point1: Vertex,
    /// Deepest point of the second set
    pub point2: Vertex,
    /// `|point1 - point2|`
    pub depth: f64,
    /// Unit direction of `point1 - point2`
    pub normal: Vertex,
    /// Refinement rounds performed
    pub iterations: usize,
}

impl Penetration {
    /// Translation of the second set that brings the sets into touching contact
    pub fn translation(&self) -> Vertex {
        self.point1.sub(&self.point2)
    }
}

/// Working cloud of Minkowski points
struct Cloud {
    points: Vec<SupportPoint>,
}

impl Cloud {
    fn positions(&self) -> Vec<Vertex> {
        self.points.iter().map(|s| s.point).collect()
    }

    fn tolerance(&self, epsilon: f64) -> f64 {
        compute_relative_epsilon(&self.positions(), epsilon)
    }

    /// Add `s` unless an equal point is already present
    fn insert(&mut self, s: SupportPoint, tolerance: f64) -> bool {
        if self
            .points
            .iter()
            .any(|p| p.point.distance(&s.point) <= tolerance)
        {
            return false;
        }
        self.points.push(s);
        true
    }

    fn hull(&self, config: &GjkConfig) -> Result<ConvexHull3D> {
        Ok(ConvexHull3D::build_with_config(&self.positions(), &config.hull)?)
    }
}

/// Directions that surround the origin given the simplex points
fn augmentation_directions(seed: &[SupportPoint]) -> Vec<Vertex> {
    match seed {
        [a, b] => {
            let Some(edge) = b.point.sub(&a.point).try_normalize() else {
                return AXES.to_vec();
            };
            // Cross with the axis least aligned with the edge
            let axis = AXES
                .iter()
                .step_by(2)
                .min_by(|p, q| edge.dot(p).abs().total_cmp(&edge.dot(q).abs()))
                .copied()
                .unwrap_or(AXES[0]);
            let u = edge.cross(&axis).normalize();
            let w = edge.cross(&u).normalize();
            vec![u, u.scale(-1.0), w, w.scale(-1.0)]
        }
        [a, b, c] => {
            match b.point.sub(&a.point).cross(&c.point.sub(&a.point)).try_normalize() {
                Some(n) => vec![n, n.scale(-1.0)],
                None => AXES.to_vec(),
            }
        }
        [_, _, _, _] => Vec::new(),
        _ => AXES.to_vec(),
    }
}

/// Grow the cloud until its hull holds the origin strictly inside
///
/// Returns the validated hull.
fn enclose_origin<A, B>(
    set1: &A,
    set2: &B,
    cloud: &mut Cloud,
    config: &GjkConfig,
) -> Result<ConvexHull3D>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    for attempt in 0..=config.max_augment_attempts {
        let tol = cloud.tolerance(config.epsilon);

        let directions = match cloud.hull(config) {
            Ok(hull) => {
                let failing: Vec<Vertex> = (0..hull.num_faces())
                    .map(|i| hull.face_plane(i))
                    .filter(|&(_, offset)| offset <= tol)
                    .map(|(normal, _)| normal)
                    .collect();
                if failing.is_empty() {
                    log::trace!(
                        "Origin enclosed by {} points after {} augmentation round(s)",
                        cloud.points.len(),
                        attempt
                    );
                    return Ok(hull);
                }
                failing
            }
            // A flat cloud has no faces to push out yet
            Err(GjkError::Hull(e)) if e.is_input_error() => AXES.to_vec(),
            Err(e) => return Err(e),
        };

        if attempt == config.max_augment_attempts {
            break;
        }

        let mut grown = false;
        for d in &directions {
            grown |= cloud.insert(minkowski_support(set1, set2, d), tol);
        }
        if !grown {
            log::warn!(
                "Origin stays on the boundary of the Minkowski difference after {} round(s)",
                attempt + 1
            );
            return Err(GjkError::Inconclusive {
                attempts: attempt + 1,
            });
        }
    }

    log::warn!(
        "Could not enclose the origin within {} augmentation round(s)",
        config.max_augment_attempts
    );
    Err(GjkError::Inconclusive {
        attempts: config.max_augment_attempts,
    })
}

/// Face of `hull` closest to the origin
fn closest_face(hull: &ConvexHull3D) -> Option<(usize, TriangleProjection)> {
    let origin = Vertex::zero();
    let vertices = hull.vertices();
    hull.faces()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            (
                i,
                closest_point_on_triangle(
                    &origin,
                    &vertices[f.v0],
                    &vertices[f.v1],
                    &vertices[f.v2],
                ),
            )
        })
        .min_by(|a, b| {
            a.1.point
                .magnitude_squared()
                .total_cmp(&b.1.point.magnitude_squared())
        })
}

/// Minimum translation vector of two intersecting sets
///
/// `simplex` is the terminal simplex of an intersecting [`crate::closest`]
/// query on the same sets.
///
/// # Errors
/// - [`GjkError::Inconclusive`] when the origin cannot be placed strictly
///   inside a working polytope (touching or extremely thin overlap)
/// - [`GjkError::MaxIterationsExceeded`] after
///   `config.max_penetration_iterations` rounds
/// - [`GjkError::Hull`] when a working hull fails internally
pub fn penetration<A, B>(
    set1: &A,
    set2: &B,
    simplex: &Simplex,
    config: &GjkConfig,
) -> Result<Penetration>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let seed = simplex.support_points();
    let mut cloud = Cloud {
        points: seed.clone(),
    };
    let seed_tol = cloud.tolerance(config.epsilon);
    for d in augmentation_directions(&seed) {
        cloud.insert(minkowski_support(set1, set2, &d), seed_tol);
    }

    let mut hull = enclose_origin(set1, set2, &mut cloud, config)?;
    let mut previous: Option<Vertex> = None;

    for iteration in 1..=config.max_penetration_iterations {
        let tol = cloud.tolerance(config.epsilon);
        let Some((face_index, projection)) = closest_face(&hull) else {
            return Err(GjkError::Inconclusive { attempts: 0 });
        };
        let (normal, offset) = hull.face_plane(face_index);

        let s = minkowski_support(set1, set2, &normal);
        let gain = normal.dot(&s.point) - offset;
        let stalled = previous.is_some_and(|p| p.distance(&projection.point) <= tol);

        if gain <= tol || stalled || !cloud.insert(s, tol) {
            let face = hull.faces()[face_index];
            let sources = hull.source_indices();
            let corners = [face.v0, face.v1, face.v2].map(|v| cloud.points[sources[v]]);

            let (point1, point2) = corners.iter().zip(projection.barycentric).fold(
                (Vertex::zero(), Vertex::zero()),
                |(p1, p2), (c, w)| (p1.add(&c.support1.scale(w)), p2.add(&c.support2.scale(w))),
            );
            let translation = point1.sub(&point2);
            let depth = translation.magnitude();

            log::debug!(
                "Penetration depth {:e} after {} iteration(s), {} cloud points",
                depth,
                iteration,
                cloud.points.len()
            );

            return Ok(Penetration {
                point1,
                point2,
                depth,
                normal: translation.try_normalize().unwrap_or(normal),
                iterations: iteration,
            });
        }

        log::trace!(
            "Penetration iteration {}: face distance {:e}, gain {:e}",
            iteration,
            projection.point.magnitude(),
            gain
        );
        previous = Some(projection.point);
        hull = cloud.hull(config)?;
    }

    log::error!(
        "Penetration refinement did not converge after {} iterations",
        config.max_penetration_iterations
    );
    Err(GjkError::MaxIterationsExceeded {
        stage: Stage::Penetration,
        iterations: config.max_penetration_iterations,
    })
}
