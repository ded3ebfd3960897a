//! GJK distance and intersection query
//!
//! The simplex walks the Minkowski difference `set1 - set2` towards the
//! origin. Each round takes the support point along `-v`, where `v` is the
//! current closest point, and re-projects the origin onto the grown simplex.
//!
//! # References
//!
//! - Gilbert, Johnson, Keerthi: "A Fast Procedure for Computing the Distance
//!   Between Complex Objects in Three-Dimensional Space" (1988)
//! - van den Bergen: "Collision Detection in Interactive 3D Environments" (2003)

use crate::config::GjkConfig;
use crate::error::{GjkError, Result, Stage};
use crate::penetration::{Penetration, penetration};
use crate::simplex::Simplex;
use crate::support::{AXES, SupportMap, minkowski_support};
use math_convex_hull::Vertex;

/// Result of a GJK query
#[derive(Debug, Clone)]
pub struct Proximity {
    /// Closest point on the first set
    pub point1: Vertex,
    /// Closest point on the second set
    pub point2: Vertex,
    /// Separation distance, 0 when intersecting
    pub distance: f64,
    /// Whether the sets overlap or touch
    pub intersecting: bool,
    /// Terminal simplex, the seed for [`crate::penetration`]
    pub simplex: Simplex,
    /// Support queries performed
    pub iterations: usize,
}

/// Outcome of [`contact`]
#[derive(Debug, Clone)]
pub enum Contact {
    /// The sets are apart
    Separated {
        point1: Vertex,
        point2: Vertex,
        distance: f64,
    },
    /// The sets overlap
    Penetrating(Penetration),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Termination {
    /// The closest point reached the origin
    Origin,
    /// The support point was already in the simplex
    Cycle,
    /// The support point brought no progress
    Converged,
    /// Four points enclose the origin
    Enclosed,
}

/// Closest points between two convex sets
///
/// # Errors
/// [`GjkError::MaxIterationsExceeded`] when `config.max_iterations` support
/// queries do not converge.
///
/// # Example
/// ```
/// use math_convex_hull::{Vertex, testdata};
/// use math_gjk::{GjkConfig, closest};
///
/// let a = testdata::cube_vertices(1.0);
/// let b = testdata::cube_vertices_at(1.0, Vertex::new(3.0, 0.0, 0.0));
/// let result = closest(&a, &b, &GjkConfig::default()).unwrap();
/// assert!(!result.intersecting);
/// assert!((result.distance - 2.0).abs() < 1e-9);
/// ```
pub fn closest<A, B>(set1: &A, set2: &B, config: &GjkConfig) -> Result<Proximity>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    // First non-zero Minkowski point along an axis; none means both sets
    // collapse onto the same single point
    let first = AXES
        .iter()
        .map(|d| minkowski_support(set1, set2, d))
        .find(|s| s.point.try_normalize().is_some())
        .unwrap_or_else(|| minkowski_support(set1, set2, &AXES[0]));

    let mut simplex = Simplex::new(first);
    let mut v = first.point;
    let mut iterations = 0;

    let termination = loop {
        let v2 = v.magnitude_squared();
        let tolerance2 = config.epsilon * config.epsilon * simplex.max_norm_squared();
        if v2 <= tolerance2 || v.try_normalize().is_none() {
            break Termination::Origin;
        }

        if iterations >= config.max_iterations {
            log::error!(
                "GJK did not converge after {} iterations (|v| = {:e})",
                iterations,
                v2.sqrt()
            );
            return Err(GjkError::MaxIterationsExceeded {
                stage: Stage::Gjk,
                iterations: config.max_iterations,
            });
        }
        iterations += 1;

        let s = minkowski_support(set1, set2, &v.scale(-1.0));
        if simplex.contains(&s.point, tolerance2) {
            break Termination::Cycle;
        }
        if v2 - v.dot(&s.point) <= config.epsilon * v2 {
            break Termination::Converged;
        }

        simplex.push(s);
        v = simplex.reduce(config.weight_epsilon);
        log::trace!(
            "GJK iteration {}: |W| = {}, |v| = {:e}",
            iterations,
            simplex.len(),
            v.magnitude()
        );

        if simplex.len() == 4 {
            break Termination::Enclosed;
        }
    };

    let tolerance2 = config.epsilon * config.epsilon * simplex.max_norm_squared();
    let at_origin = v.magnitude_squared() <= tolerance2 || v.try_normalize().is_none();
    let intersecting = match simplex.len() {
        // Tetrahedron with positive weights: origin enclosed
        4 => true,
        // Origin on the triangle
        3 => at_origin,
        // Origin on the segment
        2 => at_origin,
        // Point coincident with the origin
        1 => at_origin,
        _ => false,
    };

    let (point1, point2) = simplex.witness_points();
    let distance = if intersecting { 0.0 } else { v.magnitude() };

    log::debug!(
        "GJK: {:?} after {} iterations, |W| = {}, distance = {:e}, intersecting = {}",
        termination,
        iterations,
        simplex.len(),
        distance,
        intersecting
    );

    Ok(Proximity {
        point1,
        point2,
        distance,
        intersecting,
        simplex,
        iterations,
    })
}

/// Separation distance between two convex sets (0 when they intersect)
pub fn distance<A, B>(set1: &A, set2: &B) -> Result<f64>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    Ok(closest(set1, set2, &GjkConfig::default())?.distance)
}

/// Closest points when apart, minimum translation when overlapping
///
/// # Errors
/// Everything [`closest`] and [`penetration`] report; in particular sets
/// that only touch give [`GjkError::Inconclusive`].
pub fn contact<A, B>(set1: &A, set2: &B, config: &GjkConfig) -> Result<Contact>
where
    A: SupportMap + ?Sized,
    B: SupportMap + ?Sized,
{
    let proximity = closest(set1, set2, config)?;
    if !proximity.intersecting {
        return Ok(Contact::Separated {
            point1: proximity.point1,
            point2: proximity.point2,
            distance: proximity.distance,
        });
    }
    penetration(set1, set2, &proximity.simplex, config).map(Contact::Penetrating)
}
