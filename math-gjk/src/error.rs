//! Error types for proximity queries.

use math_convex_hull::ConvexHullError;
use std::fmt;
use thiserror::Error;

/// Algorithm that hit its iteration bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The GJK distance loop
    Gjk,
    /// Penetration depth refinement
    Penetration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Gjk => write!(f, "GJK"),
            Stage::Penetration => write!(f, "penetration refinement"),
        }
    }
}

/// Errors that can occur during proximity queries.
#[derive(Debug, Error)]
pub enum GjkError {
    /// The origin could not be enclosed strictly inside a working polytope.
    ///
    /// Happens for touching or extremely thin overlaps.
    #[error("penetration depth inconclusive after {attempts} augmentation round(s)")]
    Inconclusive {
        /// Augmentation rounds tried
        attempts: usize,
    },

    /// An iteration bound was reached before convergence.
    #[error("{stage} did not converge within {iterations} iterations")]
    MaxIterationsExceeded {
        /// Which loop gave up
        stage: Stage,
        /// The configured bound
        iterations: usize,
    },

    /// A hull built during penetration refinement failed.
    #[error("hull construction failed: {0}")]
    Hull(#[from] ConvexHullError),
}

/// A specialized `Result` type for proximity queries.
pub type Result<T> = std::result::Result<T, GjkError>;

impl GjkError {
    /// Returns `true` if the overlap was too thin to measure.
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, GjkError::Inconclusive { .. })
    }

    /// Returns `true` if an iteration bound was hit.
    pub fn is_iteration_limit(&self) -> bool {
        matches!(
            self,
            GjkError::MaxIterationsExceeded { .. }
                | GjkError::Hull(ConvexHullError::MaxIterationsExceeded { .. })
        )
    }
}
