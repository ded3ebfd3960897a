//! 3D Convex Hull and Computational Geometry Library
//!
//! This library implements the Quickhull algorithm for computing convex hulls
//! in 3D space. Facets live in an arena addressed by integer handles, keep
//! their three neighbours and per-edge merge flags, and are grown one cone at
//! a time around the farthest outside point.
//!
//! Point sets that do not span three dimensions are reported as
//! [`ConvexHullError::Degenerate`]; coplanar input carries a [`PlanarHull`]
//! fallback.
//!
//! # 3D Convex Hull Example
//! ```
//! use math_convex_hull::{ConvexHull3D, Vertex};
//!
//! let vertices = vec![
//!     Vertex::new(0.0, 0.0, 0.0),
//!     Vertex::new(1.0, 0.0, 0.0),
//!     Vertex::new(0.0, 1.0, 0.0),
//!     Vertex::new(0.0, 0.0, 1.0),
//! ];
//!
//! let hull = ConvexHull3D::build(&vertices).unwrap();
//! println!("Number of faces: {}", hull.num_faces());
//! ```
//!
//! # Degenerate input
//! ```
//! use math_convex_hull::{ConvexHull3D, ConvexHullError, Vertex};
//!
//! let square = vec![
//!     Vertex::new(0.0, 0.0, 0.0),
//!     Vertex::new(1.0, 0.0, 0.0),
//!     Vertex::new(1.0, 1.0, 0.0),
//!     Vertex::new(0.0, 1.0, 0.0),
//! ];
//!
//! match ConvexHull3D::build(&square) {
//!     Err(ConvexHullError::Degenerate { dimension: 2, planar: Some(polygon) }) => {
//!         assert_eq!(polygon.num_vertices(), 4);
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

mod config;
pub mod geometry;
mod planar;
mod quickhull;
mod types;

// Make testdata publicly available for tests
pub mod testdata;

pub use config::{HullConfig, HullConfigBuilder};
pub use geometry::{TriangleProjection, closest_point_on_triangle};
pub use planar::PlanarHull;
pub use quickhull::quickhull_3d;
pub use types::{ConvexHull3D, Face, Vertex};

use std::collections::TryReserveError;

/// Error types for convex hull operations
#[derive(Debug, thiserror::Error)]
pub enum ConvexHullError {
    #[error("No vertices given")]
    InsufficientVertices,

    /// The input spans fewer than three dimensions.
    ///
    /// `dimension` is 0 (all points coincide), 1 (collinear) or 2 (coplanar).
    /// Coplanar input carries its 2D hull.
    #[error("Vertices span only {dimension} dimension(s)")]
    Degenerate {
        dimension: usize,
        planar: Option<Box<PlanarHull>>,
    },

    #[error("Allocation failed during hull construction: {0}")]
    OutOfMemory(#[from] TryReserveError),

    /// An adjacency or orientation invariant broke; the hull is not usable.
    #[error("Internal invariant violated: {message} (facets {facets:?})")]
    Bug { message: String, facets: Vec<usize> },

    #[error("Maximum iterations exceeded ({iterations})")]
    MaxIterationsExceeded { iterations: usize },
}

impl ConvexHullError {
    /// Returns `true` when the input itself is at fault rather than the algorithm.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ConvexHullError::InsufficientVertices | ConvexHullError::Degenerate { .. }
        )
    }

    /// Dimension spanned by degenerate input, if this is a `Degenerate` error.
    pub fn degenerate_dimension(&self) -> Option<usize> {
        match self {
            ConvexHullError::Degenerate { dimension, .. } => Some(*dimension),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvexHullError>;
