//! Proximity queries between convex sets
//!
//! This library implements the GJK (Gilbert-Johnson-Keerthi) distance
//! algorithm on the Minkowski difference of two convex sets given by their
//! support mappings, and a penetration depth refiner that grows convex hulls
//! (built with `math-convex-hull`) around the origin when the sets overlap.
//!
//! # Distance Example
//! ```
//! use math_convex_hull::{Vertex, testdata};
//! use math_gjk::{GjkConfig, closest};
//!
//! let a = testdata::cube_vertices(1.0);
//! let b = testdata::cube_vertices_at(1.0, Vertex::new(0.0, 2.0, 0.0));
//!
//! let proximity = closest(&a, &b, &GjkConfig::default()).unwrap();
//! println!("Distance: {}", proximity.distance);
//! ```
//!
//! # Penetration Example
//! ```
//! use math_convex_hull::{Vertex, testdata};
//! use math_gjk::{Contact, GjkConfig, contact};
//!
//! let a = testdata::cube_vertices(1.0);
//! let b = testdata::cube_vertices_at(1.0, Vertex::new(0.5, 0.0, 0.0));
//!
//! match contact(&a, &b, &GjkConfig::default()).unwrap() {
//!     Contact::Penetrating(p) => assert!((p.depth - 0.5).abs() < 1e-9),
//!     Contact::Separated { .. } => panic!("cubes overlap"),
//! }
//! ```

mod config;
mod error;
mod gjk;
mod penetration;
mod simplex;
mod support;

pub use config::{GjkConfig, GjkConfigBuilder};
pub use error::{GjkError, Result, Stage};
pub use gjk::{Contact, Proximity, closest, contact, distance};
pub use penetration::{Penetration, penetration};
pub use simplex::{Simplex, Slot};
pub use support::{SupportMap, SupportPoint, Translated, minkowski_support};
