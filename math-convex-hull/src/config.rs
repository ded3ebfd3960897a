//! Tolerances and limits for hull construction

use serde::{Deserialize, Serialize};

/// Numerical settings for [`crate::ConvexHull3D::build_with_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Relative distance tolerance of the beneath-beyond test.
    ///
    /// Scaled by the extent of the input (see
    /// [`crate::geometry::compute_relative_epsilon`]); points closer than that
    /// to a facet plane count as lying on it.
    pub epsilon: f64,
    /// Two adjacent facets are flagged for merging when `1 - n1·n2` is below this.
    pub coplanar_tolerance: f64,
    /// Inputs thinner than this fraction of their diameter take the planar fallback.
    ///
    /// Thinner slabs would only produce sliver facets whose planes are too
    /// ill-conditioned for the distance tolerance.
    pub planar_thickness: f64,
    /// Upper bound on point insertion attempts.
    pub max_iterations: usize,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-10,
            coplanar_tolerance: 1e-9,
            planar_thickness: 1e-7,
            max_iterations: 100_000,
        }
    }
}

/// Fluent builder for [`HullConfig`].
///
/// ```
/// use math_convex_hull::HullConfigBuilder;
///
/// let config = HullConfigBuilder::new()
///     .epsilon(1e-9)
///     .max_iterations(5_000)
///     .build();
/// assert_eq!(config.max_iterations, 5_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HullConfigBuilder {
    cfg: HullConfig,
}

impl HullConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the relative distance tolerance.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.cfg.epsilon = v;
        self
    }
    /// Sets the coplanarity tolerance used for merge flags.
    pub fn coplanar_tolerance(mut self, v: f64) -> Self {
        self.cfg.coplanar_tolerance = v;
        self
    }
    /// Sets the relative thickness below which inputs count as planar.
    pub fn planar_thickness(mut self, v: f64) -> Self {
        self.cfg.planar_thickness = v;
        self
    }
    /// Sets the maximum number of insertion attempts.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.cfg.max_iterations = v;
        self
    }
    /// Finalizes the configuration.
    pub fn build(self) -> HullConfig {
        self.cfg
    }
}
