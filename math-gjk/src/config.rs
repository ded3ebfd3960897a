//! Tolerances and iteration bounds for proximity queries

use math_convex_hull::HullConfig;
use serde::{Deserialize, Serialize};

/// Numerical settings for [`crate::closest`], [`crate::penetration`] and [`crate::contact`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GjkConfig {
    /// Relative distance tolerance.
    ///
    /// Scaled by the extent of the Minkowski points: closer than that to the
    /// origin counts as touching, and GJK or the refiner stop once a support
    /// query gains less than that fraction.
    pub epsilon: f64,
    /// Barycentric weights at or below this are dropped from the simplex.
    pub weight_epsilon: f64,
    /// Upper bound on GJK support queries.
    pub max_iterations: usize,
    /// Upper bound on penetration refinement rounds.
    pub max_penetration_iterations: usize,
    /// Rounds of extra support queries allowed to enclose the origin.
    pub max_augment_attempts: usize,
    /// Settings for the hulls built during penetration refinement.
    pub hull: HullConfig,
}

impl Default for GjkConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-10,
            weight_epsilon: 1e-12,
            max_iterations: 64,
            max_penetration_iterations: 64,
            max_augment_attempts: 4,
            hull: HullConfig::default(),
        }
    }
}

/// Fluent builder for [`GjkConfig`].
///
/// ```
/// use math_gjk::GjkConfigBuilder;
///
/// let config = GjkConfigBuilder::new()
///     .max_iterations(32)
///     .max_penetration_iterations(128)
///     .build();
/// assert_eq!(config.max_iterations, 32);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GjkConfigBuilder {
    cfg: GjkConfig,
}

impl GjkConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the relative tolerance.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.cfg.epsilon = v;
        self
    }
    /// Sets the weight below which simplex members are dropped.
    pub fn weight_epsilon(mut self, v: f64) -> Self {
        self.cfg.weight_epsilon = v;
        self
    }
    /// Sets the GJK iteration bound.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.cfg.max_iterations = v;
        self
    }
    /// Sets the penetration refinement iteration bound.
    pub fn max_penetration_iterations(mut self, v: usize) -> Self {
        self.cfg.max_penetration_iterations = v;
        self
    }
    /// Sets the number of augmentation rounds.
    pub fn max_augment_attempts(mut self, v: usize) -> Self {
        self.cfg.max_augment_attempts = v;
        self
    }
    /// Sets the hull construction settings.
    pub fn hull(mut self, v: HullConfig) -> Self {
        self.cfg.hull = v;
        self
    }
    /// Finalizes the configuration.
    pub fn build(self) -> GjkConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: GjkConfig =
            serde_json::from_str(r#"{ "max_iterations": 10, "hull": { "epsilon": 1e-8 } }"#)
                .unwrap();
        assert_eq!(cfg.max_iterations, 10);
        assert_eq!(cfg.hull.epsilon, 1e-8);
        assert_eq!(cfg.hull.max_iterations, HullConfig::default().max_iterations);
        assert_eq!(cfg.epsilon, GjkConfig::default().epsilon);
    }

    #[test]
    fn test_builder_overrides() {
        let cfg = GjkConfigBuilder::new()
            .weight_epsilon(1e-9)
            .max_augment_attempts(1)
            .build();
        assert_eq!(cfg.weight_epsilon, 1e-9);
        assert_eq!(cfg.max_augment_attempts, 1);
        assert_eq!(cfg.max_iterations, 64);
    }
}
