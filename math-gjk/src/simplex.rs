//! GJK simplex on the Minkowski difference
//!
//! Up to four slots. `Y` is the trial set last evaluated (the retained
//! simplex plus the newest support point), `W ⊆ Y` the members that carry a
//! positive weight in the closest point to the origin. Slots dropped from `W`
//! stay in `Y` until the next insertion so a re-selected support point is
//! recognised as a cycle. Points pushed before the next [`Simplex::reduce`]
//! accumulate in `Y`.

use crate::support::SupportPoint;
use math_convex_hull::Vertex;

/// One vertex of the simplex
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Slot {
    /// Point of the Minkowski difference
    pub point: Vertex,
    /// Support point on the first set
    pub support1: Vertex,
    /// Support point on the second set
    pub support2: Vertex,
    /// Barycentric weight in the current closest point
    pub weight: f64,
    /// Member of the trial set `Y`
    pub in_y: bool,
    /// Member of the retained simplex `W`
    pub in_w: bool,
}

impl Slot {
    fn support_point(&self) -> SupportPoint {
        SupportPoint {
            point: self.point,
            support1: self.support1,
            support2: self.support2,
        }
    }
}

/// Simplex of at most four Minkowski points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simplex {
    slots: [Slot; 4],
    // `Y` has grown since the last reduction
    pending: bool,
}

impl Simplex {
    /// Single-point simplex
    pub fn new(first: SupportPoint) -> Self {
        let mut simplex = Self::default();
        simplex.slots[0] = Slot {
            point: first.point,
            support1: first.support1,
            support2: first.support2,
            weight: 1.0,
            in_y: true,
            in_w: true,
        };
        simplex
    }

    /// Number of members of `W`
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.in_w).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members of `W`
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| s.in_w)
    }

    /// Members of `W` without their weights
    pub fn support_points(&self) -> Vec<SupportPoint> {
        self.slots().map(Slot::support_point).collect()
    }

    /// Weighted combination of the members of `W`
    pub fn closest_point(&self) -> Vertex {
        self.combine(|s| s.point)
    }

    /// Closest points on the two sets reconstructed from the weights
    pub fn witness_points(&self) -> (Vertex, Vertex) {
        (self.combine(|s| s.support1), self.combine(|s| s.support2))
    }

    fn combine(&self, f: impl Fn(&Slot) -> Vertex) -> Vertex {
        self.slots()
            .fold(Vertex::zero(), |acc, s| acc.add(&f(s).scale(s.weight)))
    }

    /// Largest squared norm among the members of `Y`
    pub fn max_norm_squared(&self) -> f64 {
        self.slots
            .iter()
            .filter(|s| s.in_y)
            .map(|s| s.point.magnitude_squared())
            .fold(0.0, f64::max)
    }

    /// Whether `point` is (within `tolerance²`) a member of `Y`
    pub fn contains(&self, point: &Vertex, tolerance_squared: f64) -> bool {
        self.slots
            .iter()
            .any(|s| s.in_y && s.point.distance_squared(point) <= tolerance_squared)
    }

    /// Add a support point, making `Y = W ∪ {point}`
    ///
    /// Further pushes before the next [`Simplex::reduce`] extend `Y` instead.
    /// Returns `false`, leaving the simplex untouched, when no slot is free.
    pub fn push(&mut self, point: SupportPoint) -> bool {
        let free = if self.pending {
            self.slots.iter().position(|s| !s.in_y)
        } else {
            self.slots.iter().position(|s| !s.in_w)
        };
        let Some(free) = free else {
            return false;
        };
        if !self.pending {
            for slot in &mut self.slots {
                slot.in_y = slot.in_w;
            }
        }
        self.pending = true;
        self.slots[free] = Slot {
            point: point.point,
            support1: point.support1,
            support2: point.support2,
            weight: 0.0,
            in_y: true,
            in_w: false,
        };
        true
    }

    /// Closest point of `conv(Y)` to the origin
    ///
    /// Every non-empty subset of `Y` is projected onto its affine hull; the
    /// projection with the smallest norm among those whose weights are all
    /// non-negative is kept. Members whose weight is at most
    /// `weight_epsilon` leave `W`. Returns the new closest point.
    pub fn reduce(&mut self, weight_epsilon: f64) -> Vertex {
        let members: Vec<usize> = (0..4).filter(|&i| self.slots[i].in_y).collect();
        let n = members.len();

        let mut best: Option<(f64, Vec<(usize, f64)>)> = None;
        // Subsets in order of size so ties keep the smaller simplex
        let mut masks: Vec<u32> = (1..(1u32 << n)).collect();
        masks.sort_by_key(|m| m.count_ones());

        for mask in masks {
            let subset: Vec<usize> = (0..n)
                .filter(|&k| mask & (1 << k) != 0)
                .map(|k| members[k])
                .collect();
            let points: Vec<Vertex> = subset.iter().map(|&i| self.slots[i].point).collect();

            let Some(weights) = affine_projection(&points) else {
                continue;
            };
            if weights.iter().any(|&w| w < -weight_epsilon) {
                continue;
            }

            let norm2 = points
                .iter()
                .zip(&weights)
                .fold(Vertex::zero(), |acc, (p, &w)| acc.add(&p.scale(w)))
                .magnitude_squared();
            if best.as_ref().is_none_or(|(b, _)| norm2 < *b) {
                best = Some((norm2, subset.into_iter().zip(weights).collect()));
            }
        }

        for slot in &mut self.slots {
            slot.weight = 0.0;
            slot.in_w = false;
        }
        self.pending = false;

        // Single points always project onto themselves
        if let Some((_, weights)) = best {
            let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
            for (i, w) in weights {
                let w = w.max(0.0) / total;
                if w > weight_epsilon {
                    self.slots[i].weight = w;
                    self.slots[i].in_w = true;
                }
            }
        }

        self.closest_point()
    }
}

/// Barycentric weights of the origin's projection onto the affine hull of `points`
///
/// The first point is the anchor: with `d_i = p_i - p_0` the free weights
/// solve `Σ_j (d_i·d_j) λ_j = -d_i·p_0`. Returns `None` for affinely
/// dependent points.
fn affine_projection(points: &[Vertex]) -> Option<Vec<f64>> {
    let n = points.len();
    if n == 1 {
        return Some(vec![1.0]);
    }

    let anchor = points[0];
    let d: Vec<Vertex> = points[1..].iter().map(|p| p.sub(&anchor)).collect();
    let m = n - 1;

    // Augmented normal equations, m <= 3
    let mut a = [[0.0_f64; 4]; 3];
    for i in 0..m {
        for j in 0..m {
            a[i][j] = d[i].dot(&d[j]);
        }
        a[i][m] = -d[i].dot(&anchor);
    }

    let scale = (0..m).map(|i| a[i][i]).fold(0.0, f64::max);
    if scale <= f64::MIN_POSITIVE {
        return None;
    }

    for col in 0..m {
        let pivot = (col..m)
            .max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() <= 1e-12 * scale {
            return None;
        }
        a.swap(col, pivot);
        for row in (col + 1)..m {
            let factor = a[row][col] / a[col][col];
            for k in col..=m {
                a[row][k] -= factor * a[col][k];
            }
        }
    }

    let mut lambda = [0.0_f64; 3];
    for row in (0..m).rev() {
        let mut rhs = a[row][m];
        for k in (row + 1)..m {
            rhs -= a[row][k] * lambda[k];
        }
        lambda[row] = rhs / a[row][row];
    }

    let mut weights = Vec::with_capacity(n);
    weights.push(1.0 - lambda[..m].iter().sum::<f64>());
    weights.extend_from_slice(&lambda[..m]);
    Some(weights)
}
