//! Quickhull algorithm implementation for 3D convex hulls
//!
//! Based on:
//! - Barber, C.B., Dobkin, D.P., and Huhdanpaa, H.T., "The Quickhull algorithm
//!   for convex hulls," ACM Trans. on Mathematical Software, 22(4):469-483, 1996.
//!
//! Implementation notes:
//! - Facets live in an arena (`Vec<Facet>` plus a free list); adjacency and
//!   merge flags are stored per edge as handles into that arena
//! - Each facet owns its outside set with the farthest point kept at the front
//! - Coplanar neighbours are flagged at creation and swept into the visible
//!   set together, through an explicit work list
//! - A point lying on the plane of a facet met during the visibility flood is
//!   deferred; deferred points are only forced in once nothing else remains
//! - Scratch buffers are reused across iterations

use crate::geometry::{compute_relative_epsilon, find_extreme_points};
use crate::planar::planar_hull;
use crate::types::{ConvexHull3D, Face, Vertex};
use crate::{ConvexHullError, HullConfig, Result};
use std::collections::{HashMap, HashSet};

/// Stable handle of a facet in the arena
type FacetId = usize;

/// Neighbour slot not bound yet
const NO_FACET: FacetId = usize::MAX;

/// An input point together with its interior flag
#[derive(Debug, Clone, Copy)]
struct HullPoint {
    position: Vertex,
    /// Set once the point is proven inside the hull
    discarded: bool,
}

/// Internal representation of a face during hull construction
///
/// Edge `i` runs from `vertices[i]` to `vertices[(i + 1) % 3]`;
/// `neighbors[i]` and `merge[i]` describe the facet across that edge.
#[derive(Debug, Clone)]
struct Facet {
    vertices: [usize; 3],
    normal: Vertex,
    offset: f64, // normal.dot(v0)
    neighbors: [FacetId; 3],
    merge: [bool; 3],
    outside_points: Vec<usize>,
    furthest_distance: f64,
    alive: bool,
}

impl Facet {
    fn new(v0: usize, v1: usize, v2: usize, points: &[HullPoint]) -> Self {
        let p0 = &points[v0].position;
        let p1 = &points[v1].position;
        let p2 = &points[v2].position;

        // Collinear corners leave a zero normal: such a facet never sees a point
        // and always reports itself mergeable
        let normal = p1
            .sub(p0)
            .cross(&p2.sub(p0))
            .try_normalize()
            .unwrap_or_else(Vertex::zero);

        Self {
            vertices: [v0, v1, v2],
            normal,
            offset: normal.dot(p0),
            neighbors: [NO_FACET; 3],
            merge: [false; 3],
            outside_points: Vec::new(),
            furthest_distance: 0.0,
            alive: true,
        }
    }

    /// Fast signed distance from point to plane (positive = outside)
    #[inline]
    fn signed_distance(&self, point: &Vertex) -> f64 {
        self.normal.dot(point) - self.offset
    }

    /// Index of the edge running `from -> to`
    fn edge_index(&self, from: usize, to: usize) -> Option<usize> {
        (0..3).find(|&i| self.vertices[i] == from && self.vertices[(i + 1) % 3] == to)
    }

    /// Add a point to the outside set, keeping the farthest one in front
    fn assign_point(&mut self, point_idx: usize, distance: f64) -> Result<()> {
        self.outside_points.try_reserve(1)?;
        self.outside_points.push(point_idx);
        if distance > self.furthest_distance {
            self.furthest_distance = distance;
            let last = self.outside_points.len() - 1;
            self.outside_points.swap(0, last);
        }
        Ok(())
    }
}

/// Horizon edge `from -> to` as seen from the visible facet, with the
/// non-visible facet on its far side
#[derive(Debug, Clone, Copy)]
struct HorizonEdge {
    from: usize,
    to: usize,
    outer: FacetId,
}

/// Scratch buffers to avoid allocations in hot loop
struct ScratchBuffers {
    visible: Vec<FacetId>,
    /// Per-facet membership flag of `visible`, indexed by handle
    visible_mark: Vec<bool>,
    horizon: Vec<HorizonEdge>,
    ordered_horizon: Vec<HorizonEdge>,
    edge_by_start: HashMap<usize, usize>,
    orphaned_points: Vec<usize>,
    cone: Vec<FacetId>,
}

impl ScratchBuffers {
    fn new() -> Self {
        Self {
            visible: Vec::with_capacity(64),
            visible_mark: Vec::with_capacity(64),
            horizon: Vec::with_capacity(64),
            ordered_horizon: Vec::with_capacity(64),
            edge_by_start: HashMap::with_capacity(64),
            orphaned_points: Vec::with_capacity(256),
            cone: Vec::with_capacity(64),
        }
    }

    /// Reset everything, including the marks set for the current visible set
    fn clear(&mut self) {
        for &f in &self.visible {
            self.visible_mark[f] = false;
        }
        self.visible.clear();
        self.horizon.clear();
        self.ordered_horizon.clear();
        self.edge_by_start.clear();
        self.orphaned_points.clear();
        self.cone.clear();
    }
}

/// Working state of one hull construction
struct HullBuilder<'a> {
    points: Vec<HullPoint>,
    facets: Vec<Facet>,
    free: Vec<FacetId>,
    tolerance: f64,
    config: &'a HullConfig,
    scratch: ScratchBuffers,
    iterations: usize,
    deferrals: usize,
}

/// Build a convex hull using the Quickhull algorithm
///
/// # Errors
///
/// - [`ConvexHullError::InsufficientVertices`] for an empty slice
/// - [`ConvexHullError::Degenerate`] when the points do not span 3D
/// - [`ConvexHullError::MaxIterationsExceeded`] when `config.max_iterations`
///   insertion attempts were not enough
/// - [`ConvexHullError::OutOfMemory`] and [`ConvexHullError::Bug`] for
///   allocation failure and broken facet adjacency
pub fn quickhull_3d(vertices: &[Vertex], config: &HullConfig) -> Result<ConvexHull3D> {
    if vertices.is_empty() {
        return Err(ConvexHullError::InsufficientVertices);
    }

    let mut builder = HullBuilder::new(vertices, config)?;
    builder.run()?;
    builder.check_adjacency()?;
    let hull = builder.to_hull();

    log::debug!(
        "Quickhull: {} points -> {} vertices, {} faces ({} interior, {} iterations, {} deferred)",
        vertices.len(),
        hull.num_vertices(),
        hull.num_faces(),
        builder.points.iter().filter(|p| p.discarded).count(),
        builder.iterations,
        builder.deferrals
    );

    Ok(hull)
}

impl<'a> HullBuilder<'a> {
    fn new(vertices: &[Vertex], config: &'a HullConfig) -> Result<Self> {
        let mut points = Vec::new();
        points.try_reserve_exact(vertices.len())?;
        points.extend(vertices.iter().map(|&position| HullPoint {
            position,
            discarded: false,
        }));

        Ok(Self {
            points,
            facets: Vec::new(),
            free: Vec::new(),
            tolerance: compute_relative_epsilon(vertices, config.epsilon),
            config,
            scratch: ScratchBuffers::new(),
            iterations: 0,
            deferrals: 0,
        })
    }

    /// Seed with a tetrahedron, assign the remaining points, then insert
    /// outside points until every outside set is empty
    fn run(&mut self) -> Result<()> {
        let simplex = self.find_initial_simplex()?;
        self.create_initial_hull(simplex)?;

        let initial: Vec<FacetId> = (0..self.facets.len()).collect();
        for point_idx in 0..self.points.len() {
            if simplex.contains(&point_idx) {
                continue;
            }
            self.assign_or_discard(point_idx, &initial)?;
        }

        let mut deferred: HashSet<usize> = HashSet::new();
        while let Some((facet, point_idx, forced)) = self.next_point(&deferred) {
            self.iterations += 1;
            if self.iterations > self.config.max_iterations {
                log::error!(
                    "Max iterations exceeded after {} iterations with {} facets",
                    self.iterations - 1,
                    self.facets.iter().filter(|f| f.alive).count()
                );
                return Err(ConvexHullError::MaxIterationsExceeded {
                    iterations: self.config.max_iterations,
                });
            }

            if self.add_point(facet, point_idx, forced)? {
                deferred.clear();
            } else {
                log::trace!("Point {} lies on a facet plane, deferring", point_idx);
                self.deferrals += 1;
                deferred.insert(point_idx);
            }
        }

        Ok(())
    }

    fn signed_distance(&self, facet: FacetId, point_idx: usize) -> f64 {
        self.facets[facet].signed_distance(&self.points[point_idx].position)
    }

    fn bug(message: &str, facets: &[FacetId]) -> ConvexHullError {
        ConvexHullError::Bug {
            message: message.to_string(),
            facets: facets.to_vec(),
        }
    }

    /// Store a facet, recycling a freed handle when one is available
    fn alloc_facet(&mut self, facet: Facet) -> Result<FacetId> {
        if let Some(id) = self.free.pop() {
            self.facets[id] = facet;
            return Ok(id);
        }
        self.facets.try_reserve(1)?;
        self.scratch.visible_mark.try_reserve(1)?;
        self.facets.push(facet);
        self.scratch.visible_mark.push(false);
        Ok(self.facets.len() - 1)
    }

    fn release_facet(&mut self, id: FacetId) {
        let facet = &mut self.facets[id];
        facet.alive = false;
        facet.outside_points = Vec::new();
        self.free.push(id);
    }

    /// Find the initial simplex (tetrahedron) to start the algorithm
    ///
    /// The returned tetrahedron has its fourth point behind the plane of
    /// the first three.
    fn find_initial_simplex(&self) -> Result<[usize; 4]> {
        let positions: Vec<Vertex> = self.points.iter().map(|p| p.position).collect();
        let eps = self.tolerance;

        // Most distant pair among the axis extremes
        let extremes = find_extreme_points(&positions);
        let mut max_distance = 0.0;
        let mut v0 = extremes[0];
        let mut v1 = extremes[0];
        for i in 0..6 {
            for j in (i + 1)..6 {
                let dist = positions[extremes[i]].distance(&positions[extremes[j]]);
                if dist > max_distance {
                    max_distance = dist;
                    v0 = extremes[i];
                    v1 = extremes[j];
                }
            }
        }

        if max_distance <= eps {
            return Err(ConvexHullError::Degenerate {
                dimension: 0,
                planar: None,
            });
        }
        let diameter = max_distance;

        // Point furthest from the line v0-v1
        let line_dir = positions[v1].sub(&positions[v0]).scale(1.0 / max_distance);
        let mut max_distance = 0.0;
        let mut v2 = v0;
        for (i, vertex) in positions.iter().enumerate() {
            let to_point = vertex.sub(&positions[v0]);
            let rejection = to_point.sub(&line_dir.scale(to_point.dot(&line_dir)));
            let dist = rejection.magnitude();
            if dist > max_distance {
                max_distance = dist;
                v2 = i;
            }
        }

        if max_distance <= eps {
            return Err(ConvexHullError::Degenerate {
                dimension: 1,
                planar: None,
            });
        }

        // Point furthest from the plane v0, v1, v2, on either side
        let normal = positions[v1]
            .sub(&positions[v0])
            .cross(&positions[v2].sub(&positions[v0]))
            .normalize();
        let mut max_distance = 0.0;
        let mut signed = 0.0;
        let mut v3 = v0;
        for (i, vertex) in positions.iter().enumerate() {
            let dist = normal.dot(&vertex.sub(&positions[v0]));
            if dist.abs() > max_distance {
                max_distance = dist.abs();
                signed = dist;
                v3 = i;
            }
        }

        let flatness = eps.max(self.config.planar_thickness * diameter);
        if max_distance <= flatness {
            log::debug!(
                "Points lie within {:e} of a plane (limit {:e}), using the planar hull",
                max_distance,
                flatness
            );
            let planar = planar_hull(&positions, [v0, v1, v2], eps).map(Box::new);
            return Err(ConvexHullError::Degenerate {
                dimension: 2,
                planar,
            });
        }

        // The base triangle must face away from the apex
        if signed > 0.0 {
            std::mem::swap(&mut v0, &mut v1);
        }

        Ok([v0, v1, v2, v3])
    }

    /// Create the four facets of the initial tetrahedron and bind them
    fn create_initial_hull(&mut self, simplex: [usize; 4]) -> Result<()> {
        let [a, b, c, d] = simplex;
        let ids = [
            self.alloc_facet(Facet::new(a, b, c, &self.points))?,
            self.alloc_facet(Facet::new(b, a, d, &self.points))?,
            self.alloc_facet(Facet::new(c, b, d, &self.points))?,
            self.alloc_facet(Facet::new(a, c, d, &self.points))?,
        ];

        for &f in &ids {
            for i in 0..3 {
                let from = self.facets[f].vertices[i];
                let to = self.facets[f].vertices[(i + 1) % 3];
                let twin = ids
                    .iter()
                    .copied()
                    .find(|&g| g != f && self.facets[g].edge_index(to, from).is_some())
                    .ok_or_else(|| Self::bug("initial edge has no twin", &[f]))?;
                self.facets[f].neighbors[i] = twin;
            }
        }

        Ok(())
    }

    /// Put a point in the first candidate facet it lies beyond, or mark it interior
    fn assign_or_discard(&mut self, point_idx: usize, candidates: &[FacetId]) -> Result<()> {
        let position = self.points[point_idx].position;
        for &f in candidates {
            let distance = self.facets[f].signed_distance(&position);
            if distance > self.tolerance {
                return self.facets[f].assign_point(point_idx, distance);
            }
        }
        self.points[point_idx].discarded = true;
        Ok(())
    }

    /// Farthest outside point that has not been deferred
    ///
    /// When only deferred points remain, the farthest of them is returned
    /// with `forced = true`.
    fn next_point(&self, deferred: &HashSet<usize>) -> Option<(FacetId, usize, bool)> {
        let mut best: Option<(FacetId, usize, f64)> = None;
        let mut fallback: Option<(FacetId, usize, f64)> = None;

        for (id, facet) in self.facets.iter().enumerate() {
            if !facet.alive || facet.outside_points.is_empty() {
                continue;
            }

            let head = facet.outside_points[0];
            if fallback.is_none_or(|(_, _, d)| facet.furthest_distance > d) {
                fallback = Some((id, head, facet.furthest_distance));
            }

            let candidate = if !deferred.contains(&head) {
                Some((head, facet.furthest_distance))
            } else {
                facet
                    .outside_points
                    .iter()
                    .filter(|&&p| !deferred.contains(&p))
                    .map(|&p| (p, self.signed_distance(id, p)))
                    .max_by(|a, b| a.1.total_cmp(&b.1))
            };

            if let Some((p, d)) = candidate
                && best.is_none_or(|(_, _, bd)| d > bd)
            {
                best = Some((id, p, d));
            }
        }

        match best {
            Some((f, p, _)) => Some((f, p, false)),
            None => fallback.map(|(f, p, _)| (f, p, true)),
        }
    }

    /// Insert an outside point of `facet` into the hull
    ///
    /// Returns `Ok(false)` when the point sits on the plane of a facet reached
    /// by the visibility flood and `forced` is not set; nothing is changed then.
    fn add_point(&mut self, facet: FacetId, point_idx: usize, forced: bool) -> Result<bool> {
        self.scratch.clear();

        if !self.collect_visible(facet, point_idx, forced)? {
            self.scratch.clear();
            return Ok(false);
        }

        self.collect_horizon()?;

        // Gather orphans, then drop the visible facets
        let visible = std::mem::take(&mut self.scratch.visible);
        for &f in &visible {
            let outside = std::mem::take(&mut self.facets[f].outside_points);
            self.scratch.orphaned_points.try_reserve(outside.len())?;
            self.scratch
                .orphaned_points
                .extend(outside.into_iter().filter(|&p| p != point_idx));
        }
        for &f in &visible {
            self.scratch.visible_mark[f] = false;
            self.release_facet(f);
        }

        self.build_cone(point_idx)?;

        let orphans = std::mem::take(&mut self.scratch.orphaned_points);
        let cone = std::mem::take(&mut self.scratch.cone);
        for &orphan in &orphans {
            self.assign_or_discard(orphan, &cone)?;
        }

        // Hand the buffers back for reuse
        self.scratch.visible = visible;
        self.scratch.visible.clear();
        self.scratch.orphaned_points = orphans;
        self.scratch.cone = cone;

        log::trace!(
            "Inserted point {}: horizon of {} edges",
            point_idx,
            self.scratch.ordered_horizon.len()
        );

        Ok(true)
    }

    /// Flood from `start` over facets the point can see, following merge flags
    ///
    /// Returns `Ok(false)` to signal an on-plane abort.
    fn collect_visible(&mut self, start: FacetId, point_idx: usize, forced: bool) -> Result<bool> {
        let position = self.points[point_idx].position;
        let tol = self.tolerance;

        self.scratch.visible.push(start);
        self.scratch.visible_mark[start] = true;

        let mut cursor = 0;
        while cursor < self.scratch.visible.len() {
            let f = self.scratch.visible[cursor];
            cursor += 1;

            for i in 0..3 {
                let n = self.facets[f].neighbors[i];
                if n == NO_FACET || !self.facets[n].alive {
                    return Err(Self::bug("visible facet has a dead neighbour", &[f, n]));
                }
                if self.scratch.visible_mark[n] {
                    continue;
                }

                let distance = self.facets[n].signed_distance(&position);
                let sees = if self.facets[f].merge[i] && distance > -tol {
                    true
                } else if distance > tol {
                    true
                } else if distance >= -tol && !forced {
                    return Ok(false);
                } else {
                    false
                };

                if sees {
                    self.scratch.visible_mark[n] = true;
                    self.scratch.visible.push(n);
                }
            }
        }

        Ok(true)
    }

    /// Collect the edges between visible and hidden facets and chain them
    /// into a closed loop
    fn collect_horizon(&mut self) -> Result<()> {
        for &f in &self.scratch.visible {
            let facet = &self.facets[f];
            for i in 0..3 {
                let n = facet.neighbors[i];
                if !self.scratch.visible_mark[n] {
                    self.scratch.horizon.push(HorizonEdge {
                        from: facet.vertices[i],
                        to: facet.vertices[(i + 1) % 3],
                        outer: n,
                    });
                }
            }
        }

        if self.scratch.horizon.len() < 3 {
            return Err(Self::bug(
                "horizon has fewer than three edges",
                &self.scratch.visible,
            ));
        }

        for (k, edge) in self.scratch.horizon.iter().enumerate() {
            if self.scratch.edge_by_start.insert(edge.from, k).is_some() {
                return Err(Self::bug("horizon is pinched", &[edge.outer]));
            }
        }

        let mut k = 0;
        for _ in 0..self.scratch.horizon.len() {
            let edge = self.scratch.horizon[k];
            self.scratch.ordered_horizon.push(edge);
            k = *self
                .scratch
                .edge_by_start
                .get(&edge.to)
                .ok_or_else(|| Self::bug("horizon is not closed", &[edge.outer]))?;
        }
        if k != 0 {
            return Err(Self::bug(
                "horizon splits into several loops",
                &self.scratch.visible,
            ));
        }

        Ok(())
    }

    /// Create one facet per horizon edge with the new point as apex, bind it
    /// to its cone neighbours and the outer facet, and set merge flags
    fn build_cone(&mut self, apex: usize) -> Result<()> {
        let horizon = std::mem::take(&mut self.scratch.ordered_horizon);
        let mut cone = std::mem::take(&mut self.scratch.cone);
        cone.try_reserve(horizon.len())?;

        for edge in &horizon {
            let id = self.alloc_facet(Facet::new(edge.from, edge.to, apex, &self.points))?;
            cone.push(id);
        }

        let m = cone.len();
        for (k, edge) in horizon.iter().enumerate() {
            let c = cone[k];
            let next = cone[(k + 1) % m];
            let prev = cone[(k + m - 1) % m];

            let j = self.facets[edge.outer]
                .edge_index(edge.to, edge.from)
                .ok_or_else(|| Self::bug("horizon edge missing on outer facet", &[edge.outer, c]))?;

            self.facets[c].neighbors = [edge.outer, next, prev];
            self.facets[edge.outer].neighbors[j] = c;

            let outer_merge = self.should_merge(c, edge.outer);
            self.facets[c].merge[0] = outer_merge;
            self.facets[edge.outer].merge[j] = outer_merge;

            let side_merge = self.should_merge(c, next);
            self.facets[c].merge[1] = side_merge;
            self.facets[next].merge[2] = side_merge;
        }

        self.scratch.ordered_horizon = horizon;
        self.scratch.cone = cone;
        Ok(())
    }

    /// Coplanarity test between two adjacent facets
    ///
    /// True when the normals are nearly parallel, or when the corner of `b`
    /// off the shared edge is not strictly beneath `a` (flat or reflex wedge).
    fn should_merge(&self, a: FacetId, b: FacetId) -> bool {
        let fa = &self.facets[a];
        let fb = &self.facets[b];

        if 1.0 - fa.normal.dot(&fb.normal) < self.config.coplanar_tolerance {
            return true;
        }

        fb.vertices
            .iter()
            .find(|&&v| !fa.vertices.contains(&v))
            .is_some_and(|&v| fa.signed_distance(&self.points[v].position) > -self.tolerance)
    }

    /// Every live facet must point back at each of its neighbours across the
    /// same edge, reversed
    fn check_adjacency(&self) -> Result<()> {
        for (id, facet) in self.facets.iter().enumerate() {
            if !facet.alive {
                continue;
            }
            for i in 0..3 {
                let n = facet.neighbors[i];
                if n == NO_FACET || !self.facets[n].alive {
                    return Err(Self::bug("facet points at a dead neighbour", &[id, n]));
                }
                let from = facet.vertices[i];
                let to = facet.vertices[(i + 1) % 3];
                match self.facets[n].edge_index(to, from) {
                    Some(j) if self.facets[n].neighbors[j] == id => {}
                    _ => return Err(Self::bug("adjacency is not symmetric", &[id, n])),
                }
            }
        }
        Ok(())
    }

    /// Compact the surviving facets and the vertices they use into the output
    fn to_hull(&self) -> ConvexHull3D {
        let mut used = vec![false; self.points.len()];
        for facet in self.facets.iter().filter(|f| f.alive) {
            for &v in &facet.vertices {
                used[v] = true;
            }
        }

        let mut remap = vec![usize::MAX; self.points.len()];
        let mut vertices = Vec::new();
        let mut source_indices = Vec::new();
        for (i, point) in self.points.iter().enumerate() {
            if used[i] {
                remap[i] = vertices.len();
                vertices.push(point.position);
                source_indices.push(i);
            }
        }

        let faces = self
            .facets
            .iter()
            .filter(|f| f.alive)
            .map(|f| {
                let [a, b, c] = f.vertices;
                Face::new(remap[a], remap[b], remap[c])
            })
            .collect();

        ConvexHull3D::new(vertices, faces, source_indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;
    use approx::assert_relative_eq;

    fn build(vertices: &[Vertex]) -> Result<ConvexHull3D> {
        quickhull_3d(vertices, &HullConfig::default())
    }

    #[test]
    fn test_simple_tetrahedron() {
        let vertices = vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
            Vertex::new(0.0, 0.0, 1.0),
        ];

        let hull = build(&vertices).unwrap();
        assert_eq!(hull.num_faces(), 4);
        assert_eq!(hull.num_vertices(), 4);
    }

    #[test]
    fn test_cube() {
        let vertices = testdata::cube_vertices(1.0);

        let hull = build(&vertices).unwrap();
        // A cube has 8 vertices and 12 triangular faces (2 per square face)
        assert_eq!(hull.num_vertices(), 8);
        assert_eq!(hull.num_faces(), 12);
        assert_relative_eq!(hull.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let result = build(&[]);
        assert!(matches!(result, Err(ConvexHullError::InsufficientVertices)));
    }

    #[test]
    fn test_repeated_point_is_zero_dimensional() {
        let vertices = vec![Vertex::new(1.0, 2.0, 3.0); 5];
        let result = build(&vertices);
        assert!(matches!(
            result,
            Err(ConvexHullError::Degenerate {
                dimension: 0,
                planar: None
            })
        ));
    }

    #[test]
    fn test_collinear_is_one_dimensional() {
        let vertices: Vec<Vertex> = (0..6)
            .map(|i| Vertex::new(i as f64, 2.0 * i as f64, 0.5))
            .collect();
        let err = build(&vertices).unwrap_err();
        assert_eq!(err.degenerate_dimension(), Some(1));
    }

    #[test]
    fn test_square_falls_back_to_planar_hull() {
        let vertices = vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(1.0, 1.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ];
        match build(&vertices) {
            Err(ConvexHullError::Degenerate {
                dimension: 2,
                planar: Some(planar),
            }) => {
                assert_eq!(planar.num_vertices(), 4);
                assert_relative_eq!(planar.area(), 1.0, epsilon = 1e-12);
            }
            other => panic!("expected planar fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_thin_slab_falls_back_to_planar_hull() {
        let slab = |thickness: f64| -> Vec<Vertex> {
            testdata::random_box_points(200, 1.0, Vertex::zero())
                .into_iter()
                .map(|v| Vertex::new(v.x, v.y, v.z * thickness))
                .collect()
        };

        let err = build(&slab(1e-9)).unwrap_err();
        match err {
            ConvexHullError::Degenerate {
                dimension: 2,
                planar: Some(planar),
            } => {
                assert!(planar.num_vertices() >= 3);
                assert!(planar.area() > 1.0);
            }
            other => panic!("expected planar fallback, got {other:?}"),
        }

        let hull = build(&slab(1e-3)).unwrap();
        assert!(hull.volume() > 0.0);
        let tol = compute_relative_epsilon(hull.vertices(), HullConfig::default().epsilon);
        for i in 0..hull.num_faces() {
            let (normal, offset) = hull.face_plane(i);
            for v in hull.vertices() {
                assert!(normal.dot(v) - offset <= 10.0 * tol);
            }
        }

        // A zero limit keeps the thin slab three-dimensional
        let config = HullConfig {
            planar_thickness: 0.0,
            ..HullConfig::default()
        };
        assert!(quickhull_3d(&slab(1e-3), &config).is_ok());
    }

    #[test]
    fn test_duplicates_and_interior_points_are_dropped() {
        let mut vertices = testdata::cube_vertices(2.0);
        vertices.extend(testdata::cube_vertices(2.0));
        vertices.push(Vertex::new(0.1, -0.2, 0.3));
        vertices.push(Vertex::zero());

        let hull = build(&vertices).unwrap();
        assert_eq!(hull.num_vertices(), 8);
        assert_eq!(hull.num_faces(), 12);
        for &src in hull.source_indices() {
            assert!(src < vertices.len());
        }
    }

    #[test]
    fn test_cube_merge_flags_pair_square_halves() {
        let vertices = testdata::cube_vertices(1.0);
        let config = HullConfig::default();
        let mut builder = HullBuilder::new(&vertices, &config).unwrap();
        builder.run().unwrap();
        builder.check_adjacency().unwrap();

        let flagged: usize = builder
            .facets
            .iter()
            .filter(|f| f.alive)
            .map(|f| f.merge.iter().filter(|&&m| m).count())
            .sum();
        // Each square face contributes one shared diagonal, flagged from both sides
        assert_eq!(flagged, 12);
    }

    #[test]
    fn test_merge_flood_takes_on_plane_neighbour() {
        // Flat square pyramid over a deep one: the four upper facets are
        // merge-flagged with each other
        let h = 1e-6;
        let vertices = vec![
            Vertex::new(-1.0, -1.0, 0.0),
            Vertex::new(1.0, -1.0, 0.0),
            Vertex::new(1.0, 1.0, 0.0),
            Vertex::new(-1.0, 1.0, 0.0),
            Vertex::new(0.0, 0.0, h),
            Vertex::new(0.0, 0.0, -1.0),
        ];
        let config = HullConfig::default();
        let mut builder = HullBuilder::new(&vertices, &config).unwrap();
        builder.run().unwrap();
        assert_eq!(builder.facets.iter().filter(|f| f.alive).count(), 8);

        fn find(builder: &HullBuilder<'_>, corners: [usize; 3]) -> Option<usize> {
            builder
                .facets
                .iter()
                .position(|f| f.alive && corners.iter().all(|c| f.vertices.contains(c)))
        }
        // Upper facets over the y = 1 and x = 1 edges
        let y_facet = find(&builder, [2, 3, 4]).unwrap();
        let x_facet = find(&builder, [1, 2, 4]).unwrap();
        assert!(builder.facets[y_facet].merge.iter().filter(|&&m| m).count() >= 2);

        // In front of the y facet, on the plane of the x facet
        let point = Vertex::new(0.2, 0.5, 0.8 * h);
        builder.points.push(HullPoint {
            position: point,
            discarded: false,
        });
        let idx = builder.points.len() - 1;
        assert!(builder.signed_distance(y_facet, idx) > builder.tolerance);
        assert!(builder.signed_distance(x_facet, idx).abs() <= builder.tolerance);

        // Without the merge flag the unforced insertion would be deferred
        assert!(builder.add_point(y_facet, idx, false).unwrap());
        builder.check_adjacency().unwrap();
        assert!(find(&builder, [1, 2, 4]).is_none());
        assert_eq!(builder.facets.iter().filter(|f| f.alive).count(), 10);

        for facet in builder.facets.iter().filter(|f| f.alive) {
            for p in &builder.points {
                assert!(facet.signed_distance(&p.position) <= builder.tolerance);
            }
        }
    }

    #[test]
    fn test_iteration_bound_is_reported() {
        let vertices = testdata::fibonacci_sphere_points(200, 1.0);
        let config = HullConfig {
            max_iterations: 3,
            ..HullConfig::default()
        };
        let result = quickhull_3d(&vertices, &config);
        assert!(matches!(
            result,
            Err(ConvexHullError::MaxIterationsExceeded { iterations: 3 })
        ));
    }

    #[test]
    fn test_sphere_adjacency_stays_consistent() {
        let vertices = testdata::fibonacci_sphere_points(500, 1.0);
        let hull = build(&vertices).unwrap();
        // Every point is on the sphere, so all of them are hull vertices
        assert_eq!(hull.num_vertices(), 500);
        // Closed triangulated surface: F = 2V - 4
        assert_eq!(hull.num_faces(), 2 * hull.num_vertices() - 4);
    }
}
