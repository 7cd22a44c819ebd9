//! Ear-clipping triangulation.
//!
//! Algorithm
//! - Work on a `dup`. While more than three vertices remain, draw a random
//!   convex vertex as ear tip, form the triangle `(tip, next, prev)` and
//!   accept it unless a reflex vertex other than the tip's neighbours lies
//!   inside it or on one of its edges. Accepted tips are removed, which
//!   reclassifies their neighbours.
//! - Draws per clip are capped at `ear_attempts_per_vertex × len`; running out,
//!   or having no convex vertex at all, means the polygon is not simple or does
//!   not wind counter-clockwise about its normal.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use super::{Polygon, VertexId};
use crate::error::{GeomError, GeomResult};

impl Polygon {
    /// Cached ear-clipping triangulation.
    pub fn to_triangles(&mut self) -> GeomResult<&[Polygon]> {
        let tris = match self.cache.triangles.take() {
            Some(t) => t,
            None => self.triangulate_by_ear_clipping()?,
        };
        Ok(self.cache.triangles.insert(tris).as_slice())
    }

    /// Triangulate with draws seeded from `cfg.ear_seed`.
    pub fn triangulate_by_ear_clipping(&self) -> GeomResult<Vec<Polygon>> {
        let mut rng = StdRng::seed_from_u64(self.cfg.ear_seed);
        self.triangulate_with_rng(&mut rng)
    }

    pub fn triangulate_with_rng<R: Rng>(&self, rng: &mut R) -> GeomResult<Vec<Polygon>> {
        let mut poly = self.dup();
        let mut triangles = Vec::with_capacity(self.len().saturating_sub(2));
        while !poly.is_triangle() {
            let (tip, ear) = poly.draw_ear(rng)?;
            trace!(remaining = poly.len(), "clipped ear");
            triangles.push(ear);
            poly.remove_vertex(tip)?;
        }
        poly.clear_cache();
        triangles.push(poly);
        Ok(triangles)
    }

    /// Random convex vertex whose triangle is a valid ear, with that triangle.
    pub(super) fn draw_ear<R: Rng>(&self, rng: &mut R) -> GeomResult<(VertexId, Polygon)> {
        let budget = self.cfg.ear_attempts_per_vertex.max(1) * self.len();
        for attempt in 0..budget {
            let tip = self
                .convex
                .random_node(rng)
                .and_then(|node| self.convex.get(node).copied())
                .ok_or_else(|| GeomError::degenerate("no convex vertex left to clip"))?;
            let candidate = self.ear_candidate(tip)?;
            if self.is_ear(tip, &candidate)? {
                return Ok((tip, candidate));
            }
            debug!(attempt, vertices = self.len(), "rejected ear candidate");
        }
        warn!(vertices = self.len(), budget, "ear clipping ran out of attempts");
        Err(GeomError::degenerate(
            "no ear found; polygon is self-intersecting or wound against its normal",
        ))
    }

    /// Triangle `(tip, next, prev)` on the polygon's plane.
    fn ear_candidate(&self, tip: VertexId) -> GeomResult<Polygon> {
        let next = self.vertices.next(tip).ok_or(GeomError::UnknownVertex)?;
        let prev = self.vertices.prev(tip).ok_or(GeomError::UnknownVertex)?;
        let at = |id| self.vertex(id).ok_or(GeomError::UnknownVertex);
        Ok(Polygon::triangle(at(tip)?, at(next)?, at(prev)?, self.plane, self.cfg))
    }

    fn is_ear(&self, tip: VertexId, candidate: &Polygon) -> GeomResult<bool> {
        let next = self.vertices.next(tip).ok_or(GeomError::UnknownVertex)?;
        let prev = self.vertices.prev(tip).ok_or(GeomError::UnknownVertex)?;
        for r in self.reflex.iter().copied() {
            if r == next || r == prev {
                continue;
            }
            let p = self.vertex(r).ok_or(GeomError::UnknownVertex)?;
            if candidate.contains(&p) || candidate.has_edge_containing(&p) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
