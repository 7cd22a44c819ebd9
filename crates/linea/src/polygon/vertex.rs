//! Convex/reflex classification of polygon vertices.
//!
//! A vertex has no type on its own; it is classified from its two ring
//! neighbours and the polygon's plane normal. Input is assumed to wind
//! counter-clockwise about that normal, otherwise every type inverts.

use nalgebra::Vector3;

use super::{Polygon, VertexId};
use crate::error::{GeomError, GeomResult};
use crate::vector::angle3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexType {
    Convex,
    Reflex,
}

/// Corner `prev → this → next` seen against `normal`.
///
/// With `A = next − this`, `B = prev − this` and `θ = ∠(A, B)`: a spike
/// (`θ ≈ 0`) counts as convex, a straight corner (`θ ≈ π`) as reflex, and
/// otherwise the corner is convex iff `(A × B)·normal > 0`.
pub(crate) fn classify(
    prev: &Vector3<f64>,
    this: &Vector3<f64>,
    next: &Vector3<f64>,
    normal: &Vector3<f64>,
    eps: f64,
) -> VertexType {
    let a = next - this;
    let b = prev - this;
    let Some(theta) = angle3(&a, &b) else {
        return VertexType::Convex;
    };
    if theta <= eps {
        VertexType::Convex
    } else if (theta - std::f64::consts::PI).abs() <= eps {
        VertexType::Reflex
    } else if a.cross(&b).dot(normal) > 0.0 {
        VertexType::Convex
    } else {
        VertexType::Reflex
    }
}

impl Polygon {
    pub fn vertex_type(&self, id: VertexId) -> GeomResult<VertexType> {
        let prev = self.vertices.prev(id).ok_or(GeomError::UnknownVertex)?;
        let next = self.vertices.next(id).ok_or(GeomError::UnknownVertex)?;
        let (Some(p), Some(t), Some(n)) = (
            self.vertices.get(prev),
            self.vertices.get(id),
            self.vertices.get(next),
        ) else {
            return Err(GeomError::UnknownVertex);
        };
        Ok(classify(p, t, n, &self.plane.normal, self.cfg.precision))
    }

    pub fn is_convex(&self, id: VertexId) -> GeomResult<bool> {
        Ok(self.vertex_type(id)? == VertexType::Convex)
    }

    pub fn is_reflex(&self, id: VertexId) -> GeomResult<bool> {
        Ok(self.vertex_type(id)? == VertexType::Reflex)
    }

    /// Rebuild the convex/reflex rings from scratch.
    pub fn populate_vertex_type_lists(&mut self) {
        self.convex = Default::default();
        self.reflex = Default::default();
        let ids: Vec<VertexId> = self.vertices.ids().collect();
        for id in ids {
            match self.vertex_type(id) {
                Ok(VertexType::Convex) => {
                    self.convex.append(id);
                }
                Ok(VertexType::Reflex) => {
                    self.reflex.append(id);
                }
                Err(_) => {}
            }
        }
    }

    /// Move `id` to the ring matching its current type, if it is in the other.
    pub(crate) fn update_vertex_type(&mut self, id: VertexId) -> GeomResult<()> {
        let (from, to) = match self.vertex_type(id)? {
            VertexType::Convex => (&mut self.reflex, &mut self.convex),
            VertexType::Reflex => (&mut self.convex, &mut self.reflex),
        };
        if let Some(node) = from.with_data(&id) {
            from.remove(node);
            to.append(id);
        }
        Ok(())
    }

    /// Drop `id` from whichever type ring holds it.
    pub(crate) fn forget_vertex_type(&mut self, id: VertexId) {
        for ring in [&mut self.convex, &mut self.reflex] {
            if let Some(node) = ring.with_data(&id) {
                ring.remove(node);
            }
        }
    }
}
