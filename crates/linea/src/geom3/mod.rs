//! 3D lines, segments and planes.
//!
//! Purpose
//! - Anchor + unit-direction lines, bounded segments on top of them, and
//!   anchor + unit-normal planes, with distance / intersection / reflection /
//!   rotation between any pair.
//!
//! Dispatch
//! - Binary operations take `impl Into<Geometry>`; `Geometry` is a closed enum
//!   over {point, line, segment, plane}, so `line.distance_from(plane)` and
//!   `line.distance_from(point)` resolve by pattern matching. Where one side
//!   owns the algorithm (e.g. plane ∩ line) the other side delegates to it.
//!
//! Conventions
//! - Points and directions are `Vector3<f64>`; 2D inputs enter through the
//!   `from_vectors` constructors, which zero-extend them.
//! - Predicates compare against `PRECISION`; `*_eps` variants take the
//!   tolerance explicitly.

mod line;
mod plane;
mod segment;
mod transform;

pub use line::Line;
pub use plane::Plane;
pub use segment::Segment;
pub use transform::Transform;
pub(crate) use transform::Prepared;

use nalgebra::Vector3;

/// Any of the geometric objects a binary operation may be handed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    Point(Vector3<f64>),
    Line(Line),
    Segment(Segment),
    Plane(Plane),
}

impl Geometry {
    /// Shortest distance between two objects (0 when they meet).
    pub fn distance_from(&self, other: Geometry) -> f64 {
        match *self {
            Geometry::Point(p) => match other {
                Geometry::Point(q) => (p - q).norm(),
                Geometry::Line(l) => l.distance_from(p),
                Geometry::Segment(s) => s.distance_from(p),
                Geometry::Plane(pl) => pl.distance_from(p),
            },
            Geometry::Line(l) => l.distance_from(other),
            Geometry::Segment(s) => s.distance_from(other),
            Geometry::Plane(pl) => pl.distance_from(other),
        }
    }
}

impl From<Vector3<f64>> for Geometry {
    fn from(p: Vector3<f64>) -> Self {
        Geometry::Point(p)
    }
}
impl From<&Vector3<f64>> for Geometry {
    fn from(p: &Vector3<f64>) -> Self {
        Geometry::Point(*p)
    }
}
impl From<Line> for Geometry {
    fn from(l: Line) -> Self {
        Geometry::Line(l)
    }
}
impl From<&Line> for Geometry {
    fn from(l: &Line) -> Self {
        Geometry::Line(*l)
    }
}
impl From<Segment> for Geometry {
    fn from(s: Segment) -> Self {
        Geometry::Segment(s)
    }
}
impl From<&Segment> for Geometry {
    fn from(s: &Segment) -> Self {
        Geometry::Segment(*s)
    }
}
impl From<Plane> for Geometry {
    fn from(p: Plane) -> Self {
        Geometry::Plane(p)
    }
}
impl From<&Plane> for Geometry {
    fn from(p: &Plane) -> Self {
        Geometry::Plane(*p)
    }
}

#[cfg(test)]
mod tests;
