//! Infinite lines: anchor point plus unit direction.

use nalgebra::{Matrix3, Vector3};

use super::{Geometry, Plane};
use crate::cfg::PRECISION;
use crate::error::{GeomError, GeomResult};
use crate::matrix::rotation3_unit;
use crate::vector::{collinear_dirs3, Vector};

/// Infinite line `anchor + t·direction`.
///
/// Invariants:
/// - `direction` has unit length (normalized at construction).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub anchor: Vector3<f64>,
    pub direction: Vector3<f64>,
}

impl Line {
    /// Fails with `ZeroVector` if `direction` has zero length.
    pub fn new(anchor: Vector3<f64>, direction: Vector3<f64>) -> GeomResult<Self> {
        let r = direction.norm();
        if r == 0.0 || !r.is_finite() {
            return Err(GeomError::ZeroVector);
        }
        Ok(Self {
            anchor,
            direction: direction / r,
        })
    }

    /// From 2D or 3D vectors; 2D input is zero-extended.
    pub fn from_vectors(anchor: &Vector, direction: &Vector) -> GeomResult<Self> {
        Self::new(anchor.to_3d()?, direction.to_3d()?)
    }

    pub fn x_axis() -> Self {
        Self {
            anchor: Vector3::zeros(),
            direction: Vector3::x(),
        }
    }
    pub fn y_axis() -> Self {
        Self {
            anchor: Vector3::zeros(),
            direction: Vector3::y(),
        }
    }
    pub fn z_axis() -> Self {
        Self {
            anchor: Vector3::zeros(),
            direction: Vector3::z(),
        }
    }

    /// Same set of points (parallel and sharing the anchor).
    pub fn eql(&self, other: &Line) -> bool {
        self.eql_eps(other, PRECISION)
    }
    pub fn eql_eps(&self, other: &Line, eps: f64) -> bool {
        self.is_parallel_to_eps(other, eps) && self.contains_eps(other.anchor, eps)
    }

    pub fn translate(&self, v: &Vector3<f64>) -> Line {
        Line {
            anchor: self.anchor + v,
            direction: self.direction,
        }
    }

    pub fn is_parallel_to(&self, obj: impl Into<Geometry>) -> bool {
        self.is_parallel_to_eps(obj, PRECISION)
    }

    /// Direction parallel or antiparallel; against a plane, lying parallel to it.
    pub fn is_parallel_to_eps(&self, obj: impl Into<Geometry>, eps: f64) -> bool {
        match obj.into() {
            Geometry::Line(l) => collinear_dirs3(&self.direction, &l.direction, eps),
            Geometry::Segment(s) => collinear_dirs3(&self.direction, &s.line.direction, eps),
            Geometry::Plane(p) => p.is_parallel_to_eps(*self, eps),
            Geometry::Point(_) => false,
        }
    }

    pub fn distance_from(&self, obj: impl Into<Geometry>) -> f64 {
        match obj.into() {
            Geometry::Point(p) => self.distance_from_point(&p),
            Geometry::Line(l) => {
                if self.is_parallel_to(l) {
                    return self.distance_from_point(&l.anchor);
                }
                let n = self.direction.cross(&l.direction).normalize();
                (self.anchor - l.anchor).dot(&n).abs()
            }
            Geometry::Segment(s) => s.distance_from(*self),
            Geometry::Plane(p) => p.distance_from(*self),
        }
    }

    /// `|PA| · sin θ`, with the squared sine clamped at zero.
    fn distance_from_point(&self, p: &Vector3<f64>) -> f64 {
        let pa = p - self.anchor;
        let mod_pa = pa.norm();
        if mod_pa == 0.0 {
            return 0.0;
        }
        let cos = pa.dot(&self.direction) / mod_pa;
        let sin2 = (1.0 - cos * cos).max(0.0);
        mod_pa * sin2.sqrt()
    }

    pub fn contains(&self, obj: impl Into<Geometry>) -> bool {
        self.contains_eps(obj, PRECISION)
    }

    pub fn contains_eps(&self, obj: impl Into<Geometry>, eps: f64) -> bool {
        match obj.into() {
            Geometry::Point(p) => self.distance_from_point(&p) <= eps,
            Geometry::Line(l) => self.eql_eps(&l, eps),
            Geometry::Segment(s) => {
                self.distance_from_point(&s.start) <= eps && self.distance_from_point(&s.end) <= eps
            }
            Geometry::Plane(_) => false,
        }
    }

    /// Signed parameter of the projection of `p` along `direction`.
    #[inline]
    pub fn position_of(&self, p: &Vector3<f64>) -> f64 {
        (p - self.anchor).dot(&self.direction)
    }

    pub fn lies_in(&self, plane: &Plane) -> bool {
        plane.contains(*self)
    }

    pub fn intersects(&self, obj: impl Into<Geometry>) -> bool {
        self.intersects_eps(obj, PRECISION)
    }

    pub fn intersects_eps(&self, obj: impl Into<Geometry>, eps: f64) -> bool {
        match obj.into() {
            Geometry::Point(p) => self.contains_eps(p, eps),
            Geometry::Line(l) => !self.is_parallel_to_eps(l, eps) && self.distance_from(l) <= eps,
            Geometry::Segment(s) => s.intersects(*self),
            Geometry::Plane(p) => p.intersects_eps(*self, eps),
        }
    }

    /// Meeting point with a line, segment or plane.
    pub fn intersection_with(&self, obj: impl Into<Geometry>) -> GeomResult<Vector3<f64>> {
        match obj.into() {
            Geometry::Point(p) => {
                if self.contains(p) {
                    Ok(p)
                } else {
                    Err(GeomError::NoIntersection)
                }
            }
            Geometry::Line(l) => {
                if !self.intersects(l) {
                    return Err(GeomError::NoIntersection);
                }
                Ok(self.closest_approach(&l))
            }
            Geometry::Segment(s) => s.intersection_with(*self),
            Geometry::Plane(p) => p.intersection_with_line(self),
        }
    }

    /// Point on `self` nearest to `other` (closed form; `other` not parallel).
    fn closest_approach(&self, other: &Line) -> Vector3<f64> {
        let x = self.direction;
        let y = other.direction;
        let w = self.anchor - other.anchor;
        let b = x.dot(&y);
        let d = x.dot(&w);
        let e = y.dot(&w);
        let k = (b * e - d) / (1.0 - b * b);
        self.anchor + x * k
    }

    pub fn point_closest_to(&self, obj: impl Into<Geometry>) -> GeomResult<Vector3<f64>> {
        match obj.into() {
            Geometry::Point(p) => Ok(self.point_closest_to_point(&p)),
            Geometry::Line(l) => {
                if self.intersects(l) {
                    return self.intersection_with(l);
                }
                if self.is_parallel_to(l) {
                    return Err(GeomError::Parallel);
                }
                // Plane through `l` containing the common normal meets `self`
                // at the closest point.
                let n = self.direction.cross(&l.direction);
                let side = Plane::new(l.anchor, l.direction.cross(&n))?;
                side.intersection_with_line(self)
            }
            Geometry::Segment(s) => {
                let p = s.point_closest_to(*self)?;
                Ok(self.point_closest_to_point(&p))
            }
            Geometry::Plane(p) => self.intersection_with(p),
        }
    }

    #[inline]
    pub(crate) fn point_closest_to_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.anchor + self.direction * self.position_of(p)
    }

    /// Rotate by `angle` about `axis` (right-hand rule).
    pub fn rotate(&self, angle: f64, axis: &Line) -> Line {
        self.rotate_by(&rotation3_unit(angle, &axis.direction), axis)
    }

    /// Rotate with a precomputed 3×3 rotation about `axis`.
    pub fn rotate_by(&self, r: &Matrix3<f64>, axis: &Line) -> Line {
        let c = axis.point_closest_to_point(&self.anchor);
        Line {
            anchor: c + r * (self.anchor - c),
            direction: (r * self.direction).normalize(),
        }
    }

    pub fn reverse(&self) -> Line {
        Line {
            anchor: self.anchor,
            direction: -self.direction,
        }
    }

    pub fn reflection_in(&self, obj: impl Into<Geometry>) -> Line {
        match obj.into() {
            Geometry::Plane(p) => {
                let a = p.reflect_point(&self.anchor);
                let b = p.reflect_point(&(self.anchor + self.direction));
                Line {
                    anchor: a,
                    direction: (b - a).normalize(),
                }
            }
            Geometry::Line(l) => self.rotate(std::f64::consts::PI, &l),
            Geometry::Segment(s) => self.rotate(std::f64::consts::PI, &s.line),
            Geometry::Point(q) => Line {
                anchor: q * 2.0 - self.anchor,
                direction: self.direction,
            },
        }
    }
}
