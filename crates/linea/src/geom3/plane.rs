//! Planes: anchor point plus unit normal.

use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

use super::{Geometry, Line};
use crate::cfg::PRECISION;
use crate::error::{GeomError, GeomResult};
use crate::matrix::rotation3_unit;
use crate::vector::{angle3, collinear_dirs3, Vector};

/// Plane `{ x : (x − anchor)·normal = 0 }`, `normal` of unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub anchor: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Fails with `ZeroVector` if `normal` has zero length.
    pub fn new(anchor: Vector3<f64>, normal: Vector3<f64>) -> GeomResult<Self> {
        let r = normal.norm();
        if r == 0.0 || !r.is_finite() {
            return Err(GeomError::ZeroVector);
        }
        Ok(Self {
            anchor,
            normal: normal / r,
        })
    }

    /// Plane through three points; `Collinear` if they span no plane.
    pub fn through_points(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> GeomResult<Self> {
        Self::through_points_eps(a, b, c, PRECISION)
    }

    pub fn through_points_eps(
        a: Vector3<f64>,
        b: Vector3<f64>,
        c: Vector3<f64>,
        eps: f64,
    ) -> GeomResult<Self> {
        let (u, v) = (b - a, c - a);
        let n = u.cross(&v);
        if spans_no_area(n.norm(), u.norm_squared().max(v.norm_squared()), eps) {
            return Err(GeomError::Collinear);
        }
        Self::new(a, n)
    }

    /// `(anchor, normal)` or, with `v2` given, `(anchor, p1, p2)` through three points.
    pub fn from_anchor_vectors(anchor: &Vector, v1: &Vector, v2: Option<&Vector>) -> GeomResult<Self> {
        let a = anchor.to_3d()?;
        let b = v1.to_3d()?;
        match v2 {
            None => Self::new(a, b),
            Some(v2) => Self::through_points(a, b, v2.to_3d()?),
        }
    }

    pub fn from_points(points: &[Vector3<f64>]) -> GeomResult<Self> {
        Self::from_points_eps(points, PRECISION)
    }

    /// Plane of an ordered point loop.
    ///
    /// The normal is the summed corner cross products
    /// `Σ (pᵢ − p₀) × (pᵢ₊₁ − p₀)` (twice the signed area vector), so the loop
    /// runs counter-clockwise about it for any simple polygon, convex or not.
    /// Fails with `Collinear` when the loop encloses no area relative to its
    /// extent and `NotCoplanar` when a point is off the plane by more than
    /// `eps`.
    pub fn from_points_eps(points: &[Vector3<f64>], eps: f64) -> GeomResult<Self> {
        let n = points.len();
        if n < 3 {
            return Err(GeomError::TooFewPoints { needed: 3, found: n });
        }
        let origin = points[0];
        let total: Vector3<f64> = (0..n)
            .map(|i| (points[i] - origin).cross(&(points[(i + 1) % n] - origin)))
            .sum();
        let r = total.norm();
        let extent_sq = points
            .iter()
            .map(|p| (p - origin).norm_squared())
            .fold(0.0_f64, f64::max);
        if spans_no_area(r, extent_sq, eps) {
            return Err(GeomError::Collinear);
        }
        let normal = total / r;
        if points.iter().any(|p| (p - origin).dot(&normal).abs() > eps) {
            return Err(GeomError::NotCoplanar);
        }
        Ok(Self {
            anchor: origin,
            normal,
        })
    }

    pub fn xy() -> Self {
        Self {
            anchor: Vector3::zeros(),
            normal: Vector3::z(),
        }
    }
    pub fn yz() -> Self {
        Self {
            anchor: Vector3::zeros(),
            normal: Vector3::x(),
        }
    }
    pub fn zx() -> Self {
        Self {
            anchor: Vector3::zeros(),
            normal: Vector3::y(),
        }
    }

    /// Same set of points; the normal's orientation is ignored.
    pub fn eql(&self, other: &Plane) -> bool {
        self.eql_eps(other, PRECISION)
    }
    pub fn eql_eps(&self, other: &Plane, eps: f64) -> bool {
        self.contains_eps(other.anchor, eps) && self.is_parallel_to_eps(*other, eps)
    }

    pub fn translate(&self, v: &Vector3<f64>) -> Plane {
        Plane {
            anchor: self.anchor + v,
            normal: self.normal,
        }
    }

    pub fn is_parallel_to(&self, obj: impl Into<Geometry>) -> bool {
        self.is_parallel_to_eps(obj, PRECISION)
    }

    pub fn is_parallel_to_eps(&self, obj: impl Into<Geometry>, eps: f64) -> bool {
        let perp = |d: &Vector3<f64>| {
            angle3(&self.normal, d).is_some_and(|t| (t - std::f64::consts::FRAC_PI_2).abs() <= eps)
        };
        match obj.into() {
            Geometry::Plane(p) => collinear_dirs3(&self.normal, &p.normal, eps),
            Geometry::Line(l) => perp(&l.direction),
            Geometry::Segment(s) => perp(&s.line.direction),
            Geometry::Point(_) => false,
        }
    }

    /// Normals at a right angle.
    pub fn is_perpendicular_to(&self, other: &Plane) -> bool {
        angle3(&self.normal, &other.normal)
            .is_some_and(|t| (t - std::f64::consts::FRAC_PI_2).abs() <= PRECISION)
    }

    #[inline]
    fn signed_distance(&self, p: &Vector3<f64>) -> f64 {
        (p - self.anchor).dot(&self.normal)
    }

    pub fn distance_from(&self, obj: impl Into<Geometry>) -> f64 {
        match obj.into() {
            Geometry::Point(p) => self.signed_distance(&p).abs(),
            Geometry::Line(l) => {
                if self.is_parallel_to(l) {
                    self.signed_distance(&l.anchor).abs()
                } else {
                    0.0
                }
            }
            Geometry::Segment(s) => s.distance_from(*self),
            Geometry::Plane(p) => {
                if self.is_parallel_to(p) {
                    self.signed_distance(&p.anchor).abs()
                } else {
                    0.0
                }
            }
        }
    }

    pub fn contains(&self, obj: impl Into<Geometry>) -> bool {
        self.contains_eps(obj, PRECISION)
    }

    pub fn contains_eps(&self, obj: impl Into<Geometry>, eps: f64) -> bool {
        match obj.into() {
            Geometry::Point(p) => self.signed_distance(&p).abs() <= eps,
            Geometry::Line(l) => {
                self.contains_eps(l.anchor, eps) && self.contains_eps(l.anchor + l.direction, eps)
            }
            Geometry::Segment(s) => self.contains_eps(s.start, eps) && self.contains_eps(s.end, eps),
            Geometry::Plane(p) => self.eql_eps(&p, eps),
        }
    }

    pub fn intersects(&self, obj: impl Into<Geometry>) -> bool {
        self.intersects_eps(obj, PRECISION)
    }

    pub fn intersects_eps(&self, obj: impl Into<Geometry>, eps: f64) -> bool {
        match obj.into() {
            Geometry::Point(p) => self.contains_eps(p, eps),
            Geometry::Line(l) => !self.is_parallel_to_eps(l, eps) || self.contains_eps(l, eps),
            Geometry::Segment(s) => s.intersects(*self),
            Geometry::Plane(p) => !self.is_parallel_to_eps(p, eps),
        }
    }

    /// Point for a line or segment, line for a plane.
    pub fn intersection_with(&self, obj: impl Into<Geometry>) -> GeomResult<Geometry> {
        match obj.into() {
            Geometry::Line(l) => self.intersection_with_line(&l).map(Geometry::Point),
            Geometry::Segment(s) => s.intersection_with(*self).map(Geometry::Point),
            Geometry::Plane(p) => self.intersection_with_plane(&p).map(Geometry::Line),
            Geometry::Point(p) => {
                if self.contains(p) {
                    Ok(Geometry::Point(p))
                } else {
                    Err(GeomError::NoIntersection)
                }
            }
        }
    }

    /// Single crossing point; a parallel line (inside or not) has none.
    pub fn intersection_with_line(&self, line: &Line) -> GeomResult<Vector3<f64>> {
        let denom = self.normal.dot(&line.direction);
        if self.is_parallel_to(*line) || denom == 0.0 {
            return Err(GeomError::NoIntersection);
        }
        let t = (self.anchor - line.anchor).dot(&self.normal) / denom;
        Ok(line.anchor + line.direction * t)
    }

    /// Common line of two non-parallel planes.
    pub fn intersection_with_plane(&self, other: &Plane) -> GeomResult<Line> {
        if self.is_parallel_to(*other) {
            return Err(GeomError::NoIntersection);
        }
        let direction = self.normal.cross(&other.normal);
        // Fix the coordinate along which the line moves fastest at zero and
        // solve the remaining 2×2 system.
        let k = direction.iamax();
        let (i, j) = match k {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let (n1, n2) = (self.normal, other.normal);
        let m = Matrix2::new(n1[i], n1[j], n2[i], n2[j]);
        let rhs = Vector2::new(n1.dot(&self.anchor), n2.dot(&other.anchor));
        let inv = m.try_inverse().ok_or(GeomError::Singular)?;
        let sol = inv * rhs;
        let mut anchor = Vector3::zeros();
        anchor[i] = sol[0];
        anchor[j] = sol[1];
        Line::new(anchor, direction)
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn point_closest_to(&self, p: &Vector3<f64>) -> Vector3<f64> {
        p - self.normal * self.signed_distance(p)
    }

    pub(crate) fn reflect_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        p - self.normal * (2.0 * self.signed_distance(p))
    }

    /// Rotate by `angle` about `axis` (right-hand rule).
    pub fn rotate(&self, angle: f64, axis: &Line) -> Plane {
        self.rotate_by(&rotation3_unit(angle, &axis.direction), axis)
    }

    pub fn rotate_by(&self, r: &Matrix3<f64>, axis: &Line) -> Plane {
        let c = axis.point_closest_to_point(&self.anchor);
        Plane {
            anchor: c + r * (self.anchor - c),
            normal: (r * self.normal).normalize(),
        }
    }

    pub fn reflection_in(&self, obj: impl Into<Geometry>) -> Plane {
        match obj.into() {
            Geometry::Plane(p) => {
                let a = p.reflect_point(&self.anchor);
                let b = p.reflect_point(&(self.anchor + self.normal));
                Plane {
                    anchor: a,
                    normal: (b - a).normalize(),
                }
            }
            Geometry::Line(l) => self.rotate(std::f64::consts::PI, &l),
            Geometry::Segment(s) => self.rotate(std::f64::consts::PI, &s.line),
            Geometry::Point(q) => Plane {
                anchor: q * 2.0 - self.anchor,
                normal: self.normal,
            },
        }
    }
}

/// Cross-product magnitude `r` of edges no longer than `√extent_sq` is
/// negligible. Relative to the squared extent, so the test does not depend on
/// the size of the figure.
#[inline]
fn spans_no_area(r: f64, extent_sq: f64, eps: f64) -> bool {
    r <= eps * extent_sq
}
