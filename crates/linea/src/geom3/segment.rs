//! Bounded segments on top of [`Line`].

use nalgebra::Vector3;

use super::{Geometry, Line, Plane};
use crate::cfg::PRECISION;
use crate::error::{GeomError, GeomResult};
use crate::vector::{angle3, Vector};

/// Segment `start → end`; `line` is the carrier line anchored at `start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vector3<f64>,
    pub end: Vector3<f64>,
    pub line: Line,
}

impl Segment {
    /// Fails with `ZeroVector` for coincident endpoints.
    pub fn new(start: Vector3<f64>, end: Vector3<f64>) -> GeomResult<Self> {
        let line = Line::new(start, end - start)?;
        Ok(Self { start, end, line })
    }

    pub fn from_vectors(start: &Vector, end: &Vector) -> GeomResult<Self> {
        Self::new(start.to_3d()?, end.to_3d()?)
    }

    /// Same endpoints, in either orientation.
    pub fn eql(&self, other: &Segment) -> bool {
        let close = |a: &Vector3<f64>, b: &Vector3<f64>| (a - b).norm() <= PRECISION;
        (close(&self.start, &other.start) && close(&self.end, &other.end))
            || (close(&self.start, &other.end) && close(&self.end, &other.start))
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        self.end - self.start
    }

    pub fn midpoint(&self) -> Vector3<f64> {
        (self.start + self.end) * 0.5
    }

    /// Plane through the midpoint, normal along the segment.
    pub fn bisecting_plane(&self) -> Plane {
        Plane {
            anchor: self.midpoint(),
            normal: self.line.direction,
        }
    }

    pub fn translate(&self, v: &Vector3<f64>) -> Segment {
        Segment {
            start: self.start + v,
            end: self.end + v,
            line: self.line.translate(v),
        }
    }

    pub fn is_parallel_to(&self, obj: impl Into<Geometry>) -> bool {
        self.line.is_parallel_to(obj)
    }

    pub fn distance_from(&self, obj: impl Into<Geometry>) -> f64 {
        match obj.into() {
            Geometry::Point(p) => (self.clamp_point(&p) - p).norm(),
            Geometry::Line(l) => {
                if self.line.is_parallel_to(l) {
                    return l.distance_from(self.start);
                }
                match self.point_closest_to(l) {
                    Ok(c) => l.distance_from(c),
                    Err(_) => l.distance_from(self.start),
                }
            }
            Geometry::Segment(s) => {
                let mut d = self
                    .distance_from(s.start)
                    .min(self.distance_from(s.end))
                    .min(s.distance_from(self.start))
                    .min(s.distance_from(self.end));
                // Interior-interior closest pair, when both feet land inside.
                if !self.line.is_parallel_to(s.line) {
                    if let (Ok(a), Ok(b)) = (
                        self.line.point_closest_to(s.line),
                        s.line.point_closest_to(self.line),
                    ) {
                        if self.contains(a) && s.contains(b) {
                            d = d.min((a - b).norm());
                        }
                    }
                }
                d
            }
            Geometry::Plane(p) => {
                if self.intersects(p) {
                    0.0
                } else {
                    p.distance_from(self.start).min(p.distance_from(self.end))
                }
            }
        }
    }

    pub fn contains(&self, obj: impl Into<Geometry>) -> bool {
        self.contains_eps(obj, PRECISION)
    }

    /// Points within `eps` of the closed segment; a segment needs both ends.
    pub fn contains_eps(&self, obj: impl Into<Geometry>, eps: f64) -> bool {
        match obj.into() {
            Geometry::Point(p) => self.contains_point_eps(&p, eps),
            Geometry::Segment(s) => {
                self.contains_point_eps(&s.start, eps) && self.contains_point_eps(&s.end, eps)
            }
            Geometry::Line(_) | Geometry::Plane(_) => false,
        }
    }

    fn contains_point_eps(&self, p: &Vector3<f64>, eps: f64) -> bool {
        let v = self.start - p;
        if v.norm() <= eps {
            return true;
        }
        let along = self.end - self.start;
        match angle3(&v, &along) {
            Some(theta) => (theta - std::f64::consts::PI).abs() <= eps && v.norm() <= along.norm() + eps,
            None => false,
        }
    }

    pub fn intersects(&self, obj: impl Into<Geometry>) -> bool {
        self.intersection_with(obj).is_ok()
    }

    pub fn intersection_with(&self, obj: impl Into<Geometry>) -> GeomResult<Vector3<f64>> {
        let obj = obj.into();
        let p = match obj {
            Geometry::Segment(s) => {
                let p = self.line.intersection_with(s.line)?;
                if !s.contains(p) {
                    return Err(GeomError::NoIntersection);
                }
                p
            }
            other => self.line.intersection_with(other)?,
        };
        if self.contains(p) {
            Ok(p)
        } else {
            Err(GeomError::NoIntersection)
        }
    }

    /// Point on the segment nearest to `obj`.
    pub fn point_closest_to(&self, obj: impl Into<Geometry>) -> GeomResult<Vector3<f64>> {
        match obj.into() {
            Geometry::Point(p) => Ok(self.clamp_point(&p)),
            Geometry::Plane(pl) => {
                if let Ok(p) = self.intersection_with(pl) {
                    return Ok(p);
                }
                let (ds, de) = (pl.distance_from(self.start), pl.distance_from(self.end));
                Ok(if ds <= de { self.start } else { self.end })
            }
            other => {
                let p = self.line.point_closest_to(other)?;
                Ok(self.clamp_point(&p))
            }
        }
    }

    /// Project onto the carrier line and clamp to `[0, length]`.
    fn clamp_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        let t = self.line.position_of(p);
        if t <= 0.0 {
            self.start
        } else if t >= self.length() {
            self.end
        } else {
            self.line.anchor + self.line.direction * t
        }
    }
}
