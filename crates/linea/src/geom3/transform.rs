//! Rigid and similarity transforms applied uniformly to points and planes.
//!
//! A polygon applies one `Transform` to its vertices, its supporting plane and
//! every cached sub-triangle, so derived geometry stays valid without being
//! recomputed.

use nalgebra::{Matrix3, Vector3};

use super::{Line, Plane};
use crate::matrix::rotation3_unit;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    Translate(Vector3<f64>),
    /// Rotation by `angle` radians about `axis` (right-hand rule).
    Rotate { angle: f64, axis: Line },
    /// Uniform scaling about `center`.
    Scale { factor: f64, center: Vector3<f64> },
}

impl Transform {
    /// Point-wise action together with a precomputed rotation matrix, so that
    /// repeated application does not rebuild it.
    pub(crate) fn prepared(&self) -> Prepared {
        match *self {
            Transform::Rotate { angle, axis } => Prepared {
                t: *self,
                rotation: rotation3_unit(angle, &axis.direction),
            },
            _ => Prepared {
                t: *self,
                rotation: Matrix3::identity(),
            },
        }
    }

    pub fn apply_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.prepared().point(p)
    }

    pub fn apply_plane(&self, plane: &Plane) -> Plane {
        self.prepared().plane(plane)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Prepared {
    t: Transform,
    rotation: Matrix3<f64>,
}

impl Prepared {
    pub(crate) fn point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        match self.t {
            Transform::Translate(v) => p + v,
            Transform::Rotate { axis, .. } => {
                let c = axis.point_closest_to_point(p);
                c + self.rotation * (p - c)
            }
            Transform::Scale { factor, center } => center + (p - center) * factor,
        }
    }

    pub(crate) fn plane(&self, plane: &Plane) -> Plane {
        match self.t {
            Transform::Translate(v) => plane.translate(&v),
            Transform::Rotate { axis, .. } => plane.rotate_by(&self.rotation, &axis),
            Transform::Scale { .. } => Plane {
                anchor: self.point(&plane.anchor),
                normal: plane.normal,
            },
        }
    }
}
