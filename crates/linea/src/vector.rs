//! N-dimensional vectors.
//!
//! `Vector` wraps a `DVector<f64>` and keeps a value-like API: arithmetic
//! returns new vectors, and the only in-place mutator is `set_elements`.
//! Binary operations check dimensionality and return
//! `GeomError::DimensionMismatch` instead of panicking.
//!
//! 3D geometry (lines, planes, polygons) works on `Vector3<f64>`; use
//! `to_3d` / `From<Vector3<f64>>` to cross over.

use std::fmt;

use nalgebra::{DVector, Vector3};
use rand::Rng;

use crate::cfg::PRECISION;
use crate::error::{GeomError, GeomResult};
use crate::geom3::{Geometry, Line, Plane};
use crate::matrix::Matrix;

/// Column vector of arbitrary dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
    elements: DVector<f64>,
}

/// Centre of a rotation: a point in 2D, an axis line in 3D.
#[derive(Clone, Copy, Debug)]
pub enum Pivot<'a> {
    Point(&'a Vector),
    Axis(&'a Line),
}

impl Vector {
    pub fn new(elements: Vec<f64>) -> Self {
        Self {
            elements: DVector::from_vec(elements),
        }
    }

    pub fn from_slice(elements: &[f64]) -> Self {
        Self {
            elements: DVector::from_column_slice(elements),
        }
    }

    pub fn zero(n: usize) -> Self {
        Self {
            elements: DVector::zeros(n),
        }
    }

    /// Uniform entries in `[0, 1)`.
    pub fn random(n: usize) -> Self {
        Self::random_with(n, &mut rand::thread_rng())
    }

    pub fn random_with<R: Rng>(n: usize, rng: &mut R) -> Self {
        Self {
            elements: DVector::from_fn(n, |_, _| rng.gen::<f64>()),
        }
    }

    pub fn i() -> Self {
        Self::new(vec![1.0, 0.0, 0.0])
    }
    pub fn j() -> Self {
        Self::new(vec![0.0, 1.0, 0.0])
    }
    pub fn k() -> Self {
        Self::new(vec![0.0, 0.0, 1.0])
    }

    /// 1-indexed element access.
    #[inline]
    pub fn e(&self, i: usize) -> Option<f64> {
        if i == 0 {
            return None;
        }
        self.elements.get(i - 1).copied()
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn elements(&self) -> &[f64] {
        self.elements.as_slice()
    }

    #[inline]
    pub fn as_dvector(&self) -> &DVector<f64> {
        &self.elements
    }

    /// Replace the coordinates in place (dimension may change).
    pub fn set_elements(&mut self, elements: Vec<f64>) -> &mut Self {
        self.elements = DVector::from_vec(elements);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.elements.iter()
    }

    pub fn map<F: FnMut(f64) -> f64>(&self, f: F) -> Vector {
        Self {
            elements: self.elements.map(f),
        }
    }

    #[inline]
    pub fn modulus(&self) -> f64 {
        self.elements.norm()
    }

    pub fn eql(&self, other: &Vector) -> bool {
        self.eql_eps(other, PRECISION)
    }

    /// Component-wise equality within `eps`; false on dimension mismatch.
    pub fn eql_eps(&self, other: &Vector, eps: f64) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .elements
                .iter()
                .zip(other.elements.iter())
                .all(|(a, b)| (a - b).abs() <= eps)
    }

    /// Unit vector in the same direction; a zero vector is returned unchanged.
    pub fn to_unit_vector(&self) -> Vector {
        let r = self.modulus();
        if r == 0.0 {
            return self.clone();
        }
        self.multiply(1.0 / r)
    }

    /// Angle in `[0, π]`. The cosine is clamped before `acos`.
    pub fn angle_from(&self, other: &Vector) -> GeomResult<f64> {
        GeomError::check_dims(self.dimensions(), other.dimensions())?;
        let m = self.modulus() * other.modulus();
        if m == 0.0 {
            return Err(GeomError::ZeroVector);
        }
        let cos = (self.elements.dot(&other.elements) / m).clamp(-1.0, 1.0);
        Ok(cos.acos())
    }

    pub fn is_parallel_to(&self, other: &Vector) -> GeomResult<bool> {
        self.is_parallel_to_eps(other, PRECISION)
    }
    pub fn is_parallel_to_eps(&self, other: &Vector, eps: f64) -> GeomResult<bool> {
        Ok(self.angle_from(other)? <= eps)
    }

    pub fn is_antiparallel_to(&self, other: &Vector) -> GeomResult<bool> {
        self.is_antiparallel_to_eps(other, PRECISION)
    }
    pub fn is_antiparallel_to_eps(&self, other: &Vector, eps: f64) -> GeomResult<bool> {
        Ok((self.angle_from(other)? - std::f64::consts::PI).abs() <= eps)
    }

    pub fn is_perpendicular_to(&self, other: &Vector) -> GeomResult<bool> {
        self.is_perpendicular_to_eps(other, PRECISION)
    }
    pub fn is_perpendicular_to_eps(&self, other: &Vector, eps: f64) -> GeomResult<bool> {
        Ok((self.angle_from(other)? - std::f64::consts::FRAC_PI_2).abs() <= eps)
    }

    pub fn add(&self, other: &Vector) -> GeomResult<Vector> {
        GeomError::check_dims(self.dimensions(), other.dimensions())?;
        Ok(Self {
            elements: &self.elements + &other.elements,
        })
    }

    pub fn subtract(&self, other: &Vector) -> GeomResult<Vector> {
        GeomError::check_dims(self.dimensions(), other.dimensions())?;
        Ok(Self {
            elements: &self.elements - &other.elements,
        })
    }

    pub fn multiply(&self, k: f64) -> Vector {
        Self {
            elements: &self.elements * k,
        }
    }

    /// Scalar multiple; alias of `multiply`.
    #[inline]
    pub fn x(&self, k: f64) -> Vector {
        self.multiply(k)
    }

    pub fn dot(&self, other: &Vector) -> GeomResult<f64> {
        GeomError::check_dims(self.dimensions(), other.dimensions())?;
        Ok(self.elements.dot(&other.elements))
    }

    /// Cross product, 3D only.
    pub fn cross(&self, other: &Vector) -> GeomResult<Vector> {
        if self.dimensions() != 3 {
            return Err(GeomError::UnsupportedDimension {
                found: self.dimensions(),
            });
        }
        GeomError::check_dims(3, other.dimensions())?;
        Ok(Self::from(self.to_3d()?.cross(&other.to_3d()?)))
    }

    /// Element with the largest magnitude (sign kept); 0 for an empty vector.
    pub fn max(&self) -> f64 {
        self.elements
            .iter()
            .fold(0.0_f64, |m, &x| if x.abs() > m.abs() { x } else { m })
    }

    /// 1-indexed position of the first element equal to `x`.
    pub fn index_of(&self, x: f64) -> Option<usize> {
        self.elements.iter().position(|&e| e == x).map(|i| i + 1)
    }

    pub fn to_diagonal_matrix(&self) -> Matrix {
        Matrix::diagonal(self.elements())
    }

    pub fn round(&self) -> Vector {
        self.map(f64::round)
    }

    /// Snap elements within `PRECISION` of `x` onto `x`.
    pub fn snap_to(&self, x: f64) -> Vector {
        self.map(|e| if (e - x).abs() <= PRECISION { x } else { e })
    }

    /// Euclidean distance to another point of the same dimension.
    pub fn distance_from_point(&self, other: &Vector) -> GeomResult<f64> {
        Ok(self.subtract(other)?.modulus())
    }

    /// Distance to a point, line, segment or plane (3D, 2D is zero-extended).
    pub fn distance_from(&self, obj: impl Into<Geometry>) -> GeomResult<f64> {
        Ok(Geometry::Point(self.to_3d()?).distance_from(obj.into()))
    }

    pub fn lies_on(&self, line: &Line) -> GeomResult<bool> {
        Ok(line.contains(self.to_3d()?))
    }

    pub fn lies_in(&self, plane: &Plane) -> GeomResult<bool> {
        Ok(plane.contains(self.to_3d()?))
    }

    /// Rotate by `angle`: about a point in 2D, about an axis line in 3D.
    pub fn rotate(&self, angle: f64, pivot: Pivot<'_>) -> GeomResult<Vector> {
        match (self.dimensions(), pivot) {
            (2, Pivot::Point(_)) => self.rotate_by(&Matrix::rotation(angle, None)?, pivot),
            (3, Pivot::Axis(line)) => {
                let r = crate::matrix::rotation3(angle, &line.direction)?;
                let p = self.to_3d()?;
                let c = line.point_closest_to_point(&p);
                Ok(Self::from(c + r * (p - c)))
            }
            (n, _) => Err(GeomError::UnsupportedDimension { found: n }),
        }
    }

    /// Rotate with a precomputed rotation matrix (2×2 with a point, 3×3 with an axis).
    pub fn rotate_by(&self, r: &Matrix, pivot: Pivot<'_>) -> GeomResult<Vector> {
        match (self.dimensions(), pivot) {
            (2, Pivot::Point(v)) => {
                GeomError::check_dims(2, v.dimensions())?;
                let rel = self.subtract(v)?;
                r.multiply_vector(&rel)?.add(v)
            }
            (3, Pivot::Axis(line)) => {
                let p = Self::from(line.point_closest_to_point(&self.to_3d()?));
                let rel = self.subtract(&p)?;
                r.multiply_vector(&rel)?.add(&p)
            }
            (n, _) => Err(GeomError::UnsupportedDimension { found: n }),
        }
    }

    /// Mirror image through a point of the same dimension.
    pub fn reflection_in_point(&self, q: &Vector) -> GeomResult<Vector> {
        GeomError::check_dims(self.dimensions(), q.dimensions())?;
        Ok(Self {
            elements: &q.elements * 2.0 - &self.elements,
        })
    }

    /// Mirror image in a point, line, segment (its line) or plane; result is 3D.
    pub fn reflection_in(&self, obj: impl Into<Geometry>) -> GeomResult<Vector> {
        let p = self.to_3d()?;
        let c = match obj.into() {
            Geometry::Point(q) => q,
            Geometry::Line(l) => l.point_closest_to_point(&p),
            Geometry::Segment(s) => s.line.point_closest_to_point(&p),
            Geometry::Plane(pl) => pl.point_closest_to(&p),
        };
        Ok(Self::from(c * 2.0 - p))
    }

    /// Pad a 2D vector with `z = 0`; 3D passes through, anything else fails.
    pub fn to_3d(&self) -> GeomResult<Vector3<f64>> {
        let e = self.elements();
        match e.len() {
            2 => Ok(Vector3::new(e[0], e[1], 0.0)),
            3 => Ok(Vector3::new(e[0], e[1], e[2])),
            n => Err(GeomError::UnsupportedDimension { found: n }),
        }
    }
}

impl From<Vector3<f64>> for Vector {
    fn from(v: Vector3<f64>) -> Self {
        Self::from_slice(v.as_slice())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(v: Vec<f64>) -> Self {
        Self::new(v)
    }
}

impl From<DVector<f64>> for Vector {
    fn from(elements: DVector<f64>) -> Self {
        Self { elements }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, "]")
    }
}

/// Angle between two 3-vectors; `None` if either has zero length.
#[inline]
pub(crate) fn angle3(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let m = a.norm() * b.norm();
    if m == 0.0 {
        return None;
    }
    Some((a.dot(b) / m).clamp(-1.0, 1.0).acos())
}

/// Parallel or antiparallel within `eps` (radians).
#[inline]
pub(crate) fn collinear_dirs3(a: &Vector3<f64>, b: &Vector3<f64>, eps: f64) -> bool {
    angle3(a, b).is_some_and(|t| t <= eps || (t - std::f64::consts::PI).abs() <= eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn modulus_of_three_four() {
        assert_eq!(Vector::new(vec![3.0, 4.0]).modulus(), 5.0);
    }

    #[test]
    fn e_is_one_indexed() {
        let v = Vector::new(vec![7.0, 8.0, 9.0]);
        assert_eq!(v.e(1), Some(7.0));
        assert_eq!(v.e(3), Some(9.0));
        assert_eq!(v.e(0), None);
        assert_eq!(v.e(4), None);
    }

    #[test]
    fn mismatched_dimensions_are_errors() {
        let a = Vector::new(vec![1.0, 2.0]);
        let b = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(
            a.add(&b),
            Err(GeomError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
        assert!(a.dot(&b).is_err());
        assert!(a.angle_from(&b).is_err());
        assert!(a.cross(&a).is_err());
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let k = Vector::i().cross(&Vector::j()).unwrap();
        assert!(k.eql(&Vector::k()));
    }

    #[test]
    fn zero_vector_unit_is_itself() {
        let z = Vector::zero(3);
        assert_eq!(z.to_unit_vector(), z);
    }

    #[test]
    fn angle_and_parallel_predicates() {
        let a = Vector::new(vec![1.0, 0.0, 0.0]);
        let b = Vector::new(vec![0.0, 2.0, 0.0]);
        assert!((a.angle_from(&b).unwrap() - FRAC_PI_2).abs() < 1e-12);
        assert!(a.is_perpendicular_to(&b).unwrap());
        assert!(a.is_parallel_to(&a.multiply(3.0)).unwrap());
        assert!(a.is_antiparallel_to(&a.multiply(-0.5)).unwrap());
        assert_eq!(a.angle_from(&Vector::zero(3)), Err(GeomError::ZeroVector));
    }

    #[test]
    fn angle_clamps_cosine_drift() {
        let a = Vector::new(vec![0.1, 0.2, 0.3]);
        let b = a.multiply(1.0 + 1e-16);
        let t = a.angle_from(&b).unwrap();
        assert!(t.is_finite() && t.abs() < 1e-7);
    }

    #[test]
    fn rotate_2d_about_point() {
        let v = Vector::new(vec![2.0, 1.0]);
        let c = Vector::new(vec![1.0, 1.0]);
        let r = v.rotate(FRAC_PI_2, Pivot::Point(&c)).unwrap();
        assert!(r.eql(&Vector::new(vec![1.0, 2.0])));
    }

    #[test]
    fn rotate_3d_about_axis() {
        let v = Vector::new(vec![1.0, 0.0, 5.0]);
        let r = v.rotate(PI, Pivot::Axis(&Line::z_axis())).unwrap();
        assert!(r.eql(&Vector::new(vec![-1.0, 0.0, 5.0])));
        assert!(v.rotate(PI, Pivot::Point(&v)).is_err());
    }

    #[test]
    fn reflection_in_point_line_and_plane() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        let p = v.reflection_in(Vector3::zeros()).unwrap();
        assert!(p.eql(&Vector::new(vec![-1.0, -2.0, -3.0])));
        let l = v.reflection_in(Line::z_axis()).unwrap();
        assert!(l.eql(&Vector::new(vec![-1.0, -2.0, 3.0])));
        let pl = v.reflection_in(Plane::xy()).unwrap();
        assert!(pl.eql(&Vector::new(vec![1.0, 2.0, -3.0])));
    }

    #[test]
    fn to_3d_pads_and_rejects() {
        assert_eq!(
            Vector::new(vec![1.0, 2.0]).to_3d().unwrap(),
            Vector3::new(1.0, 2.0, 0.0)
        );
        assert!(Vector::new(vec![1.0]).to_3d().is_err());
        assert!(Vector::zero(4).to_3d().is_err());
    }

    #[test]
    fn max_index_of_snap() {
        let v = Vector::new(vec![1.0, -4.0, 3.0]);
        assert_eq!(v.max(), -4.0);
        assert_eq!(v.index_of(3.0), Some(3));
        assert_eq!(v.index_of(5.0), None);
        let s = Vector::new(vec![1.0 + 1e-9, 2.0]).snap_to(1.0);
        assert_eq!(s.e(1), Some(1.0));
    }

    #[test]
    fn distance_and_incidence() {
        let v = Vector::new(vec![0.0, 3.0]);
        assert!((v.distance_from(Line::x_axis()).unwrap() - 3.0).abs() < 1e-12);
        assert!(Vector::new(vec![5.0, 0.0, 0.0]).lies_on(&Line::x_axis()).unwrap());
        assert!(Vector::new(vec![5.0, 2.0]).lies_in(&Plane::xy()).unwrap());
    }

    #[test]
    fn random_is_seeded() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let va = Vector::random_with(5, &mut a);
        assert_eq!(va, Vector::random_with(5, &mut b));
        assert!(va.iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    proptest! {
        #[test]
        fn unit_vector_has_unit_length(xs in prop::collection::vec(-1e3f64..1e3, 1..6)) {
            let v = Vector::new(xs);
            let u = v.to_unit_vector();
            if v.modulus() == 0.0 {
                prop_assert_eq!(u, v);
            } else {
                prop_assert!((u.modulus() - 1.0).abs() <= PRECISION);
            }
        }

        #[test]
        fn double_point_reflection_is_identity(
            xs in prop::collection::vec(-10f64..10.0, 3),
            qs in prop::collection::vec(-10f64..10.0, 3),
        ) {
            let v = Vector::new(xs);
            let q = Vector::new(qs);
            let back = v.reflection_in_point(&q).unwrap().reflection_in_point(&q).unwrap();
            prop_assert!(back.eql(&v));
        }
    }
}
