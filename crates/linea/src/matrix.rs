//! Dense M×N matrices.
//!
//! `Matrix` wraps a `DMatrix<f64>`, so zero-row and zero-column matrices are
//! valid "empty" values. Accessors are 1-indexed (`e`, `row`, `col`) and
//! return `None` out of range.
//!
//! Elimination
//! - `to_right_triangular`, `determinant`, `rank` share one Gaussian
//!   elimination with partial pivoting that tracks the sign of row swaps.
//! - `inverse` is Gauss-Jordan on `[M | I]` with the same pivoting rule.
//! - Pivots at or below `PIVOT_EPS · max|m_ij|` count as zero for
//!   determinant/inverse; `rank` uses the absolute `PRECISION`.

use std::fmt;

use nalgebra::{DMatrix, Matrix3, Vector3};
use rand::Rng;

use crate::cfg::{PIVOT_EPS, PRECISION};
use crate::error::{GeomError, GeomResult};
use crate::vector::Vector;

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    elements: DMatrix<f64>,
}

/// Right operand of `Matrix::x`.
#[derive(Clone, Copy, Debug)]
pub enum Factor<'a> {
    Scalar(f64),
    Matrix(&'a Matrix),
}

impl From<f64> for Factor<'_> {
    fn from(k: f64) -> Self {
        Factor::Scalar(k)
    }
}

impl<'a> From<&'a Matrix> for Factor<'a> {
    fn from(m: &'a Matrix) -> Self {
        Factor::Matrix(m)
    }
}

/// Row echelon form plus bookkeeping from the elimination.
struct Echelon {
    m: DMatrix<f64>,
    /// (-1)^(row swaps)
    sign: f64,
    /// Number of pivots found.
    rank: usize,
}

fn eliminate(src: &DMatrix<f64>, eps: f64) -> Echelon {
    let mut a = src.clone();
    let (rows, cols) = a.shape();
    let mut sign = 1.0;
    let mut r = 0;
    for c in 0..cols {
        if r == rows {
            break;
        }
        let mut p = r;
        let mut pmax = a[(r, c)].abs();
        for i in r + 1..rows {
            let v = a[(i, c)].abs();
            if v > pmax {
                p = i;
                pmax = v;
            }
        }
        if pmax <= eps {
            for i in r..rows {
                a[(i, c)] = 0.0;
            }
            continue;
        }
        if p != r {
            a.swap_rows(p, r);
            sign = -sign;
        }
        let piv = a[(r, c)];
        for i in r + 1..rows {
            let f = a[(i, c)] / piv;
            if f != 0.0 {
                for j in c + 1..cols {
                    let v = a[(r, j)];
                    a[(i, j)] -= f * v;
                }
            }
            a[(i, c)] = 0.0;
        }
        r += 1;
    }
    Echelon {
        m: a,
        sign,
        rank: r,
    }
}

/// Zero-row matrices are stored as 0×0 so `cols()` agrees with the storage.
#[inline]
fn normalized(m: DMatrix<f64>) -> DMatrix<f64> {
    if m.nrows() == 0 {
        DMatrix::zeros(0, 0)
    } else {
        m
    }
}

#[inline]
fn pivot_tol(m: &DMatrix<f64>) -> f64 {
    PIVOT_EPS * m.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

/// 3×3 rotation by `angle` about `axis` (right-hand rule, Rodrigues).
pub(crate) fn rotation3(angle: f64, axis: &Vector3<f64>) -> GeomResult<Matrix3<f64>> {
    let r = axis.norm();
    if r == 0.0 {
        return Err(GeomError::ZeroVector);
    }
    Ok(rotation3_unit(angle, &(axis / r)))
}

/// Same as `rotation3` for an axis already of unit length.
pub(crate) fn rotation3_unit(angle: f64, u: &Vector3<f64>) -> Matrix3<f64> {
    let (x, y, z) = (u.x, u.y, u.z);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    Matrix3::new(
        t * x * x + c,
        t * x * y - s * z,
        t * x * z + s * y,
        t * x * y + s * z,
        t * y * y + c,
        t * y * z - s * x,
        t * x * z - s * y,
        t * y * z + s * x,
        t * z * z + c,
    )
}

impl Matrix {
    /// Build from rows; all rows must have equal length.
    pub fn new(rows: Vec<Vec<f64>>) -> GeomResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        for (i, r) in rows.iter().enumerate() {
            if r.len() != ncols {
                return Err(GeomError::RaggedRows {
                    row: i + 1,
                    expected: ncols,
                    found: r.len(),
                });
            }
        }
        Ok(Self {
            elements: DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]),
        })
    }

    /// `n × n` identity; `n = 0` gives the empty matrix.
    pub fn identity(n: usize) -> Self {
        Self {
            elements: DMatrix::identity(n, n),
        }
    }

    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            elements: normalized(DMatrix::zeros(rows, cols)),
        }
    }

    pub fn random(rows: usize, cols: usize) -> Self {
        Self::random_with(rows, cols, &mut rand::thread_rng())
    }

    pub fn random_with<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self {
            elements: normalized(DMatrix::from_fn(rows, cols, |_, _| rng.gen::<f64>())),
        }
    }

    pub fn diagonal(entries: &[f64]) -> Self {
        let n = entries.len();
        Self {
            elements: DMatrix::from_fn(n, n, |i, j| if i == j { entries[i] } else { 0.0 }),
        }
    }

    /// 2×2 rotation without an axis, 3×3 rotation about `axis` otherwise.
    pub fn rotation(angle: f64, axis: Option<&Vector3<f64>>) -> GeomResult<Self> {
        match axis {
            None => {
                let (s, c) = angle.sin_cos();
                Self::new(vec![vec![c, -s], vec![s, c]])
            }
            Some(a) => Ok(Self::from(rotation3(angle, a)?)),
        }
    }

    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from(Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c))
    }

    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from(Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c))
    }

    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from(Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0))
    }

    /// 1-indexed element access.
    #[inline]
    pub fn e(&self, i: usize, j: usize) -> Option<f64> {
        if i == 0 || j == 0 {
            return None;
        }
        self.elements.get((i - 1, j - 1)).copied()
    }

    /// 1-indexed row as a vector.
    pub fn row(&self, i: usize) -> Option<Vector> {
        if i == 0 || i > self.rows() {
            return None;
        }
        Some(Vector::new(self.elements.row(i - 1).iter().copied().collect()))
    }

    /// 1-indexed column as a vector.
    pub fn col(&self, j: usize) -> Option<Vector> {
        if j == 0 || j > self.cols() {
            return None;
        }
        Some(Vector::new(self.elements.column(j - 1).iter().copied().collect()))
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.elements.nrows()
    }

    /// Column count; an empty (zero-row) matrix has zero columns.
    #[inline]
    pub fn cols(&self) -> usize {
        if self.rows() == 0 {
            0
        } else {
            self.elements.ncols()
        }
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    #[inline]
    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.elements
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.elements
            .row_iter()
            .map(|r| r.iter().copied().collect())
            .collect()
    }

    pub fn set_elements(&mut self, rows: Vec<Vec<f64>>) -> GeomResult<&mut Self> {
        *self = Self::new(rows)?;
        Ok(self)
    }

    pub fn eql(&self, other: &Matrix) -> bool {
        self.eql_eps(other, PRECISION)
    }

    pub fn eql_eps(&self, other: &Matrix, eps: f64) -> bool {
        self.is_same_size_as(other)
            && self
                .elements
                .iter()
                .zip(other.elements.iter())
                .all(|(a, b)| (a - b).abs() <= eps)
    }

    pub fn map<F: FnMut(f64) -> f64>(&self, f: F) -> Matrix {
        Self {
            elements: self.elements.map(f),
        }
    }

    #[inline]
    pub fn is_same_size_as(&self, other: &Matrix) -> bool {
        self.dimensions() == other.dimensions()
    }

    pub fn add(&self, other: &Matrix) -> GeomResult<Matrix> {
        self.check_same_size(other)?;
        Ok(Self {
            elements: &self.elements + &other.elements,
        })
    }

    pub fn subtract(&self, other: &Matrix) -> GeomResult<Matrix> {
        self.check_same_size(other)?;
        Ok(Self {
            elements: &self.elements - &other.elements,
        })
    }

    fn check_same_size(&self, other: &Matrix) -> GeomResult<()> {
        GeomError::check_dims(self.rows(), other.rows())?;
        GeomError::check_dims(self.cols(), other.cols())
    }

    /// True if `self · other` is defined.
    #[inline]
    pub fn can_multiply_from_left(&self, other: &Matrix) -> bool {
        self.cols() == other.rows()
    }

    pub fn multiply(&self, other: &Matrix) -> GeomResult<Matrix> {
        GeomError::check_dims(self.cols(), other.rows())?;
        Ok(Self {
            elements: &self.elements * &other.elements,
        })
    }

    pub fn multiply_vector(&self, v: &Vector) -> GeomResult<Vector> {
        GeomError::check_dims(self.cols(), v.dimensions())?;
        Ok(Vector::from(&self.elements * v.as_dvector()))
    }

    pub fn scale(&self, k: f64) -> Matrix {
        Self {
            elements: &self.elements * k,
        }
    }

    /// `scale` for a scalar, `multiply` for a matrix.
    pub fn x<'a>(&self, by: impl Into<Factor<'a>>) -> GeomResult<Matrix> {
        match by.into() {
            Factor::Scalar(k) => Ok(self.scale(k)),
            Factor::Matrix(m) => self.multiply(m),
        }
    }

    /// `rows × cols` block starting at 1-indexed `(i, j)`, wrapping around edges.
    pub fn minor(&self, i: usize, j: usize, rows: usize, cols: usize) -> Option<Matrix> {
        let (nr, nc) = self.dimensions();
        if i == 0 || j == 0 || nr == 0 || nc == 0 {
            return None;
        }
        Some(Self::from(DMatrix::from_fn(rows, cols, |a, b| {
            self.elements[((i - 1 + a) % nr, (j - 1 + b) % nc)]
        })))
    }

    pub fn transpose(&self) -> Matrix {
        Self {
            elements: normalized(self.elements.transpose()),
        }
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    fn check_square(&self) -> GeomResult<usize> {
        if self.is_square() {
            Ok(self.rows())
        } else {
            Err(GeomError::NotSquare {
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    /// Element with the largest magnitude (sign kept).
    pub fn max(&self) -> f64 {
        self.elements
            .iter()
            .fold(0.0_f64, |m, &x| if x.abs() > m.abs() { x } else { m })
    }

    /// 1-indexed `(row, col)` of the first occurrence of `x`, scanning by rows.
    pub fn index_of(&self, x: f64) -> Option<(usize, usize)> {
        for (i, r) in self.elements.row_iter().enumerate() {
            if let Some(j) = r.iter().position(|&e| e == x) {
                return Some((i + 1, j + 1));
            }
        }
        None
    }

    /// Leading diagonal of a square matrix.
    pub fn diagonal_elements(&self) -> GeomResult<Vector> {
        self.check_square()?;
        Ok(Vector::from(self.elements.diagonal()))
    }

    pub fn round(&self) -> Matrix {
        self.map(f64::round)
    }

    pub fn snap_to(&self, x: f64) -> Matrix {
        self.map(|e| if (e - x).abs() <= PRECISION { x } else { e })
    }

    /// Row echelon form by partial-pivot elimination.
    pub fn to_right_triangular(&self) -> Matrix {
        let tol = pivot_tol(&self.elements);
        Self {
            elements: eliminate(&self.elements, tol).m,
        }
    }

    pub fn determinant(&self) -> GeomResult<f64> {
        let n = self.check_square()?;
        if n == 0 {
            return Ok(1.0);
        }
        let ech = eliminate(&self.elements, pivot_tol(&self.elements));
        if ech.rank < n {
            return Ok(0.0);
        }
        Ok(ech.sign * ech.m.diagonal().iter().product::<f64>())
    }

    #[inline]
    pub fn det(&self) -> GeomResult<f64> {
        self.determinant()
    }

    pub fn is_singular(&self) -> bool {
        matches!(self.determinant(), Ok(d) if d == 0.0)
    }

    pub fn trace(&self) -> GeomResult<f64> {
        self.check_square()?;
        Ok(self.elements.trace())
    }

    #[inline]
    pub fn tr(&self) -> GeomResult<f64> {
        self.trace()
    }

    pub fn rank(&self) -> usize {
        self.rank_eps(PRECISION)
    }

    /// Non-zero rows of the echelon form, pivots below `eps` treated as zero.
    pub fn rank_eps(&self, eps: f64) -> usize {
        eliminate(&self.elements, eps).rank
    }

    #[inline]
    pub fn rk(&self) -> usize {
        self.rank()
    }

    /// Horizontal concatenation `[self | other]`.
    pub fn augment(&self, other: &Matrix) -> GeomResult<Matrix> {
        if self.rows() == 0 {
            return Ok(other.clone());
        }
        GeomError::check_dims(self.rows(), other.rows())?;
        let (r, c1) = self.dimensions();
        let c2 = other.cols();
        Ok(Self {
            elements: DMatrix::from_fn(r, c1 + c2, |i, j| {
                if j < c1 {
                    self.elements[(i, j)]
                } else {
                    other.elements[(i, j - c1)]
                }
            }),
        })
    }

    /// Gauss-Jordan inverse with partial pivoting.
    pub fn inverse(&self) -> GeomResult<Matrix> {
        let n = self.check_square()?;
        if n == 0 {
            return Ok(self.clone());
        }
        let tol = pivot_tol(&self.elements);
        let mut a = self.augment(&Self::identity(n))?.elements;
        let w = 2 * n;
        for c in 0..n {
            let mut p = c;
            for i in c + 1..n {
                if a[(i, c)].abs() > a[(p, c)].abs() {
                    p = i;
                }
            }
            if a[(p, c)].abs() <= tol {
                return Err(GeomError::Singular);
            }
            if p != c {
                a.swap_rows(p, c);
            }
            let piv = a[(c, c)];
            for j in 0..w {
                a[(c, j)] /= piv;
            }
            for i in 0..n {
                if i == c {
                    continue;
                }
                let f = a[(i, c)];
                if f != 0.0 {
                    for j in 0..w {
                        let v = a[(c, j)];
                        a[(i, j)] -= f * v;
                    }
                }
            }
        }
        Ok(Self {
            elements: a.columns(n, n).into_owned(),
        })
    }

    #[inline]
    pub fn inv(&self) -> GeomResult<Matrix> {
        self.inverse()
    }
}

impl From<DMatrix<f64>> for Matrix {
    fn from(elements: DMatrix<f64>) -> Self {
        Self {
            elements: normalized(elements),
        }
    }
}

impl From<Matrix3<f64>> for Matrix {
    fn from(m: Matrix3<f64>) -> Self {
        Self {
            elements: DMatrix::from_fn(3, 3, |i, j| m[(i, j)]),
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows() == 0 {
            return write!(f, "[]");
        }
        for (i, r) in self.elements.row_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, x) in r.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn accessors_are_one_indexed() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.e(2, 1), Some(3.0));
        assert_eq!(a.e(0, 1), None);
        assert_eq!(a.e(3, 1), None);
        assert_eq!(a.row(1).unwrap().elements(), &[1.0, 2.0]);
        assert_eq!(a.col(2).unwrap().elements(), &[2.0, 4.0]);
        assert!(a.row(3).is_none());
    }

    #[test]
    fn ragged_rows_rejected_and_empty_is_valid() {
        assert!(matches!(
            Matrix::new(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(GeomError::RaggedRows { row: 2, .. })
        ));
        let e = Matrix::new(vec![]).unwrap();
        assert_eq!(e.dimensions(), (0, 0));
        assert_eq!(Matrix::identity(0), e);
        assert_eq!(e.determinant(), Ok(1.0));
    }

    #[test]
    fn multiply_checks_inner_dimensions() {
        let a = Matrix::zero(2, 3);
        let b = Matrix::zero(2, 3);
        assert!(!a.can_multiply_from_left(&b));
        assert!(a.multiply(&b).is_err());
        assert_eq!(a.multiply(&b.transpose()).unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn x_dispatches_on_operand() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.x(2.0).unwrap(), m(&[&[2.0, 4.0], &[6.0, 8.0]]));
        let b = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert_eq!(a.x(&b).unwrap(), m(&[&[2.0, 1.0], &[4.0, 3.0]]));
        assert_eq!(
            a.x(&Matrix::zero(3, 1)),
            Err(GeomError::DimensionMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    fn rotation_2d_quarter_turn() {
        let r = Matrix::rotation(FRAC_PI_2, None).unwrap();
        let v = r.multiply_vector(&Vector::new(vec![1.0, 0.0])).unwrap();
        assert!(v.eql(&Vector::new(vec![0.0, 1.0])));
    }

    #[test]
    fn rotation_about_axis_matches_named_rotations() {
        let t = 0.7;
        let rz = Matrix::rotation(t, Some(&Vector3::z())).unwrap();
        assert!(rz.eql(&Matrix::rotation_z(t)));
        let rx = Matrix::rotation(t, Some(&Vector3::new(2.0, 0.0, 0.0))).unwrap();
        assert!(rx.eql(&Matrix::rotation_x(t)));
        assert!(Matrix::rotation(t, Some(&Vector3::zeros())).is_err());
    }

    #[test]
    fn determinant_uses_pivoting() {
        // Zero leading entry forces a row swap.
        let a = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert!((a.determinant().unwrap() + 1.0).abs() < 1e-12);
        let b = m(&[&[2.0, -3.0, 1.0], &[2.0, 0.0, -1.0], &[1.0, 4.0, 5.0]]);
        assert!((b.det().unwrap() - 49.0).abs() < 1e-9);
        assert!(Matrix::zero(2, 3).determinant().is_err());
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let s = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert!(s.is_singular());
        assert_eq!(s.determinant(), Ok(0.0));
        assert_eq!(s.inverse(), Err(GeomError::Singular));
        assert_eq!(s.rank(), 2);
    }

    #[test]
    fn inverse_known_value() {
        let a = m(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let inv = a.inv().unwrap();
        assert!(inv.eql(&m(&[&[0.6, -0.7], &[-0.2, 0.4]])));
    }

    #[test]
    fn right_triangular_is_upper() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 10.0]]);
        let t = a.to_right_triangular();
        for i in 1..=3 {
            for j in 1..i {
                assert_eq!(t.e(i, j), Some(0.0));
            }
        }
    }

    #[test]
    fn rank_of_rectangular() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0], &[3.0, 6.0]]);
        assert_eq!(a.rk(), 1);
        assert_eq!(Matrix::identity(4).rank(), 4);
        assert_eq!(Matrix::zero(3, 2).rank(), 0);
    }

    #[test]
    fn trace_augment_minor() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.tr(), Ok(5.0));
        let aug = a.augment(&Matrix::identity(2)).unwrap();
        assert_eq!(aug.dimensions(), (2, 4));
        assert_eq!(aug.e(1, 3), Some(1.0));
        assert!(a.augment(&Matrix::identity(3)).is_err());
        let mi = a.minor(2, 2, 2, 2).unwrap();
        assert!(mi.eql(&m(&[&[4.0, 3.0], &[2.0, 1.0]])));
    }

    #[test]
    fn diagonal_roundtrip() {
        let d = Vector::new(vec![1.0, 2.0, 3.0]).to_diagonal_matrix();
        assert_eq!(d.diagonal_elements().unwrap().elements(), &[1.0, 2.0, 3.0]);
        assert_eq!(d.index_of(3.0), Some((3, 3)));
        assert_eq!(d.max(), 3.0);
    }

    fn invertible3() -> impl Strategy<Value = Matrix> {
        prop::collection::vec(-1.0f64..1.0, 9).prop_map(|xs| {
            let mut rows: Vec<Vec<f64>> = xs.chunks(3).map(|c| c.to_vec()).collect();
            for (i, r) in rows.iter_mut().enumerate() {
                r[i] += 4.0;
            }
            Matrix::new(rows).unwrap()
        })
    }

    proptest! {
        #[test]
        fn inverse_roundtrip(a in invertible3()) {
            let inv = a.inverse().unwrap();
            let id = Matrix::identity(3);
            prop_assert!(a.multiply(&inv).unwrap().eql(&id));
            prop_assert!(inv.multiply(&a).unwrap().eql(&id));
        }

        #[test]
        fn identity_is_neutral(xs in prop::collection::vec(-5.0f64..5.0, 6)) {
            let a = Matrix::new(xs.chunks(3).map(|c| c.to_vec()).collect()).unwrap();
            prop_assert!(Matrix::identity(2).multiply(&a).unwrap().eql(&a));
            prop_assert!(a.multiply(&Matrix::identity(3)).unwrap().eql(&a));
        }
    }
}
