//! Error type shared by the whole kernel.
//!
//! Every operation that can be asked something it has no answer for
//! (mismatched dimensions, parallel lines, singular matrices, ...) returns
//! `GeomResult<T>`; callers chain through failures with `?`.

use std::fmt;

/// Failure modes of geometric and linear-algebra operations.
#[derive(Clone, Debug, PartialEq)]
pub enum GeomError {
    /// Binary operation on operands of different dimensionality.
    DimensionMismatch { expected: usize, found: usize },
    /// Operation defined only for specific dimensions (e.g. cross product).
    UnsupportedDimension { found: usize },
    /// Matrix rows of unequal length.
    RaggedRows { row: usize, expected: usize, found: usize },
    NotSquare { rows: usize, cols: usize },
    Singular,
    /// Zero-length direction, normal or axis.
    ZeroVector,
    TooFewPoints { needed: usize, found: usize },
    Collinear,
    NotCoplanar,
    Parallel,
    NoIntersection,
    /// Vertex handle not present in the polygon.
    UnknownVertex,
    /// A triangle cannot lose another vertex.
    TriangleVertexRemoval,
    DegeneratePolygon { reason: String },
}

impl GeomError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegeneratePolygon {
            reason: reason.into(),
        }
    }

    #[inline]
    pub(crate) fn check_dims(expected: usize, found: usize) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { expected, found })
        }
    }
}

impl fmt::Display for GeomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Self::UnsupportedDimension { found } => {
                write!(f, "operation not defined in {found} dimensions")
            }
            Self::RaggedRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} columns, expected {expected}"
            ),
            Self::NotSquare { rows, cols } => write!(f, "matrix is {rows}x{cols}, not square"),
            Self::Singular => write!(f, "matrix is singular"),
            Self::ZeroVector => write!(f, "zero-length vector where a direction is required"),
            Self::TooFewPoints { needed, found } => {
                write!(f, "need at least {needed} points, got {found}")
            }
            Self::Collinear => write!(f, "points are collinear"),
            Self::NotCoplanar => write!(f, "points are not coplanar"),
            Self::Parallel => write!(f, "objects are parallel"),
            Self::NoIntersection => write!(f, "objects do not intersect"),
            Self::UnknownVertex => write!(f, "vertex does not belong to this polygon"),
            Self::TriangleVertexRemoval => write!(f, "cannot remove a vertex from a triangle"),
            Self::DegeneratePolygon { reason } => write!(f, "degenerate polygon: {reason}"),
        }
    }
}

impl std::error::Error for GeomError {}

pub type GeomResult<T> = Result<T, GeomError>;
