//! Linear algebra and 3D geometry kernel.
//!
//! Modules
//! - `vector`, `matrix`: N-dimensional vectors and M×N matrices with
//!   fallible (`GeomResult`) binary operations.
//! - `geom3`: lines, segments, planes and transforms in R³.
//! - `linked_list`: arena-backed circular doubly linked list.
//! - `polygon`: planar polygons with convex/reflex bookkeeping, ear clipping
//!   and winding-number containment.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; breaking
//!   changes are fine when they improve the design.
//! - Tolerances default to `cfg::PRECISION`; every approximate predicate has an
//!   `*_eps` twin taking the tolerance explicitly.

pub mod api;
pub mod cfg;
pub mod error;
pub mod geom3;
pub mod linked_list;
pub mod matrix;
pub mod polygon;
pub mod vector;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{GeomCfg, PRECISION};
pub use error::{GeomError, GeomResult};
pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{GeomCfg, PRECISION};
    pub use crate::error::{GeomError, GeomResult};
    pub use crate::geom3::{Geometry, Line, Plane, Segment, Transform};
    pub use crate::matrix::Matrix;
    pub use crate::polygon::{Polygon, VertexId, VertexType};
    pub use crate::vector::{Pivot, Vector};
    pub use nalgebra::{Matrix3 as Mat3, Vector3 as Vec3};
}
