//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for project-internal
//!   code such as the CLI runner. Breaking changes are allowed and expected.

// Linear algebra
pub use crate::matrix::{Factor, Matrix};
pub use crate::vector::{Pivot, Vector};
// 3D primitives
pub use crate::geom3::{Geometry, Line, Plane, Segment, Transform};
// Polygons
pub use crate::linked_list::{CircularList, NodeId};
pub use crate::polygon::{Polygon, VertexId, VertexType};
// Configuration and errors
pub use crate::cfg::{GeomCfg, PRECISION};
pub use crate::error::{GeomError, GeomResult};
