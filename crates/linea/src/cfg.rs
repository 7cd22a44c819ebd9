//! Tolerance defaults and the polygon configuration context.
//!
//! Policy
//! - `PRECISION` is a fixed constant. Callers that need a different tolerance
//!   use the `*_eps` variant of a predicate instead of mutating shared state.
//! - `GeomCfg` bundles the tolerance with the ear-clipping retry budget and
//!   seed; a `Polygon` carries one and hands it to every sub-polygon it
//!   derives.

/// Default tolerance for approximate equality, parallelism and containment.
pub const PRECISION: f64 = 1e-6;

/// Relative pivot threshold for elimination (scaled by the largest entry).
pub(crate) const PIVOT_EPS: f64 = 1e-12;

/// Geometry configuration (tolerances and search budgets).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    pub precision: f64,
    /// Ear candidates drawn per remaining vertex before giving up on a clip.
    pub ear_attempts_per_vertex: usize,
    /// Seed for the ear-tip draws; triangulation is reproducible per seed.
    pub ear_seed: u64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            precision: PRECISION,
            ear_attempts_per_vertex: 32,
            ear_seed: 0,
        }
    }
}

impl GeomCfg {
    #[inline]
    pub fn with_precision(precision: f64) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }
}
