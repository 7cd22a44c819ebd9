//! Planar polygons in 3D: vertex rings, area/centroid, containment, ear clipping.
//!
//! Purpose
//! - A mutable polygon aggregate that owns its vertices in a circular list and
//!   keeps every vertex classified as convex or reflex against its plane.
//!   Triangulation and containment build on that classification.
//!
//! Model
//! - `vertices`: ring of 3D points; `VertexId`s are handles into it and are
//!   only valid for this polygon (and its `dup`s, which share the layout).
//! - `convex` / `reflex`: rings of `VertexId` partitioning all vertices.
//!   Rebuilt by `populate_vertex_type_lists`, patched by `remove_vertex`.
//! - `cache`: lazily derived triangles. Cleared when vertices change; mapped
//!   through the same transform when the polygon moves rigidly or scales.
//!
//! Conventions
//! - Vertices wind counter-clockwise about `plane.normal`. Planes derived by
//!   `Plane::from_points` satisfy this; a caller-supplied plane must too.
//! - Points on an edge are not contained.

mod triangulate;
mod vertex;

pub use vertex::VertexType;

use std::f64::consts::PI;
use std::fmt;

use nalgebra::Vector3;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::geom3::{Line, Plane, Segment, Transform};
use crate::linked_list::{CircularList, NodeId};
use crate::vector::{angle3, Vector};

/// Handle to a vertex of one polygon.
pub type VertexId = NodeId;

#[derive(Clone, Debug, Default)]
struct Cache {
    /// Ear-clipping triangulation.
    triangles: Option<Vec<Polygon>>,
    /// Fan from the first vertex, used for signed area and centroid.
    surface_integral: Option<Vec<Polygon>>,
}

#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: CircularList<Vector3<f64>>,
    plane: Plane,
    convex: CircularList<VertexId>,
    reflex: CircularList<VertexId>,
    cache: Cache,
    cfg: GeomCfg,
}

impl Polygon {
    /// Polygon through `points` in order; the plane is derived from them.
    pub fn new(points: &[Vector3<f64>]) -> GeomResult<Self> {
        Self::with_cfg(points, None, GeomCfg::default())
    }

    pub fn with_plane(points: &[Vector3<f64>], plane: Plane) -> GeomResult<Self> {
        Self::with_cfg(points, Some(plane), GeomCfg::default())
    }

    /// Errors: `TooFewPoints` below three points, `NotCoplanar` if a point is
    /// off the given plane, and whatever `Plane::from_points_eps` reports when
    /// no plane is given.
    pub fn with_cfg(points: &[Vector3<f64>], plane: Option<Plane>, cfg: GeomCfg) -> GeomResult<Self> {
        if points.len() < 3 {
            return Err(GeomError::TooFewPoints {
                needed: 3,
                found: points.len(),
            });
        }
        let plane = match plane {
            Some(pl) => {
                if points.iter().any(|p| !pl.contains_eps(p, cfg.precision)) {
                    return Err(GeomError::NotCoplanar);
                }
                pl
            }
            None => Plane::from_points_eps(points, cfg.precision)?,
        };
        Ok(Self::from_parts(points.iter().copied(), plane, cfg))
    }

    /// From 2D or 3D vectors (2D is zero-extended).
    pub fn from_vectors(points: &[Vector]) -> GeomResult<Self> {
        let pts = points.iter().map(Vector::to_3d).collect::<GeomResult<Vec<_>>>()?;
        Self::new(&pts)
    }

    fn from_parts(points: impl IntoIterator<Item = Vector3<f64>>, plane: Plane, cfg: GeomCfg) -> Self {
        let mut poly = Self {
            vertices: points.into_iter().collect(),
            plane,
            convex: CircularList::new(),
            reflex: CircularList::new(),
            cache: Cache::default(),
            cfg,
        };
        poly.populate_vertex_type_lists();
        poly
    }

    /// Triangle on an explicit plane (no validation).
    pub(crate) fn triangle(
        a: Vector3<f64>,
        b: Vector3<f64>,
        c: Vector3<f64>,
        plane: Plane,
        cfg: GeomCfg,
    ) -> Self {
        Self::from_parts([a, b, c], plane, cfg)
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn cfg(&self) -> &GeomCfg {
        &self.cfg
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a constructed polygon.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }

    /// `i`-th vertex, 1-indexed.
    pub fn v(&self, i: usize) -> Option<Vector3<f64>> {
        let id = self.vertices.at(i.checked_sub(1)?)?;
        self.vertex(id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<Vector3<f64>> {
        self.vertices.get(id).copied()
    }

    /// Handle of the vertex at `point` (within the polygon's precision).
    pub fn node_for(&self, point: &Vector3<f64>) -> Option<VertexId> {
        let eps = self.cfg.precision;
        self.vertices.find(|p| (p - point).norm() <= eps)
    }

    pub fn points(&self) -> Vec<Vector3<f64>> {
        self.vertices.to_vec()
    }

    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.ids().collect()
    }

    pub fn convex_vertices(&self) -> Vec<VertexId> {
        self.convex.to_vec()
    }

    pub fn reflex_vertices(&self) -> Vec<VertexId> {
        self.reflex.to_vec()
    }

    /// Consecutive vertex pairs, closing back to the first.
    fn edge_pairs(&self) -> impl Iterator<Item = (Vector3<f64>, Vector3<f64>)> + '_ {
        self.vertices.ids().filter_map(move |id| {
            let next = self.vertices.next(id)?;
            Some((*self.vertices.get(id)?, *self.vertices.get(next)?))
        })
    }

    /// Boundary segments; fails with `ZeroVector` on repeated consecutive points.
    pub fn edges(&self) -> GeomResult<Vec<Segment>> {
        self.edge_pairs().map(|(a, b)| Segment::new(a, b)).collect()
    }

    /// Independent copy with an empty cache.
    pub fn dup(&self) -> Self {
        Self {
            cache: Cache::default(),
            ..self.clone()
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache = Cache::default();
    }

    /// Remove one vertex, reclassifying its two former neighbours.
    pub fn remove_vertex(&mut self, id: VertexId) -> GeomResult<&mut Self> {
        if self.is_triangle() {
            return Err(GeomError::TriangleVertexRemoval);
        }
        let prev = self.vertices.prev(id).ok_or(GeomError::UnknownVertex)?;
        let next = self.vertices.next(id).ok_or(GeomError::UnknownVertex)?;
        self.vertices.remove(id);
        self.forget_vertex_type(id);
        self.update_vertex_type(prev)?;
        self.update_vertex_type(next)?;
        self.clear_cache();
        Ok(self)
    }

    // ----- area and centroid -----

    /// Fan triangles from the first vertex, each on its own oriented plane.
    pub fn triangles_for_surface_integral(&mut self) -> &[Polygon] {
        let tris = match self.cache.surface_integral.take() {
            Some(t) => t,
            None => self.fan_triangles(),
        };
        self.cache.surface_integral.insert(tris).as_slice()
    }

    fn fan_triangles(&self) -> Vec<Polygon> {
        let pts = self.points();
        let origin = pts[0];
        pts.windows(2)
            .skip(1)
            .map(|w| {
                let plane = Plane::from_points_eps(&[origin, w[0], w[1]], self.cfg.precision)
                    .unwrap_or(self.plane);
                Self::triangle(origin, w[0], w[1], plane, self.cfg)
            })
            .collect()
    }

    /// Unsigned area of a triangle's first three vertices.
    fn triangle_area(&self) -> f64 {
        let p = self.points();
        (p[1] - p[0]).cross(&(p[2] - p[0])).norm() * 0.5
    }

    /// Sum of fan-triangle areas weighted by `triangle.normal · plane.normal`.
    fn signed_area(&mut self) -> f64 {
        let n = self.plane.normal;
        self.triangles_for_surface_integral()
            .iter()
            .map(|t| t.triangle_area() * t.plane.normal.dot(&n))
            .sum()
    }

    pub fn area(&mut self) -> f64 {
        if self.is_triangle() {
            return self.triangle_area();
        }
        self.signed_area().abs()
    }

    /// Area-weighted centroid; `DegeneratePolygon` when the weighted area
    /// vanishes next to the unsigned fan area.
    pub fn centroid(&mut self) -> GeomResult<Vector3<f64>> {
        let p = self.points();
        if self.is_triangle() {
            return Ok((p[0] + p[1] + p[2]) / 3.0);
        }
        let n = self.plane.normal;
        let eps = self.cfg.precision;
        let (mut sum, mut total, mut unsigned) = (Vector3::zeros(), 0.0, 0.0);
        for t in self.triangles_for_surface_integral() {
            let q = t.points();
            let a = t.triangle_area();
            let w = a * t.plane.normal.dot(&n);
            sum += (q[0] + q[1] + q[2]) / 3.0 * w;
            total += w;
            unsigned += a;
        }
        if total.abs() <= eps * unsigned {
            return Err(GeomError::degenerate("zero signed area"));
        }
        Ok(sum / total)
    }

    // ----- containment -----

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        self.contains_by_winding_number(point)
    }

    /// Winding-number test for points in the polygon's plane.
    ///
    /// Off-plane and on-edge points are not contained. The signed angle each
    /// edge subtends at `point` is accumulated; every full turn counts as a
    /// loop, and the point is inside iff the loop count is non-zero.
    pub fn contains_by_winding_number(&self, point: &Vector3<f64>) -> bool {
        let eps = self.cfg.precision;
        if !self.plane.contains_eps(point, eps) || self.has_edge_containing(point) {
            return false;
        }
        let normal = self.plane.normal;
        let (mut theta, mut loops) = (0.0_f64, 0_i32);
        for (v, w) in self.edge_pairs() {
            let a = v - point;
            let b = w - point;
            let dt = match angle3(&a, &b) {
                Some(dt) if dt != 0.0 => dt,
                _ => continue,
            };
            theta += if a.cross(&b).dot(&normal) > 0.0 { dt } else { -dt };
            if theta >= 2.0 * PI - eps {
                loops += 1;
                theta -= 2.0 * PI;
            }
            if theta <= -2.0 * PI + eps {
                loops -= 1;
                theta += 2.0 * PI;
            }
        }
        loops != 0
    }

    pub fn has_edge_containing(&self, point: &Vector3<f64>) -> bool {
        let eps = self.cfg.precision;
        self.edge_pairs().any(|(a, b)| match Segment::new(a, b) {
            Ok(s) => s.contains_eps(point, eps),
            Err(_) => (a - point).norm() <= eps,
        })
    }

    // ----- transforms -----

    /// Move every vertex, the plane and all cached triangles by `t`.
    pub fn apply(&mut self, t: Transform) -> &mut Self {
        self.apply_prepared(&t.prepared());
        self
    }

    fn apply_prepared(&mut self, t: &crate::geom3::Prepared) {
        for p in self.vertices.values_mut() {
            *p = t.point(p);
        }
        self.plane = t.plane(&self.plane);
        let Cache {
            triangles,
            surface_integral,
        } = &mut self.cache;
        for tris in [triangles, surface_integral].into_iter().flatten() {
            for tri in tris.iter_mut() {
                tri.apply_prepared(t);
            }
        }
    }

    pub fn translate(&mut self, v: &Vector3<f64>) -> &mut Self {
        self.apply(Transform::Translate(*v))
    }

    pub fn rotate(&mut self, angle: f64, axis: &Line) -> &mut Self {
        self.apply(Transform::Rotate { angle, axis: *axis })
    }

    pub fn scale(&mut self, factor: f64, center: &Vector3<f64>) -> &mut Self {
        self.apply(Transform::Scale {
            factor,
            center: *center,
        })
    }

    /// Orthogonal projection onto `plane`.
    pub fn projection_on(&self, plane: &Plane) -> GeomResult<Polygon> {
        let pts: Vec<_> = self.vertices.iter().map(|p| plane.point_closest_to(p)).collect();
        Self::with_cfg(&pts, Some(*plane), self.cfg)
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon<")?;
        for (i, p) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "[{}, {}, {}]", p.x, p.y, p.z)?;
        }
        write!(f, ">")
    }
}
