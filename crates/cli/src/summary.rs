//! JSON-serializable summary of a polygon run.

use linea::api::Polygon;
use linea::Vec3;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Probe {
    pub point: [f64; 3],
    pub contained: bool,
}

#[derive(Debug, Serialize)]
pub struct PolygonReport {
    pub vertices: usize,
    pub convex: usize,
    pub reflex: usize,
    pub normal: [f64; 3],
    pub area: f64,
    /// Absent when the weighted area vanishes.
    pub centroid: Option<[f64; 3]>,
    /// Absent when ear clipping fails (non-simple or mis-wound input).
    pub triangles: Option<Vec<[[f64; 3]; 3]>>,
    pub probes: Vec<Probe>,
}

fn arr(v: &Vec3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

pub fn summarize(poly: &mut Polygon, probes: &[[f64; 3]]) -> PolygonReport {
    let area = poly.area();
    let centroid = poly.centroid().ok().map(|c| arr(&c));
    let triangles = match poly.to_triangles() {
        Ok(tris) => Some(
            tris.iter()
                .map(|t| {
                    let p = t.points();
                    [arr(&p[0]), arr(&p[1]), arr(&p[2])]
                })
                .collect(),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "triangulation failed");
            None
        }
    };
    let probes = probes
        .iter()
        .map(|&point| Probe {
            point,
            contained: poly.contains(&Vec3::from(point)),
        })
        .collect();
    PolygonReport {
        vertices: poly.len(),
        convex: poly.convex_vertices().len(),
        reflex: poly.reflex_vertices().len(),
        normal: arr(&poly.plane().normal),
        area,
        centroid,
        triangles,
        probes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linea::api::{GeomCfg, Plane};

    fn square() -> Vec<Vec3<f64>> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn square_summary() {
        let mut poly = Polygon::new(&square()).unwrap();
        let r = summarize(&mut poly, &[[0.5, 0.5, 0.0], [0.5, 0.0, 0.0], [2.0, 2.0, 0.0]]);
        assert_eq!((r.vertices, r.convex, r.reflex), (4, 4, 0));
        assert!((r.area - 1.0).abs() < 1e-12);
        let c = r.centroid.unwrap();
        assert!((c[0] - 0.5).abs() < 1e-12 && (c[1] - 0.5).abs() < 1e-12);
        assert_eq!(r.triangles.as_ref().map(Vec::len), Some(2));
        let flags: Vec<bool> = r.probes.iter().map(|p| p.contained).collect();
        assert_eq!(flags, vec![true, false, false]);

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["vertices"], 4);
        assert_eq!(json["probes"][0]["contained"], true);
    }

    #[test]
    fn mis_wound_polygon_reports_without_triangles() {
        let flipped = Plane::new(Vec3::zeros(), -Vec3::z()).unwrap();
        let mut poly = Polygon::with_cfg(&square(), Some(flipped), GeomCfg::default()).unwrap();
        let r = summarize(&mut poly, &[]);
        assert!(r.triangles.is_none());
        assert_eq!(r.reflex, 4);
        assert!((r.area - 1.0).abs() < 1e-12);
    }
}
