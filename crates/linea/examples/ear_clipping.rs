//! Triangulate a few planar polygons and print their triangles.
//!
//! Usage:
//!   cargo run -p linea --example ear_clipping -- star
//!   cargo run -p linea --example ear_clipping -- l-shape
//!
//! Prints area, centroid, convex/reflex counts and each ear-clipped triangle.

use linea::prelude::*;

fn main() {
    let shape = std::env::args().nth(1).unwrap_or_else(|| "star".to_string());
    let pts = match shape.as_str() {
        "star" => star(5, 2.0, 0.8),
        "l-shape" => vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ],
        _ => {
            eprintln!("usage: ear_clipping [star|l-shape]");
            return;
        }
    };
    let mut poly = Polygon::new(&pts).unwrap();
    // Tilt it out of the xy-plane so the 3D path is exercised.
    poly.rotate(0.3, &Line::x_axis());
    println!("{poly}");
    println!(
        "n={} convex={} reflex={} area={:.6}",
        poly.len(),
        poly.convex_vertices().len(),
        poly.reflex_vertices().len(),
        poly.area()
    );
    let c = poly.centroid().unwrap();
    println!("centroid=[{:.4}, {:.4}, {:.4}] inside={}", c.x, c.y, c.z, poly.contains(&c));
    for (i, t) in poly.to_triangles().unwrap().iter().enumerate() {
        println!("triangle {i}: {t}");
    }
}

fn star(points: usize, outer: f64, inner: f64) -> Vec<Vec3<f64>> {
    let n = 2 * points;
    (0..n)
        .map(|k| {
            let t = std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::TAU / n as f64;
            let r = if k % 2 == 0 { outer } else { inner };
            Vec3::new(r * t.cos(), r * t.sin(), 0.0)
        })
        .collect()
}
