use super::*;
use crate::error::GeomError;
use nalgebra::{vector, Vector3};
use proptest::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI};

fn close(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    (a - b).norm() < 1e-9
}

#[test]
fn axes_meet_at_origin() {
    let p = Line::x_axis().intersection_with(Line::y_axis()).unwrap();
    assert!(close(&p, &Vector3::zeros()));
    assert!(Line::x_axis().intersects(Line::z_axis()));
    assert!(!Line::x_axis().intersects(Line::x_axis()));
}

#[test]
fn skew_lines_distance_and_closest_point() {
    let l1 = Line::x_axis();
    let l2 = Line::new(vector![0.0, 0.0, 1.0], Vector3::y()).unwrap();
    assert!((l1.distance_from(l2) - 1.0).abs() < 1e-12);
    assert!(!l1.intersects(l2));
    assert_eq!(l1.intersection_with(l2), Err(GeomError::NoIntersection));
    let c = l1.point_closest_to(l2).unwrap();
    assert!(close(&c, &Vector3::zeros()));
    let c2 = l2.point_closest_to(l1).unwrap();
    assert!(close(&c2, &vector![0.0, 0.0, 1.0]));
}

#[test]
fn parallel_lines_have_no_closest_point() {
    let l1 = Line::x_axis();
    let l2 = Line::new(vector![0.0, 1.0, 0.0], vector![-3.0, 0.0, 0.0]).unwrap();
    assert!(l1.is_parallel_to(l2));
    assert!((l1.distance_from(l2) - 1.0).abs() < 1e-12);
    assert_eq!(l1.point_closest_to(l2), Err(GeomError::Parallel));
}

#[test]
fn line_construction_and_equality() {
    assert_eq!(
        Line::new(Vector3::zeros(), Vector3::zeros()),
        Err(GeomError::ZeroVector)
    );
    let l = Line::new(vector![1.0, 0.0, 0.0], vector![-2.0, 0.0, 0.0]).unwrap();
    assert!((l.direction.norm() - 1.0).abs() < 1e-12);
    assert!(l.eql(&Line::x_axis()));
    assert!(!l.eql(&Line::y_axis()));
    assert!(l.contains(vector![7.0, 0.0, 0.0]));
    assert!(!l.contains(vector![7.0, 1e-3, 0.0]));

    // 2D input is zero-extended.
    let v = crate::vector::Vector::new(vec![1.0, 2.0]);
    let d = crate::vector::Vector::new(vec![0.0, 1.0]);
    let l2 = Line::from_vectors(&v, &d).unwrap();
    assert!(close(&l2.anchor, &vector![1.0, 2.0, 0.0]));
}

#[test]
fn line_rotation_and_reflection() {
    let r = Line::x_axis().rotate(FRAC_PI_2, &Line::z_axis());
    assert!(r.eql(&Line::y_axis()));

    let mirrored = Line::x_axis().reflection_in(vector![0.0, 1.0, 0.0]);
    assert!(mirrored.eql(&Line::new(vector![0.0, 2.0, 0.0], Vector3::x()).unwrap()));

    let in_plane = Line::new(vector![0.0, 0.0, 2.0], Vector3::x())
        .unwrap()
        .reflection_in(Plane::xy());
    assert!(in_plane.eql(&Line::new(vector![0.0, 0.0, -2.0], Vector3::x()).unwrap()));
}

#[test]
fn reflecting_twice_is_identity() {
    let l = Line::new(vector![1.0, 2.0, 3.0], vector![1.0, 1.0, 0.0]).unwrap();
    let pl = Plane::new(vector![0.0, 0.0, 1.0], vector![0.0, 1.0, 1.0]).unwrap();
    let axis = Line::new(vector![1.0, -1.0, 0.0], vector![0.0, 2.0, 1.0]).unwrap();
    let pt = vector![-1.0, 4.0, 2.0];

    assert!(l.reflection_in(pl).reflection_in(pl).eql(&l));
    assert!(l.reflection_in(axis).reflection_in(axis).eql(&l));
    assert!(l.reflection_in(pt).reflection_in(pt).eql(&l));

    let q = Plane::new(vector![2.0, 0.0, 0.0], vector![1.0, 2.0, 3.0]).unwrap();
    assert!(q.reflection_in(pl).reflection_in(pl).eql(&q));
    assert!(q.reflection_in(axis).reflection_in(axis).eql(&q));
    assert!(q.reflection_in(pt).reflection_in(pt).eql(&q));
}

#[test]
fn segment_containment_is_clamped() {
    let s = Segment::new(Vector3::zeros(), vector![2.0, 0.0, 0.0]).unwrap();
    assert!(s.contains(vector![1.0, 0.0, 0.0]));
    assert!(s.contains(Vector3::zeros()));
    assert!(s.contains(vector![2.0, 0.0, 0.0]));
    assert!(!s.contains(vector![3.0, 0.0, 0.0]));
    assert!(!s.contains(vector![-1.0, 0.0, 0.0]));
    assert!(!s.contains(vector![1.0, 0.1, 0.0]));
    let inner = Segment::new(vector![0.5, 0.0, 0.0], vector![1.5, 0.0, 0.0]).unwrap();
    assert!(s.contains(inner));
    assert!(!inner.contains(s));
}

#[test]
fn segment_measures() {
    let s = Segment::new(Vector3::zeros(), vector![2.0, 0.0, 0.0]).unwrap();
    assert!((s.length() - 2.0).abs() < 1e-12);
    assert!(close(&s.midpoint(), &vector![1.0, 0.0, 0.0]));
    assert!(close(&s.to_vector(), &vector![2.0, 0.0, 0.0]));
    assert!(s.bisecting_plane().contains(vector![1.0, 5.0, 5.0]));
    let rev = Segment::new(vector![2.0, 0.0, 0.0], Vector3::zeros()).unwrap();
    assert!(s.eql(&rev));
    assert!(s.is_parallel_to(Line::x_axis()));

    assert!((s.distance_from(vector![3.0, 4.0, 0.0]) - 17f64.sqrt()).abs() < 1e-12);
    assert!((s.distance_from(vector![1.0, 1.0, 0.0]) - 1.0).abs() < 1e-12);
    let moved = s.translate(&vector![0.0, 0.0, 1.0]);
    assert!((moved.distance_from(s) - 1.0).abs() < 1e-12);
}

#[test]
fn segment_intersections() {
    let s1 = Segment::new(Vector3::zeros(), vector![2.0, 0.0, 0.0]).unwrap();
    let s2 = Segment::new(vector![1.0, -1.0, 0.0], vector![1.0, 1.0, 0.0]).unwrap();
    let s3 = Segment::new(vector![3.0, -1.0, 0.0], vector![3.0, 1.0, 0.0]).unwrap();

    let p = s1.intersection_with(s2).unwrap();
    assert!(close(&p, &vector![1.0, 0.0, 0.0]));
    assert!(s1.intersects(s2));
    assert_eq!(s1.intersection_with(s3), Err(GeomError::NoIntersection));
    assert!((s1.distance_from(s3) - 1.0).abs() < 1e-12);

    let crossing = Plane::new(vector![0.5, 0.0, 0.0], Vector3::x()).unwrap();
    assert!(close(&s1.intersection_with(crossing).unwrap(), &vector![0.5, 0.0, 0.0]));
    let beyond = Plane::new(vector![5.0, 0.0, 0.0], Vector3::x()).unwrap();
    assert!(!s1.intersects(beyond));
    assert!((s1.distance_from(beyond) - 3.0).abs() < 1e-12);
    assert!(close(&s1.point_closest_to(beyond).unwrap(), &vector![2.0, 0.0, 0.0]));
}

#[test]
fn plane_from_points_orientation_and_failures() {
    let sq = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![1.0, 1.0, 0.0],
        vector![0.0, 1.0, 0.0],
    ];
    let p = Plane::from_points(&sq).unwrap();
    assert!(close(&p.normal, &Vector3::z()));
    let mut rev = sq;
    rev.reverse();
    assert!(close(&Plane::from_points(&rev).unwrap().normal, &-Vector3::z()));

    // Non-convex loop still orients by its enclosed area.
    let l_shape = [
        vector![0.0, 0.0, 0.0],
        vector![2.0, 0.0, 0.0],
        vector![2.0, 1.0, 0.0],
        vector![1.0, 1.0, 0.0],
        vector![1.0, 2.0, 0.0],
        vector![0.0, 2.0, 0.0],
    ];
    assert!(close(&Plane::from_points(&l_shape).unwrap().normal, &Vector3::z()));

    let line = [Vector3::zeros(), Vector3::x(), Vector3::x() * 2.0];
    assert_eq!(Plane::from_points(&line), Err(GeomError::Collinear));
    let bent = [
        vector![0.0, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![1.0, 1.0, 0.0],
        vector![0.0, 1.0, 1.0],
    ];
    assert_eq!(Plane::from_points(&bent), Err(GeomError::NotCoplanar));
    assert_eq!(
        Plane::from_points(&sq[..2]),
        Err(GeomError::TooFewPoints { needed: 3, found: 2 })
    );
    assert_eq!(
        Plane::through_points(Vector3::zeros(), Vector3::x(), Vector3::x() * 3.0),
        Err(GeomError::Collinear)
    );
}

#[test]
fn tiny_figures_still_span_planes() {
    let s = 1e-4;
    let corners = [
        vector![0.0, 0.0, 0.0],
        vector![s, 0.0, 0.0],
        vector![s, s, 0.0],
        vector![0.0, s, 0.0],
    ];
    let pl = Plane::from_points(&corners).unwrap();
    assert!(close(&pl.normal, &Vector3::z()));
    let tri = Plane::through_points(corners[0], corners[1], corners[2]).unwrap();
    assert!(close(&tri.normal, &Vector3::z()));
    assert!(Plane::through_points_eps(corners[0], corners[1], corners[2], 1e-12).is_ok());

    // Collinearity is judged relative to the figure, not in absolute units.
    let sliver = [Vector3::zeros(), Vector3::x(), vector![2.0, 1e-9, 0.0]];
    assert_eq!(
        Plane::through_points(sliver[0], sliver[1], sliver[2]),
        Err(GeomError::Collinear)
    );
    assert_eq!(Plane::from_points(&sliver), Err(GeomError::Collinear));
}

#[test]
fn plane_plane_intersection() {
    match Plane::xy().intersection_with(Plane::yz()).unwrap() {
        Geometry::Line(l) => assert!(l.eql(&Line::y_axis())),
        other => panic!("expected a line, got {other:?}"),
    }
    let a = Plane::new(vector![0.0, 0.0, 2.0], Vector3::z()).unwrap();
    let b = Plane::new(vector![3.0, 0.0, 0.0], Vector3::x()).unwrap();
    let l = a.intersection_with_plane(&b).unwrap();
    assert!(l.contains(vector![3.0, 5.0, 2.0]));
    assert!(a.contains(l) && b.contains(l));
    assert_eq!(
        Plane::xy().intersection_with_plane(&a),
        Err(GeomError::NoIntersection)
    );
}

#[test]
fn plane_line_intersection_and_distances() {
    let l = Line::new(vector![1.0, 1.0, 1.0], Vector3::z()).unwrap();
    match Plane::xy().intersection_with(l).unwrap() {
        Geometry::Point(p) => assert!(close(&p, &vector![1.0, 1.0, 0.0])),
        other => panic!("expected a point, got {other:?}"),
    }
    assert!(close(&l.intersection_with(Plane::xy()).unwrap(), &vector![1.0, 1.0, 0.0]));
    assert!(Plane::xy().intersection_with(Line::x_axis()).is_err());
    assert!(Plane::xy().contains(Line::x_axis()));
    assert!(Line::x_axis().lies_in(&Plane::xy()));

    assert!((Plane::xy().distance_from(vector![1.0, 2.0, -3.0]) - 3.0).abs() < 1e-12);
    let above = Line::new(vector![0.0, 0.0, 4.0], Vector3::y()).unwrap();
    assert!((Plane::xy().distance_from(above) - 4.0).abs() < 1e-12);
    assert!(close(
        &Plane::xy().point_closest_to(&vector![1.0, 2.0, -3.0]),
        &vector![1.0, 2.0, 0.0]
    ));
}

#[test]
fn plane_equality_rotation_and_perpendicularity() {
    let flipped = Plane::new(vector![5.0, 5.0, 0.0], -Vector3::z()).unwrap();
    assert!(Plane::xy().eql(&flipped));
    assert!(Plane::xy().contains(flipped));
    assert!(Plane::xy().is_perpendicular_to(&Plane::yz()));
    assert!(!Plane::xy().is_perpendicular_to(&flipped));
    let r = Plane::xy().rotate(FRAC_PI_2, &Line::x_axis());
    assert!(r.eql(&Plane::zx()));
    assert!(Plane::xy().translate(&vector![0.0, 0.0, 1.0]).is_parallel_to(Plane::xy()));
}

#[test]
fn transforms_move_points_and_planes() {
    let rot = Transform::Rotate {
        angle: PI / 2.0,
        axis: Line::z_axis(),
    };
    assert!(close(&rot.apply_point(&vector![1.0, 0.0, 3.0]), &vector![0.0, 1.0, 3.0]));
    assert!(rot.apply_plane(&Plane::yz()).eql(&Plane::zx()));

    let scale = Transform::Scale {
        factor: 2.0,
        center: vector![1.0, 1.0, 1.0],
    };
    assert!(close(&scale.apply_point(&vector![2.0, 1.0, 1.0]), &vector![3.0, 1.0, 1.0]));
    let lifted = Plane::new(vector![0.0, 0.0, 2.0], Vector3::z()).unwrap();
    assert!(scale
        .apply_plane(&lifted)
        .eql(&Plane::new(vector![0.0, 0.0, 3.0], Vector3::z()).unwrap()));

    let shift = Transform::Translate(vector![1.0, 2.0, 3.0]);
    assert!(close(&shift.apply_point(&Vector3::zeros()), &vector![1.0, 2.0, 3.0]));
}

#[test]
fn geometry_dispatch_distance() {
    let p = Geometry::Point(vector![0.0, 3.0, 4.0]);
    assert!((p.distance_from(Geometry::Point(Vector3::zeros())) - 5.0).abs() < 1e-12);
    assert!((p.distance_from(Line::x_axis().into()) - 5.0).abs() < 1e-12);
    assert!((p.distance_from(Plane::xy().into()) - 4.0).abs() < 1e-12);
}

proptest! {
    #[test]
    fn closest_point_realises_distance(
        a in prop::array::uniform3(-10.0f64..10.0),
        d in prop::array::uniform3(-10.0f64..10.0),
        p in prop::array::uniform3(-10.0f64..10.0),
    ) {
        let d = Vector3::from(d);
        prop_assume!(d.norm() > 0.1);
        let l = Line::new(Vector3::from(a), d).unwrap();
        let p = Vector3::from(p);
        let c = l.point_closest_to(p).unwrap();
        prop_assert!(l.contains(c));
        prop_assert!((l.distance_from(p) - (c - p).norm()).abs() < 1e-6);
    }
}
