use std::f64::consts::{FRAC_PI_2, PI};

use survey_path::geometry::Point;
use survey_path::{ConnectionPath, PathError, UnitTable};

fn path(text: &str, from: Point, to: Point) -> ConnectionPath {
    let table = UnitTable::builtin();
    let meters = table.find("m").unwrap().clone();
    ConnectionPath::from_description(text, from, to, &table, &meters).unwrap()
}

#[test]
fn perfect_closure_needs_no_adjustment() {
    let _ = env_logger::builder().is_test(true).try_init();

    let p = path("100 200", Point::new(0.0, 0.0), Point::new(0.0, 300.0));
    let adj = p.adjust();
    assert!(adj.rotation.abs() < 1e-9);
    assert!((adj.scale_factor - 1.0).abs() < 1e-9);
    assert!(adj.delta_north.abs() < 1e-9);
    assert!(adj.delta_east.abs() < 1e-9);
    assert_eq!(adj.precision, 0.0);
    assert!((adj.length - 300.0).abs() < 1e-9);
}

#[test]
fn feet_distances_project_in_meters() {
    let p = path("ft... 100", Point::new(0.0, 0.0), Point::new(0.0, 30.48));
    let (end, _) = p.project();
    assert!((end.y - 30.48).abs() < 1e-9);
    let adj = p.adjust();
    assert!((adj.scale_factor - 1.0).abs() < 1e-9);
    assert_eq!(adj.precision, 0.0);
}

#[test]
fn rotation_swings_the_path_onto_the_end_point() {
    // The observations run due north; the end point is due east.
    let p = path("300", Point::new(0.0, 0.0), Point::new(300.0, 0.0));
    let adj = p.adjust();
    assert!((adj.rotation - FRAC_PI_2).abs() < 1e-9);
    assert!((adj.scale_factor - 1.0).abs() < 1e-9);
    assert_eq!(adj.precision, 0.0);
}

#[test]
fn scale_factor_absorbs_a_short_path() {
    let p = path("100", Point::new(0.0, 0.0), Point::new(0.0, 50.0));
    let adj = p.adjust();
    assert!(adj.rotation.abs() < 1e-9);
    assert!((adj.scale_factor - 0.5).abs() < 1e-9);
    // The swung (unscaled) end overshoots the end point by 50m north.
    assert!((adj.delta_north - 50.0).abs() < 1e-9);
    assert!(adj.delta_east.abs() < 1e-9);
    assert!((adj.precision - 1.0).abs() < 1e-9);
}

#[test]
fn curve_leg_carries_the_course_through_the_arc() {
    // North 100m, quarter circle of radius 100 swinging to east, east 100m.
    let p = path(
        "100 (90-00 100 / 157.0796327 ) 100",
        Point::new(0.0, 0.0),
        Point::new(200.0, 200.0),
    );
    let (end, bearing) = p.project();
    assert!((end.x - 200.0).abs() < 1e-5);
    assert!((end.y - 200.0).abs() < 1e-5);
    assert!((bearing - FRAC_PI_2).abs() < 1e-6);

    let adj = p.adjust();
    assert!(adj.rotation.abs() < 1e-6);
    assert!((adj.scale_factor - 1.0).abs() < 1e-6);
}

#[test]
fn counter_clockwise_curve_swings_the_other_way() {
    // Same quarter circle but counter-clockwise: the course exits west.
    let p = path(
        "100 (90-00 100 cc / 157.0796327 ) 100",
        Point::new(0.0, 0.0),
        Point::new(-200.0, 200.0),
    );
    let (end, bearing) = p.project();
    assert!((end.x + 200.0).abs() < 1e-5);
    assert!((end.y - 200.0).abs() < 1e-5);
    assert!((bearing + FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn cul_de_sac_exits_back_parallel() {
    let p = path(
        "(240-00c 100 )",
        Point::new(0.0, 0.0),
        Point::new(173.205081, 0.0),
    );
    let (end, bearing) = p.project();
    assert!((end.x - 173.205081).abs() < 1e-5);
    assert!(end.y.abs() < 1e-5);
    assert!((bearing - PI).abs() < 1e-9);

    // Length runs the long way around the circle.
    let central = 240.0_f64.to_radians();
    let expected = (2.0 * PI - central) * 100.0;
    assert!((p.length() - expected).abs() < 1e-9);
}

#[test]
fn bad_description_surfaces_the_parse_error() {
    let table = UnitTable::builtin();
    let meters = table.find("m").unwrap().clone();
    let err = ConnectionPath::from_description(
        "100 (45 100",
        Point::new(0.0, 0.0),
        Point::new(0.0, 200.0),
        &table,
        &meters,
    )
    .unwrap_err();
    assert_eq!(err, PathError::UnclosedCurve);
}
