//! Projection of a connection path and its adjustment onto the end point.
//!
//! Observed legs rarely land exactly on the known end point. The
//! adjustment rotates the whole path so the projected end lies along the
//! bearing to the known end, then scales every distance so it lands on it.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{self, Point, TINY};
use crate::units::{DistanceUnit, UnitTable};

use super::legs::{build_legs, Leg};
use super::parser::parse;

/// The rotation and scaling that closes a path onto its end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Clockwise rotation to apply to every bearing, in radians.
    pub rotation: f64,
    /// Scaling factor to apply to every observed distance.
    pub scale_factor: f64,
    /// Misclosure in the northing direction after rotation, in meters.
    pub delta_north: f64,
    /// Misclosure in the easting direction after rotation, in meters.
    pub delta_east: f64,
    /// Precision ratio (path length over misclosure), zero for an exact fit.
    pub precision: f64,
    /// Total observed length of the path, in meters.
    pub length: f64,
}

/// A connection path between two known points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPath {
    pub from: Point,
    pub to: Point,
    pub legs: Vec<Leg>,
}

impl ConnectionPath {
    pub fn new(from: Point, to: Point, legs: Vec<Leg>) -> Self {
        Self { from, to, legs }
    }

    /// Parses a path description and attaches it to the two known points.
    pub fn from_description(
        text: &str,
        from: Point,
        to: Point,
        table: &UnitTable,
        entry_unit: &DistanceUnit,
    ) -> Result<Self> {
        let parsed = parse(text, table, entry_unit)?;
        let legs = build_legs(&parsed.items)?;
        Ok(Self::new(from, to, legs))
    }

    /// Total observed length of the path, in meters.
    pub fn length(&self) -> f64 {
        self.legs.iter().map(Leg::length).sum()
    }

    /// Projects the unadjusted path from the start point, taking grid
    /// north as the initial course. Returns the projected end position
    /// and the exit bearing there.
    pub fn project(&self) -> (Point, f64) {
        self.project_scaled(1.0)
    }

    fn project_scaled(&self, sfac: f64) -> (Point, f64) {
        let mut pos = self.from;
        let mut bearing = 0.0;
        for leg in &self.legs {
            leg.project(&mut pos, &mut bearing, sfac);
        }
        (pos, bearing)
    }

    /// Works out the rotation and scaling that closes the path onto the
    /// known end point.
    pub fn adjust(&self) -> Adjustment {
        let (got, _) = self.project();

        let got_distance = geometry::distance(self.from, got);
        let got_bearing = geometry::azimuth(self.from, got);
        let want_distance = geometry::distance(self.from, self.to);
        let want_bearing = geometry::azimuth(self.from, self.to);

        let rotation = want_bearing - got_bearing;

        // Scale factor is zero when the projected end coincides with the
        // start point.
        let scale_factor = if got_distance > TINY {
            want_distance / got_distance
        } else {
            0.0
        };

        // Where the path ends once it has been swung onto the required
        // bearing, before any scaling.
        let swung = geometry::polar(self.from, want_bearing, got_distance);
        let delta_north = swung.y - self.to.y;
        let delta_east = swung.x - self.to.x;

        // Precision denominator, zero for an exact match.
        let misclosure = (delta_north * delta_north + delta_east * delta_east).sqrt();
        let length = self.length();
        let precision = if misclosure > TINY {
            want_distance / misclosure
        } else {
            0.0
        };

        debug!(
            "path adjustment: rotation={:.9} rad, scale={:.9}, dN={:.4}, dE={:.4}, precision={:.1}",
            rotation, scale_factor, delta_north, delta_east, precision
        );

        Adjustment {
            rotation,
            scale_factor,
            delta_north,
            delta_east,
            precision,
            length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_for(text: &str, from: Point, to: Point) -> ConnectionPath {
        let table = UnitTable::builtin();
        let meters = table.find("m").unwrap().clone();
        ConnectionPath::from_description(text, from, to, &table, &meters).unwrap()
    }

    #[test]
    fn straight_path_projects_north() {
        let path = path_for(
            "100 200",
            Point::new(0.0, 0.0),
            Point::new(0.0, 300.0),
        );
        let (end, bearing) = path.project();
        assert!((end.x - 0.0).abs() < 1e-9);
        assert!((end.y - 300.0).abs() < 1e-9);
        assert!(bearing.abs() < 1e-9);
        assert!((path.length() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn angle_turns_from_the_backsight() {
        // North 100, then a 90 degree angle turns the course to west.
        let path = path_for(
            "100 90-00 100",
            Point::new(0.0, 0.0),
            Point::new(-100.0, 100.0),
        );
        let (end, _) = path.project();
        assert!((end.x + 100.0).abs() < 1e-6);
        assert!((end.y - 100.0).abs() < 1e-6);
    }

    #[test]
    fn deflection_turns_from_the_extension() {
        let path = path_for(
            "100 45-00d 100",
            Point::new(0.0, 0.0),
            Point::new(70.710678, 170.710678),
        );
        let (end, _) = path.project();
        assert!((end.x - 70.710678).abs() < 1e-5);
        assert!((end.y - 170.710678).abs() < 1e-5);
    }

    #[test]
    fn quarter_circle_curve() {
        // North 100, then a quarter circle of radius 100 swinging the
        // course to east, then east 100.
        let path = path_for(
            "100 (90-00 100 / 157.0796327 ) 100",
            Point::new(0.0, 0.0),
            Point::new(200.0, 200.0),
        );
        let (end, bearing) = path.project();
        assert!((end.x - 200.0).abs() < 1e-5);
        assert!((end.y - 200.0).abs() < 1e-5);
        assert!((bearing - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn cul_de_sac_returns_parallel() {
        // A 240 degree cul-de-sac entered northwards: the EC sits across
        // the circle and the exit course points back south.
        let path = path_for(
            "(240-00c 100 )",
            Point::new(0.0, 0.0),
            Point::new(173.205081, 0.0),
        );
        let (end, bearing) = path.project();
        assert!((end.x - 173.205081).abs() < 1e-5);
        assert!(end.y.abs() < 1e-5);
        assert!((bearing - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn exact_fit_needs_no_adjustment() {
        let path = path_for(
            "100 200",
            Point::new(0.0, 0.0),
            Point::new(0.0, 300.0),
        );
        let adj = path.adjust();
        assert!(adj.rotation.abs() < 1e-9);
        assert!((adj.scale_factor - 1.0).abs() < 1e-9);
        assert!(adj.delta_north.abs() < 1e-9);
        assert!(adj.delta_east.abs() < 1e-9);
        assert_eq!(adj.precision, 0.0);
    }

    #[test]
    fn rotation_closes_onto_a_swung_end_point() {
        let path = path_for(
            "100",
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        );
        let adj = path.adjust();
        assert!((adj.rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((adj.scale_factor - 1.0).abs() < 1e-9);
        assert_eq!(adj.precision, 0.0);
    }

    #[test]
    fn scaling_reports_the_misclosure() {
        let path = path_for(
            "100",
            Point::new(0.0, 0.0),
            Point::new(0.0, 200.0),
        );
        let adj = path.adjust();
        assert!(adj.rotation.abs() < 1e-9);
        assert!((adj.scale_factor - 2.0).abs() < 1e-9);
        assert!((adj.delta_north + 100.0).abs() < 1e-9);
        assert!(adj.delta_east.abs() < 1e-9);
        // 200m wanted over a 100m misclosure.
        assert!((adj.precision - 2.0).abs() < 1e-9);
        assert!((adj.length - 100.0).abs() < 1e-9);
    }
}
