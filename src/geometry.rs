//! Basic 2D geometry used when projecting path legs.
//!
//! Bearings throughout the crate are azimuths in radians, measured
//! clockwise from grid north.

use serde::{Deserialize, Serialize};

/// Threshold below which a length or angle is treated as zero.
pub(crate) const TINY: f64 = 1e-12;

/// Representation of a 2D point (easting, northing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Horizontal distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Azimuth from `a` to `b` in radians, clockwise from grid north.
pub fn azimuth(a: Point, b: Point) -> f64 {
    (b.x - a.x).atan2(b.y - a.y)
}

/// Computes the point at the given azimuth and distance from `start`.
pub fn polar(start: Point, azimuth: f64, distance: f64) -> Point {
    Point::new(
        start.x + distance * azimuth.sin(),
        start.y + distance * azimuth.cos(),
    )
}
