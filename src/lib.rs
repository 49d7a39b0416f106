//! Connection path parsing and closure adjustment for cadastral surveying.
//!
//! A connection path is the data entry string a surveyor types to describe
//! a route of straight legs and circular arcs between two known points,
//! for example `"ft... 100 /- 45-30-00 250.5 (20-00 550 / 310 ) 87"`.
//! The string is scanned into typed items, validated against the curve
//! nesting and ordering rules, grouped into numbered legs, and finally
//! adjusted onto the known end point.

pub mod angles;
pub mod error;
pub mod geometry;
pub mod path;
pub mod units;

pub use error::{ErrorKind, PathError};
pub use geometry::Point;
pub use path::adjust::{Adjustment, ConnectionPath};
pub use path::legs::{build_legs, CircularLeg, CurveAngles, Leg, Span, SpanQualifier, StraightLeg};
pub use path::{parse, scan, set_legs, validate, ParsedPath, PathItem, PathItemType};
pub use units::{Distance, DistanceUnit, UnitTable};
