//! Connection path data entry: scanning, validation and leg numbering.

use serde::{Deserialize, Serialize};

use crate::units::{Distance, DistanceUnit};

pub mod adjust;
pub mod legs;
mod parser;

pub use parser::{parse, scan, set_legs, validate};

/// Classifies one token parsed out of a path description.
///
/// The scanner emits `Value` for every bare numeric token; validation
/// reclassifies those into `Distance`, `BcAngle`, `EcAngle` or `Radius`
/// according to their position relative to the enclosing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathItemType {
    /// A change of the default data entry units.
    Units,
    /// A bare numeric value, not yet classified.
    Value,
    /// An observed distance.
    Distance,
    /// An angle observed from the backsight at the start of a straight leg.
    Angle,
    /// An angle observed as a deflection from the previous course.
    Deflection,
    /// The central angle of a cul-de-sac curve.
    CentralAngle,
    /// The entry angle at the BC of a curve.
    BcAngle,
    /// The exit angle at the EC of a curve.
    EcAngle,
    /// The radius of a curve.
    Radius,
    /// Begin-curve marker `(`.
    Bc,
    /// End-curve marker `)`.
    Ec,
    /// Separator between curve parameters and curve distances.
    Slash,
    /// Marks the enclosing curve as counter-clockwise.
    CounterClockwise,
    /// Marks the preceding distance as not connecting to the expected point.
    MissConnect,
    /// Suppresses creation of the point implied by the preceding distance.
    OmitPoint,
}

/// One parsed token of a path description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    pub item_type: PathItemType,
    /// Radians for angle kinds, the entered value for distance kinds,
    /// meaningless for marker kinds.
    pub value: f64,
    /// The entry unit, for `Units`, `Value` and the distance kinds.
    pub unit: Option<DistanceUnit>,
    /// Leg sequence number: 0 until assigned, positive for straight legs,
    /// negated for every item inside a curve.
    pub leg_number: i32,
}

impl PathItem {
    pub fn new(item_type: PathItemType, unit: Option<DistanceUnit>, value: f64) -> Self {
        Self {
            item_type,
            value,
            unit,
            leg_number: 0,
        }
    }

    /// An item that carries no value or unit (BC, EC, qualifiers).
    pub fn marker(item_type: PathItemType) -> Self {
        Self::new(item_type, None, 0.0)
    }

    /// The unit-qualified distance carried by this item, if it is a
    /// distance kind.
    pub fn distance(&self) -> Option<Distance> {
        match self.item_type {
            PathItemType::Value | PathItemType::Distance | PathItemType::Radius => self
                .unit
                .clone()
                .map(|unit| Distance::new(self.value, unit)),
            _ => None,
        }
    }

    pub fn is_distance(&self) -> bool {
        self.item_type == PathItemType::Distance
    }
}

/// A fully parsed, validated and leg-numbered path description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPath {
    pub items: Vec<PathItem>,
    pub leg_count: i32,
}
