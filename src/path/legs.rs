//! Construction of straight and circular legs from a leg-numbered item
//! sequence, and projection of those legs onto the ground.

use serde::{Deserialize, Serialize};

use crate::error::{PathError, Result};
use crate::geometry::{self, Point, TINY};
use crate::units::Distance;

use super::{PathItem, PathItemType};

use std::f64::consts::{PI, TAU};

/// Qualifier attached to one observed span of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanQualifier {
    /// The span does not connect to the expected point.
    MissConnect,
    /// The point at the end of the span should not be created.
    OmitPoint,
}

/// One observed distance along a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub distance: Distance,
    pub qualifier: Option<SpanQualifier>,
}

/// A straight run of one or more spans, optionally turned through an
/// angle observed at its start point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightLeg {
    /// Angle at the start of the leg, in radians. Zero when unobserved.
    pub start_angle: f64,
    /// Interpret `start_angle` as a deflection from the previous course
    /// rather than an angle from the backsight.
    pub is_deflection: bool,
    pub spans: Vec<Span>,
}

/// Angular observations defining the shape of a circular leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveAngles {
    /// A cul-de-sac, defined only by the angle subtended at the center.
    CulDeSac { central: f64 },
    /// Entry angle at the BC, with an optional distinct exit angle.
    Entry { entry: f64, exit: Option<f64> },
}

/// A circular arc between a BC and an EC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularLeg {
    pub radius: Distance,
    pub clockwise: bool,
    pub angles: CurveAngles,
    pub spans: Vec<Span>,
}

/// One leg of a connection path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Leg {
    Straight(StraightLeg),
    Circular(CircularLeg),
}

impl StraightLeg {
    /// Total observed length in meters.
    pub fn length(&self) -> f64 {
        self.spans.iter().map(|s| s.distance.meters()).sum()
    }

    /// Applies the start angle (if any) to the bearing at the end of the
    /// previous leg. A plain angle is measured from the backsight; a
    /// deflection from the extension of the previous course.
    fn turned_bearing(&self, bearing: f64) -> f64 {
        if self.start_angle.abs() < TINY {
            return bearing;
        }
        if self.is_deflection {
            bearing + self.start_angle
        } else {
            bearing + self.start_angle - PI
        }
    }

    /// Advances `pos` and `bearing` over this leg, scaling distances by `sfac`.
    pub fn project(&self, pos: &mut Point, bearing: &mut f64, sfac: f64) {
        *bearing = self.turned_bearing(*bearing);
        *pos = geometry::polar(*pos, *bearing, self.length() * sfac);
    }
}

impl CircularLeg {
    pub fn is_cul_de_sac(&self) -> bool {
        matches!(self.angles, CurveAngles::CulDeSac { .. })
    }

    /// The exit angle at the EC, which equals the entry angle unless a
    /// second angle was observed. Meaningless for a cul-de-sac.
    pub fn exit_angle(&self) -> f64 {
        match self.angles {
            CurveAngles::CulDeSac { .. } => 0.0,
            CurveAngles::Entry { entry, exit } => exit.unwrap_or(entry),
        }
    }

    /// Sum of the observed spans, in meters.
    fn observed_length(&self) -> f64 {
        self.spans.iter().map(|s| s.distance.meters()).sum()
    }

    /// Total length in meters. A cul-de-sac is fixed by its central angle
    /// and radius (the arc runs the long way around); any other curve is
    /// the total of its observed spans.
    pub fn length(&self) -> f64 {
        match self.angles {
            CurveAngles::CulDeSac { central } => (TAU - central) * self.radius.meters(),
            CurveAngles::Entry { .. } => self.observed_length(),
        }
    }

    /// Advances `pos` and `bearing` over this leg, scaling distances by `sfac`.
    pub fn project(&self, pos: &mut Point, bearing: &mut f64, sfac: f64) {
        let ccw = !self.clockwise;
        let radius = self.radius.meters() * sfac;
        let reverse_bearing = *bearing + PI;
        let mut b = *bearing;

        // Swing from the entry course to the circle center.
        match self.angles {
            CurveAngles::CulDeSac { central } => {
                let half = central * 0.5;
                if ccw {
                    b -= half;
                } else {
                    b += half;
                }
            }
            CurveAngles::Entry { entry, .. } => {
                if ccw {
                    b -= PI - entry;
                } else {
                    b += PI - entry;
                }
            }
        }
        let center = geometry::polar(*pos, b, radius);

        // Swing on to the EC. For a regular curve the central angle comes
        // from the observed length against the circumference.
        match self.angles {
            CurveAngles::CulDeSac { central } => {
                if ccw {
                    b -= PI - central;
                } else {
                    b += PI - central;
                }
            }
            CurveAngles::Entry { .. } => {
                let length = self.observed_length() * sfac;
                let central = TAU * (length / (radius * TAU));
                if ccw {
                    b += PI - central;
                } else {
                    b -= PI - central;
                }
            }
        }
        *pos = geometry::polar(center, b, radius);

        // Exit bearing. A cul-de-sac comes back parallel to the entry
        // course; otherwise the exit angle carries the new course.
        *bearing = if self.is_cul_de_sac() {
            reverse_bearing
        } else {
            let exit = self.exit_angle();
            if ccw {
                b - (PI - exit)
            } else {
                b + (PI - exit)
            }
        };
    }
}

impl Leg {
    /// Total length of this leg, in meters on the ground.
    pub fn length(&self) -> f64 {
        match self {
            Leg::Straight(leg) => leg.length(),
            Leg::Circular(leg) => leg.length(),
        }
    }

    /// Advances `pos` and `bearing` over this leg, scaling distances by `sfac`.
    pub fn project(&self, pos: &mut Point, bearing: &mut f64, sfac: f64) {
        match self {
            Leg::Straight(leg) => leg.project(pos, bearing, sfac),
            Leg::Circular(leg) => leg.project(pos, bearing, sfac),
        }
    }
}

/// Creates the legs for a validated, leg-numbered item sequence.
pub fn build_legs(items: &[PathItem]) -> Result<Vec<Leg>> {
    let nleg = items
        .iter()
        .map(|it| it.leg_number.abs())
        .max()
        .unwrap_or(0);
    if nleg == 0 {
        return Err(PathError::NoLegs);
    }

    let mut legs = Vec::with_capacity(nleg as usize);
    let mut si = 0;
    while si < items.len() {
        // Skip anything outside a leg (a units change, for instance).
        if items[si].leg_number == 0 {
            si += 1;
            continue;
        }

        let (leg, next) = if items[si].item_type == PathItemType::Bc {
            circular_leg(items, si)?
        } else {
            straight_leg(items, si)
        };
        legs.push(leg);
        si = next;
    }

    debug_assert_eq!(legs.len(), nleg as usize);
    Ok(legs)
}

fn straight_leg(items: &[PathItem], si: usize) -> (Leg, usize) {
    let legnum = items[si].leg_number;
    let mut next = si;
    while next < items.len() && items[next].leg_number == legnum {
        next += 1;
    }

    let (start_angle, is_deflection) = match items[si].item_type {
        PathItemType::Angle => (items[si].value, false),
        PathItemType::Deflection => (items[si].value, true),
        _ => (0.0, false),
    };

    let leg = StraightLeg {
        start_angle,
        is_deflection,
        spans: collect_spans(&items[si..next]),
    };
    (Leg::Straight(leg), next)
}

fn circular_leg(items: &[PathItem], si: usize) -> Result<(Leg, usize)> {
    // The BC has to be followed by at least an angle, a radius and the EC.
    if items.len() < si + 4 {
        return Err(PathError::ShortCurve);
    }

    let legnum = items[si].leg_number;
    let mut i = si + 1;

    let angles = match items[i].item_type {
        PathItemType::CentralAngle => {
            let central = items[i].value;
            i += 1;
            CurveAngles::CulDeSac { central }
        }
        PathItemType::BcAngle => {
            let entry = items[i].value;
            i += 1;
            let exit = if items[i].item_type == PathItemType::EcAngle {
                let exit = items[i].value;
                i += 1;
                Some(exit)
            } else {
                None
            };
            CurveAngles::Entry { entry, exit }
        }
        _ => return Err(PathError::CurveWithoutAngle),
    };

    if items[i].item_type != PathItemType::Radius {
        return Err(PathError::CurveWithoutRadius);
    }
    let radius = items[i].distance().ok_or(PathError::MissingUnit)?;
    i += 1;

    let mut clockwise = true;
    if i < items.len() && items[i].item_type == PathItemType::CounterClockwise {
        clockwise = false;
        i += 1;
    }

    let mut next = i;
    while next < items.len() && items[next].leg_number == legnum {
        next += 1;
    }

    let leg = CircularLeg {
        radius,
        clockwise,
        angles,
        spans: collect_spans(&items[i..next]),
    };
    Ok((Leg::Circular(leg), next))
}

/// Collects the observed distances in a slice of one leg's items, pairing
/// each with the qualifier that immediately follows it (if any).
fn collect_spans(items: &[PathItem]) -> Vec<Span> {
    let mut spans = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if !item.is_distance() {
            continue;
        }
        let Some(distance) = item.distance() else {
            continue;
        };
        let qualifier = items.get(i + 1).and_then(|next| match next.item_type {
            PathItemType::MissConnect => Some(SpanQualifier::MissConnect),
            PathItemType::OmitPoint => Some(SpanQualifier::OmitPoint),
            _ => None,
        });
        spans.push(Span {
            distance,
            qualifier,
        });
    }
    spans
}
