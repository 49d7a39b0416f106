//! Distance units of measurement and unit-qualified distances.
//!
//! A survey job defines a table of entry units keyed by abbreviation.
//! Three units are always available (meters, feet and chains); callers
//! may register additional ones.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Definition of a unit of measurement for distance data entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceUnit {
    name: String,
    abbreviation: String,
    /// Scaling factor to convert an entered value of this unit to meters.
    to_meters: f64,
}

impl DistanceUnit {
    /// Defines a unit of measurement.
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>, to_meters: f64) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            to_meters,
        }
    }

    pub fn meters() -> Self {
        Self::new("Meters", "m", 1.0)
    }

    pub fn feet() -> Self {
        Self::new("Feet", "ft", 0.3048)
    }

    pub fn chains() -> Self {
        Self::new("Chains", "ch", 20.1168)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accepted abbreviation (e.g. "ft").
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// Converts a value in this unit to a metric value.
    pub fn to_metric(&self, value: f64) -> f64 {
        value * self.to_meters
    }

    /// Converts a value in meters into this unit.
    pub fn from_metric(&self, meters: f64) -> f64 {
        meters / self.to_meters
    }

    /// Formats a metric distance in this unit, trimming trailing zeroes
    /// and optionally appending the unit abbreviation.
    pub fn format(&self, meters: f64, with_abbreviation: bool) -> String {
        let mut s = format!("{:.6}", self.from_metric(meters));
        if s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
        if with_abbreviation {
            s.push_str(&self.abbreviation);
        }
        s
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A distance observation: the entered value together with its entry unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    /// The distance in meters on the ground.
    pub fn meters(&self) -> f64 {
        self.unit.to_metric(self.value)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unit.format(self.meters(), true))
    }
}

static BUILTIN_UNITS: Lazy<Vec<DistanceUnit>> = Lazy::new(|| {
    vec![
        DistanceUnit::meters(),
        DistanceUnit::feet(),
        DistanceUnit::chains(),
    ]
});

/// The distance units known to a survey job, keyed by abbreviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTable {
    units: Vec<DistanceUnit>,
}

impl UnitTable {
    /// Creates a table with no units at all; the default table is the
    /// builtin one.
    pub fn empty() -> Self {
        Self { units: Vec::new() }
    }

    /// Creates a table holding the builtin meters, feet and chains units.
    pub fn builtin() -> Self {
        Self {
            units: BUILTIN_UNITS.clone(),
        }
    }

    /// Registers a unit, replacing any existing unit with the same abbreviation.
    pub fn add(&mut self, unit: DistanceUnit) {
        self.units.retain(|u| u.abbreviation != unit.abbreviation);
        self.units.push(unit);
    }

    /// Looks up a unit by its exact abbreviation.
    pub fn find(&self, abbreviation: &str) -> Option<&DistanceUnit> {
        self.units.iter().find(|u| u.abbreviation == abbreviation)
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let table = UnitTable::builtin();
        assert_eq!(table.find("m").unwrap().name(), "Meters");
        assert_eq!(table.find("ft").unwrap().name(), "Feet");
        assert_eq!(table.find("ch").unwrap().name(), "Chains");
        assert!(table.find("f").is_none());
        assert!(table.find("FT").is_none());
    }

    #[test]
    fn conversion_roundtrip() {
        let ft = DistanceUnit::feet();
        assert!((ft.to_metric(100.0) - 30.48).abs() < 1e-9);
        assert!((ft.from_metric(30.48) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn distance_in_meters() {
        let d = Distance::new(5.0, DistanceUnit::chains());
        assert!((d.meters() - 100.584).abs() < 1e-9);
    }

    #[test]
    fn formatting_trims_zeroes() {
        let m = DistanceUnit::meters();
        assert_eq!(m.format(100.0, true), "100m");
        assert_eq!(m.format(100.25, false), "100.25");
        let ft = DistanceUnit::feet();
        assert_eq!(ft.format(30.48, true), "100ft");
    }

    #[test]
    fn add_replaces_same_abbreviation() {
        let mut table = UnitTable::builtin();
        table.add(DistanceUnit::new("US survey feet", "ft", 0.304_800_61));
        assert_eq!(table.find("ft").unwrap().name(), "US survey feet");
    }

    #[test]
    fn empty_table_knows_nothing() {
        let mut table = UnitTable::empty();
        assert!(table.find("m").is_none());
        table.add(DistanceUnit::meters());
        assert!(table.find("m").is_some());

        // The default table is the builtin one, not the empty one.
        assert!(UnitTable::default().find("m").is_some());
    }
}
