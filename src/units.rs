// Unit conversion between internal SI values (m/s, meters) and the two
// selectable display systems. Internal accumulation elsewhere in the crate
// happens on already-converted display values, so switching units mid-trip
// only affects conversions from that point on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// m/s to km/h.
pub const MPS_TO_KMH: f64 = 3.6;

/// Kilometers per statute mile, used for speed conversion.
pub const KM_PER_MILE: f64 = 1.609344;

/// Meters per kilometer.
pub const METERS_PER_KM: f64 = 1000.0;

/// Meters per statute mile as used for distance display (truncated constant,
/// kept as-is for parity with the original instrument).
pub const METERS_PER_MILE: f64 = 1609.34;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Label shown next to the speed readout.
    pub fn speed_label(self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "MPH",
        }
    }

    /// Label shown next to the trip distance.
    pub fn distance_label(self) -> &'static str {
        match self {
            Units::Metric => "km",
            Units::Imperial => "mi",
        }
    }

    pub fn toggled(self) -> Units {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.speed_label())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" | "km/h" | "kmh" => Ok(Units::Metric),
            "imperial" | "mph" => Ok(Units::Imperial),
            other => Err(format!("unknown unit system: {other}")),
        }
    }
}

/// Convert an internal speed in m/s to the selected display unit.
pub fn speed_to_display(mps: f64, units: Units) -> f64 {
    match units {
        Units::Metric => mps * MPS_TO_KMH,
        Units::Imperial => mps * MPS_TO_KMH / KM_PER_MILE,
    }
}

/// Convert an internal distance in meters to the selected display unit.
pub fn distance_to_display(meters: f64, units: Units) -> f64 {
    match units {
        Units::Metric => meters / METERS_PER_KM,
        Units::Imperial => meters / METERS_PER_MILE,
    }
}
