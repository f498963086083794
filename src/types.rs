use serde::{Deserialize, Serialize};

use crate::units::Units;

/// One GPS position, in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate { latitude, longitude }
    }
}

/// One location update: position, instantaneous speed, wall-clock timestamp.
///
/// `speed` is the receiver's raw ground speed in m/s; receivers without a
/// doppler solution report `None`, which the pipeline treats as 0.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Fix {
    pub coordinate: Coordinate,
    pub speed: Option<f64>,
    pub timestamp_ms: i64,
}

/// The display-ready tuple emitted once per processed fix.
///
/// All fields are already unit-converted; the presentation layer renders
/// them as-is.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    pub speed: f64,
    pub average_speed: f64,
    pub max_speed: f64,
    pub distance: f64,
    pub units: Units,
}

impl DisplaySnapshot {
    pub fn zero(units: Units) -> Self {
        DisplaySnapshot {
            speed: 0.0,
            average_speed: 0.0,
            max_speed: 0.0,
            distance: 0.0,
            units,
        }
    }
}
