use serde::{Deserialize, Serialize};

use crate::units::{self, Units};

/// Read-only view of the accumulated trip statistics.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TripStatsSnapshot {
    pub average_speed: f64,
    pub max_speed: f64,
    pub distance: f64,
    pub sample_count: u64,
}

/// Running trip statistics in display units.
///
/// Two states: `Idle` (no samples yet, everything zero) and `Accumulating`.
/// The first `update` leaves `Idle`; `reset` returns to it from anywhere.
/// Values accumulate in whatever display unit was active when each sample
/// arrived; a mid-trip unit switch changes the conversion basis going
/// forward only (matching the original instrument).
///
/// Between resets `max_speed` and `distance` are monotonically
/// non-decreasing, and `average_speed == total/count` whenever count > 0.
#[derive(Clone, Debug, Default)]
pub struct TripStats {
    average_speed: f64,
    max_speed: f64,
    distance: f64,
    total_speed: f64,
    sample_count: u64,
}

impl TripStats {
    pub fn new() -> Self {
        TripStats::default()
    }

    /// Fold one processed fix into the running statistics.
    ///
    /// `display_speed` is already unit-converted; `distance_delta_meters` is
    /// raw SI and gets converted here with the currently active units.
    pub fn update(
        &mut self,
        display_speed: f64,
        distance_delta_meters: f64,
        units: Units,
    ) -> TripStatsSnapshot {
        self.total_speed += display_speed;
        self.sample_count += 1;
        self.average_speed = self.total_speed / self.sample_count as f64;
        self.max_speed = self.max_speed.max(display_speed);
        self.distance += units::distance_to_display(distance_delta_meters, units);
        self.snapshot()
    }

    /// Zero everything and return to `Idle`. Idempotent.
    pub fn reset(&mut self) {
        *self = TripStats::default();
    }

    pub fn is_idle(&self) -> bool {
        self.sample_count == 0
    }

    pub fn snapshot(&self) -> TripStatsSnapshot {
        TripStatsSnapshot {
            average_speed: self.average_speed,
            max_speed: self.max_speed,
            distance: self.distance,
            sample_count: self.sample_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle_and_zero() {
        let stats = TripStats::new();
        assert!(stats.is_idle());
        let snap = stats.snapshot();
        assert_eq!(snap.average_speed, 0.0);
        assert_eq!(snap.max_speed, 0.0);
        assert_eq!(snap.distance, 0.0);
    }

    #[test]
    fn test_average_and_max_invariants() {
        let mut stats = TripStats::new();
        let speeds = [30.0, 50.0, 40.0, 45.0];
        for s in speeds {
            stats.update(s, 0.0, Units::Metric);
        }
        let snap = stats.snapshot();
        let expected_avg = speeds.iter().sum::<f64>() / speeds.len() as f64;
        assert!((snap.average_speed - expected_avg).abs() < 1e-12);
        assert_eq!(snap.max_speed, 50.0);
        assert_eq!(snap.sample_count, 4);
        assert!(!stats.is_idle());
    }

    #[test]
    fn test_distance_accumulates_in_display_units() {
        let mut stats = TripStats::new();
        stats.update(10.0, 500.0, Units::Metric);
        let snap = stats.update(10.0, 500.0, Units::Metric);
        assert!((snap.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_monotone_between_resets() {
        let mut stats = TripStats::new();
        stats.update(60.0, 0.0, Units::Metric);
        let snap = stats.update(20.0, 0.0, Units::Metric);
        assert_eq!(snap.max_speed, 60.0);
    }

    #[test]
    fn test_unit_switch_is_not_retroactive() {
        let mut stats = TripStats::new();
        // 1609.34 m accumulated as metric, then again as imperial
        stats.update(10.0, 1609.34, Units::Metric);
        let snap = stats.update(10.0, 1609.34, Units::Imperial);
        // 1.60934 km + 1.0 mi, numerically mixed (faithful behavior)
        assert!((snap.distance - 2.60934).abs() < 1e-9);
    }

    #[test]
    fn test_reset_idempotent() {
        let mut stats = TripStats::new();
        stats.update(42.0, 1000.0, Units::Metric);
        stats.reset();
        let once = stats.snapshot();
        stats.reset();
        let twice = stats.snapshot();
        assert!(stats.is_idle());
        assert_eq!(once.average_speed, 0.0);
        assert_eq!(once.max_speed, 0.0);
        assert_eq!(once.distance, 0.0);
        assert_eq!(twice.sample_count, 0);
    }
}
