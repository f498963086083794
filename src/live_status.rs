use serde::{Deserialize, Serialize};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::DisplaySnapshot;
use crate::units::Units;

/// Latest display values plus session counters, written as JSON so an
/// external UI can poll the current state. This is only the current
/// snapshot; trip history is never persisted.
#[derive(Serialize, Deserialize, Clone)]
pub struct LiveStatus {
    pub timestamp: f64,
    pub uptime_seconds: u64,
    pub fix_count: u64,
    pub accel_samples: u64,
    pub speed: f64,
    pub average_speed: f64,
    pub max_speed: f64,
    pub distance: f64,
    pub units: Units,
    pub speed_label: String,
    pub distance_label: String,
}

impl LiveStatus {
    pub fn new(units: Units) -> Self {
        Self::from_snapshot(&DisplaySnapshot::zero(units), 0, 0, 0)
    }

    pub fn from_snapshot(
        snapshot: &DisplaySnapshot,
        uptime_seconds: u64,
        fix_count: u64,
        accel_samples: u64,
    ) -> Self {
        LiveStatus {
            timestamp: current_timestamp(),
            uptime_seconds,
            fix_count,
            accel_samples,
            speed: snapshot.speed,
            average_speed: snapshot.average_speed,
            max_speed: snapshot.max_speed,
            distance: snapshot.distance,
            units: snapshot.units,
            speed_label: snapshot.units.speed_label().to_string(),
            distance_label: snapshot.units.distance_label().to_string(),
        }
    }

    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

pub fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DisplaySnapshot;

    #[test]
    fn test_from_snapshot_carries_labels() {
        let snap = DisplaySnapshot {
            speed: 36.0,
            average_speed: 30.0,
            max_speed: 40.0,
            distance: 1.2,
            units: Units::Imperial,
        };
        let status = LiveStatus::from_snapshot(&snap, 60, 61, 3000);
        assert_eq!(status.speed_label, "MPH");
        assert_eq!(status.distance_label, "mi");
        assert_eq!(status.fix_count, 61);
    }

    #[test]
    fn test_save_round_trip() {
        let status = LiveStatus::new(Units::Metric);
        let path = std::env::temp_dir().join("speedometer_live_status_test.json");
        let path = path.to_str().unwrap().to_string();
        status.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: LiveStatus = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.units, Units::Metric);
        assert_eq!(parsed.speed, 0.0);
        let _ = std::fs::remove_file(&path);
    }
}
