// Simulated location and accelerometer sources for the demo binary.
//
// The real instrument gets its data from the platform location and motion
// services; this module stands in for them with interval-driven loops so
// the pipeline can be exercised end-to-end without hardware. The generated
// drive follows a gentle speed oscillation heading east along the equator.

use log::{debug, warn};
use tokio::sync::mpsc::Sender;
use tokio::time::{interval, Duration};

use crate::types::{Coordinate, Fix};

const FIX_INTERVAL_MS: u64 = 1000; // platform location cadence, ~1 Hz
const ACCEL_INTERVAL_MS: u64 = 20; // sensor-native rate, ~50 Hz

/// Deterministic simulated fix for sequence number `seq`.
pub fn mock_fix(seq: u64) -> Fix {
    let t = seq as f64;
    // ~10 m/s cruise with a slow +/-4 m/s swing
    let speed = 10.0 + 4.0 * (t * 0.1).sin();
    // Walk east; 1e-4 degrees of longitude is ~11 m at the equator
    Fix {
        coordinate: Coordinate::new(0.0, t * 1e-4),
        speed: Some(speed),
        timestamp_ms: (seq * FIX_INTERVAL_MS) as i64,
    }
}

/// Deterministic simulated accelerometer x-axis reading for sample `seq`.
pub fn mock_accel(seq: u64) -> f64 {
    let t = seq as f64 * 0.02;
    0.4 * (t * 0.1).cos()
}

pub async fn fix_loop(tx: Sender<Fix>) {
    let mut ticker = interval(Duration::from_millis(FIX_INTERVAL_MS));
    let mut seq = 0u64;

    loop {
        ticker.tick().await;
        let fix = mock_fix(seq);
        seq += 1;

        match tx.try_send(fix) {
            Ok(_) => {
                if seq % 10 == 0 {
                    debug!("[gps] {seq} fixes delivered");
                }
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                debug!("[gps] channel closed after {seq} fixes");
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                warn!("[gps] channel full, dropping fix {seq}");
            }
        }
    }
}

pub async fn accel_loop(tx: Sender<f64>) {
    let mut ticker = interval(Duration::from_millis(ACCEL_INTERVAL_MS));
    let mut seq = 0u64;

    loop {
        ticker.tick().await;
        let reading = mock_accel(seq);
        seq += 1;

        match tx.try_send(reading) {
            Ok(_) => {
                if seq % 500 == 0 {
                    debug!("[accel] {seq} samples delivered");
                }
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                debug!("[accel] channel closed after {seq} samples");
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                // Channel full, drop this sample
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fix_timestamps_increase() {
        let mut prev = mock_fix(0).timestamp_ms;
        for seq in 1..20 {
            let fix = mock_fix(seq);
            assert!(fix.timestamp_ms > prev);
            prev = fix.timestamp_ms;
        }
    }

    #[test]
    fn test_mock_fix_speed_bounds() {
        for seq in 0..200 {
            let speed = mock_fix(seq).speed.unwrap();
            assert!(speed >= 6.0 && speed <= 14.0);
        }
    }

    #[test]
    fn test_mock_accel_finite() {
        for seq in 0..2000 {
            assert!(mock_accel(seq).is_finite());
        }
    }
}
