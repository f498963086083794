// pipeline.rs — Pure computation core of the speedometer.
//
// Everything in this module is independent of:
//   - tokio / async runtime
//   - the platform location and sensor subscriptions
//   - File I/O and status output
//
// It takes fixes and accelerometer samples in, produces display snapshots
// out, so it can be unit-tested with synthetic data and driven by any
// frontend that owns the subscription lifecycle.

use log::{info, trace};

use crate::filters::ScalarKalman;
use crate::geo;
use crate::trip_stats::TripStats;
use crate::types::{DisplaySnapshot, Fix};
use crate::units::{self, Units};

/// Noise parameters and initial unit selection for a pipeline instance.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    /// Kalman measurement noise R (GPS speed readings are trusted heavily).
    pub measurement_noise: f64,
    /// Kalman process noise Q (true speed drifts a lot between 1 Hz fixes).
    pub process_noise: f64,
    pub units: Units,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            measurement_noise: 0.01,
            process_noise: 3.0,
            units: Units::Metric,
        }
    }
}

enum PipelineState {
    /// No fix seen yet; there is no previous position to measure from.
    AwaitingFirstFix,
    /// Normal operation: every new fix is compared against `last_fix`.
    Tracking { last_fix: Fix },
}

/// Orchestrates filter, distance computation, and trip statistics.
///
/// Single-threaded and event-driven: the host delivers fixes and
/// accelerometer samples synchronously in whatever order they arrive.
/// Accelerometer samples only perturb filter covariance, so interleaving
/// order with fixes does not matter.
pub struct MotionPipeline {
    filter: ScalarKalman,
    stats: TripStats,
    state: PipelineState,
    units: Units,
    last_display_speed: f64,
    fix_count: u64,
    accel_count: u64,
}

impl MotionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        MotionPipeline {
            filter: ScalarKalman::new(config.measurement_noise, config.process_noise),
            stats: TripStats::new(),
            state: PipelineState::AwaitingFirstFix,
            units: config.units,
            last_display_speed: 0.0,
            fix_count: 0,
            accel_count: 0,
        }
    }

    /// Process one location fix.
    ///
    /// The first fix of a session only establishes the reference position
    /// and returns `None`; every later fix produces a display snapshot.
    pub fn process_fix(&mut self, fix: &Fix) -> Option<DisplaySnapshot> {
        self.fix_count += 1;

        let last_fix = match &self.state {
            PipelineState::AwaitingFirstFix => {
                info!(
                    "first fix at ({:.6}, {:.6}), tracking started",
                    fix.coordinate.latitude, fix.coordinate.longitude
                );
                self.state = PipelineState::Tracking { last_fix: *fix };
                return None;
            }
            PipelineState::Tracking { last_fix } => *last_fix,
        };

        let distance_delta = geo::distance_meters(last_fix.coordinate, fix.coordinate);
        // Elapsed time between fixes is not used by the estimate yet; kept
        // as a hook for implied-speed sanity checks.
        let elapsed_secs = (fix.timestamp_ms - last_fix.timestamp_ms) as f64 / 1000.0;
        trace!("fix dt={elapsed_secs:.3}s delta={distance_delta:.2}m");

        let raw_speed = fix.speed.unwrap_or(0.0);
        let estimate = self.filter.filter(raw_speed);
        let display_speed = units::speed_to_display(estimate.x, self.units);
        let stats = self.stats.update(display_speed, distance_delta, self.units);

        self.last_display_speed = display_speed;
        self.state = PipelineState::Tracking { last_fix: *fix };

        Some(DisplaySnapshot {
            speed: display_speed,
            average_speed: stats.average_speed,
            max_speed: stats.max_speed,
            distance: stats.distance,
            units: self.units,
        })
    }

    /// Feed one accelerometer axis reading into the filter's predict step.
    ///
    /// Best-effort smoothing aid with no observable output of its own;
    /// non-finite readings are dropped at this boundary so a flaky sensor
    /// cannot poison the filter.
    pub fn process_accel(&mut self, reading: f64) {
        if !reading.is_finite() {
            trace!("dropping non-finite accel reading");
            return;
        }
        self.accel_count += 1;
        self.filter.predict(reading);
    }

    /// Switch display units; applies from the next processed fix onward.
    /// Already-accumulated statistics keep their numeric values.
    pub fn set_units(&mut self, units: Units) {
        if units != self.units {
            info!("units switched to {units}");
            self.units = units;
        }
    }

    /// Zero the trip statistics. Filter state and the last known fix are
    /// untouched, so distance deltas continue seamlessly from the next fix.
    pub fn reset_trip(&mut self) {
        info!("trip statistics reset");
        self.stats.reset();
    }

    /// Current display values without processing anything new.
    pub fn snapshot(&self) -> DisplaySnapshot {
        let stats = self.stats.snapshot();
        DisplaySnapshot {
            speed: self.last_display_speed,
            average_speed: stats.average_speed,
            max_speed: stats.max_speed,
            distance: stats.distance,
            units: self.units,
        }
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, PipelineState::Tracking { .. })
    }

    pub fn fixes_seen(&self) -> u64 {
        self.fix_count
    }

    pub fn accel_samples_used(&self) -> u64 {
        self.accel_count
    }
}
