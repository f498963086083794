//! Motion-estimation core for a GPS speedometer.
//!
//! Consumes noisy location fixes and accelerometer samples, produces a
//! smoothed display speed plus running trip statistics (average, max,
//! distance). The [`pipeline::MotionPipeline`] is the single entry point;
//! everything upstream (platform sensor subscriptions, permissions) and
//! downstream (rendering) lives outside this crate.

pub mod filters;
pub mod geo;
pub mod live_status;
pub mod pipeline;
pub mod sensors;
pub mod trip_stats;
pub mod types;
pub mod units;

pub use pipeline::{MotionPipeline, PipelineConfig};
pub use trip_stats::{TripStats, TripStatsSnapshot};
pub use types::{Coordinate, DisplaySnapshot, Fix};
pub use units::Units;
