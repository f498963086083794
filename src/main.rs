use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

mod filters;
mod geo;
mod live_status;
mod pipeline;
mod sensors;
mod trip_stats;
mod types;
mod units;

use pipeline::{MotionPipeline, PipelineConfig};
use types::Fix;
use units::Units;

#[derive(Parser, Debug)]
#[command(name = "speedometer")]
#[command(about = "GPS speedometer core driven by simulated sensors", long_about = None)]
struct Args {
    /// Duration in seconds (0 = continuous)
    #[arg(value_name = "SECONDS", default_value = "0")]
    duration: u64,

    /// Display units (metric, imperial)
    #[arg(long, default_value = "metric")]
    units: Units,

    /// Kalman measurement noise R
    #[arg(long, default_value = "0.01")]
    measurement_noise: f64,

    /// Kalman process noise Q
    #[arg(long, default_value = "3.0")]
    process_noise: f64,

    /// Reset trip statistics after this many seconds
    #[arg(long)]
    reset_after: Option<u64>,

    /// Toggle display units after this many seconds
    #[arg(long)]
    toggle_units_after: Option<u64>,

    /// Output directory for live status
    #[arg(long, default_value = "speedometer_sessions")]
    output_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("[{}] Speedometer starting", ts_now());
    println!("  Duration: {} seconds (0=continuous)", args.duration);
    println!("  Units: {}", args.units);
    println!("  Filter: R={} Q={}", args.measurement_noise, args.process_noise);
    println!("  Output Dir: {}", args.output_dir);

    std::fs::create_dir_all(&args.output_dir)?;

    let config = PipelineConfig {
        measurement_noise: args.measurement_noise,
        process_noise: args.process_noise,
        units: args.units,
    };
    let mut pipeline = MotionPipeline::new(config);

    // Channels sized like the sensor cadence: fixes trickle, accel floods
    let (fix_tx, mut fix_rx) = mpsc::channel::<Fix>(100);
    let (accel_tx, mut accel_rx) = mpsc::channel::<f64>(500);

    let _fix_handle = tokio::spawn(sensors::fix_loop(fix_tx));
    let _accel_handle = tokio::spawn(sensors::accel_loop(accel_tx));

    let start = Utc::now();
    let mut last_status_update = Utc::now();
    let mut reset_done = false;
    let mut toggle_done = false;

    println!("[{}] Waiting for first fix...", ts_now());

    loop {
        let elapsed = Utc::now().signed_duration_since(start).num_seconds().max(0) as u64;

        if args.duration > 0 && elapsed >= args.duration {
            println!("[{}] Duration reached, stopping...", ts_now());
            break;
        }

        // Scripted commands, standing in for the presentation layer's
        // reset button and unit toggle
        if let Some(after) = args.reset_after {
            if !reset_done && elapsed >= after {
                pipeline.reset_trip();
                reset_done = true;
                println!("[{}] Trip statistics reset", ts_now());
            }
        }
        if let Some(after) = args.toggle_units_after {
            if !toggle_done && elapsed >= after {
                let next = pipeline.units().toggled();
                pipeline.set_units(next);
                toggle_done = true;
                println!("[{}] Units switched to {}", ts_now(), next);
            }
        }

        // Drain whatever the sensor loops delivered since last pass
        while let Ok(reading) = accel_rx.try_recv() {
            pipeline.process_accel(reading);
        }
        while let Ok(fix) = fix_rx.try_recv() {
            if let Some(snap) = pipeline.process_fix(&fix) {
                log::debug!(
                    "fix -> {:.1} {} (avg {:.1}, max {:.1}, dist {:.3} {})",
                    snap.speed,
                    snap.units.speed_label(),
                    snap.average_speed,
                    snap.max_speed,
                    snap.distance,
                    snap.units.distance_label()
                );
            }
        }

        // Status print + live status file every 2 seconds
        let now = Utc::now();
        if now.signed_duration_since(last_status_update).num_seconds() >= 2 {
            let snap = pipeline.snapshot();
            println!(
                "[{}] {:.1} {} | avg {:.1} | max {:.1} | {:.2} {}",
                ts_now(),
                snap.speed,
                snap.units.speed_label(),
                snap.average_speed,
                snap.max_speed,
                snap.distance,
                snap.units.distance_label()
            );

            let status = live_status::LiveStatus::from_snapshot(
                &snap,
                elapsed,
                pipeline.fixes_seen(),
                pipeline.accel_samples_used(),
            );
            let status_path = format!("{}/live_status.json", args.output_dir);
            if let Err(e) = status.save(&status_path) {
                log::warn!("failed to write {status_path}: {e}");
            }
            last_status_update = now;
        }

        sleep(Duration::from_millis(10)).await;
    }

    // Final summary
    let snap = pipeline.snapshot();
    println!("\n=== Trip Summary ===");
    println!("Fixes processed: {}", pipeline.fixes_seen());
    println!("Accel samples: {}", pipeline.accel_samples_used());
    println!("Average speed: {:.1} {}", snap.average_speed, snap.units.speed_label());
    println!("Max speed: {:.1} {}", snap.max_speed, snap.units.speed_label());
    println!("Distance: {:.2} {}", snap.distance, snap.units.distance_label());

    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}
