//! Fleet Telemetry Simulation
//!
//! Generates synthetic robot telemetry for exercising the monitoring core.
//! Plays a compressed operating day through the store: gauge drift, load
//! spikes, battery drain, a maintenance window, and recovery, with status
//! transitions driven through the transition engine so alerts open and
//! resolve exactly as they would in production.
//!
//! # Usage
//! ```bash
//! ./simulate --robots 8 --hours 24 --seed 42
//! ```

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use rand::prelude::*;
use rand_distr::Normal;

use fleetwatch::advisor::{build_fleet_context, CompletionClient};
use fleetwatch::aggregation::{FleetAggregator, TimeWindow};
use fleetwatch::config::{self, FleetConfig};
use fleetwatch::lifecycle::TransitionEngine;
use fleetwatch::store::FleetStore;
use fleetwatch::types::{GroupType, Robot, RobotGroup, RobotReading, RobotStatus, RobotType};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "fleet-simulation")]
#[command(about = "Synthetic fleet telemetry for fleetwatch testing")]
#[command(version)]
struct Args {
    /// Number of robots in the simulated fleet
    #[arg(short, long, default_value = "6", value_parser = clap::value_parser!(u32).range(1..=500))]
    robots: u32,

    /// Simulated duration in hours (1-168)
    #[arg(short = 'H', long, default_value = "24", value_parser = clap::value_parser!(u32).range(1..=168))]
    hours: u32,

    /// Telemetry sample interval in minutes
    #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=120))]
    interval: u32,

    /// Aggregation window for the final stats printout (1h|10h|24h|7d|30d)
    #[arg(short, long, default_value = "24h")]
    window: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Suppress per-sample output (only print final stats)
    #[arg(short, long)]
    quiet: bool,

    /// Ask the fleet advisor a question about the simulated fleet afterwards
    /// (requires the advisor API token in the configured env var)
    #[arg(long)]
    ask: Option<String>,
}

// ============================================================================
// Simulation Phases
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Normal operation, gauges near nominal (0-50%)
    Nominal,
    /// CPU/memory load spike, some units go to warning (50-65%)
    LoadSpike,
    /// Battery drain, weakest units go critical (65-80%)
    BatteryDrain,
    /// Scheduled maintenance window (80-90%)
    MaintenanceWindow,
    /// Return to normal (90-100%)
    Recovery,
}

impl Phase {
    fn from_progress(progress: f64) -> Self {
        match progress {
            p if p < 0.50 => Phase::Nominal,
            p if p < 0.65 => Phase::LoadSpike,
            p if p < 0.80 => Phase::BatteryDrain,
            p if p < 0.90 => Phase::MaintenanceWindow,
            _ => Phase::Recovery,
        }
    }
}

const ROBOT_TYPES: [RobotType; 6] = [
    RobotType::Warehouse,
    RobotType::Production,
    RobotType::Delivery,
    RobotType::Inspection,
    RobotType::Cleaning,
    RobotType::Security,
];

fn build_fleet(store: &FleetStore, count: u32) -> Result<()> {
    store.add_group(RobotGroup::new("grp-north", "North Hall", GroupType::Location))?;
    store.add_group(RobotGroup::new("grp-south", "South Hall", GroupType::Location))?;

    for i in 0..count {
        let id = format!("RBT-{:03}", i + 1);
        let robot_type = ROBOT_TYPES[i as usize % ROBOT_TYPES.len()];
        let mut robot = Robot::new(&id, format!("{robot_type} unit #{}", i + 1), robot_type);
        robot.location = if i % 2 == 0 {
            "North Hall".to_string()
        } else {
            "South Hall".to_string()
        };
        robot.current_task = Some("patrol".to_string());
        store.add_robot(robot)?;
        let group = if i % 2 == 0 { "grp-north" } else { "grp-south" };
        store.assign_group(&id, Some(group))?;
    }
    Ok(())
}

fn target_status(phase: Phase, robot_index: u32, battery: f64, rng: &mut StdRng) -> RobotStatus {
    match phase {
        Phase::Nominal => {
            if rng.gen_bool(0.1) {
                RobotStatus::Idle
            } else {
                RobotStatus::Active
            }
        }
        // Every third unit struggles under load
        Phase::LoadSpike => {
            if robot_index % 3 == 0 {
                RobotStatus::Warning
            } else {
                RobotStatus::Active
            }
        }
        Phase::BatteryDrain => {
            if battery < 15.0 {
                RobotStatus::Critical
            } else if battery < 30.0 {
                RobotStatus::Warning
            } else {
                RobotStatus::Active
            }
        }
        Phase::MaintenanceWindow => {
            if robot_index % 2 == 0 {
                RobotStatus::Maintenance
            } else {
                RobotStatus::Idle
            }
        }
        Phase::Recovery => RobotStatus::Active,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    config::init(FleetConfig::load());

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let jitter = Normal::new(0.0, 2.0)?;

    let store = FleetStore::new();
    let engine = TransitionEngine::new(store.clone());
    build_fleet(&store, args.robots)?;

    let start = Utc::now() - Duration::hours(i64::from(args.hours));
    let step = Duration::minutes(i64::from(args.interval));
    let total_steps = (i64::from(args.hours) * 60 / i64::from(args.interval)).max(1);

    for step_index in 0..total_steps {
        let timestamp = start + step * i32::try_from(step_index)?;
        let progress = step_index as f64 / total_steps as f64;
        let phase = Phase::from_progress(progress);

        for i in 0..args.robots {
            let id = format!("RBT-{:03}", i + 1);

            store.update_robot(&id, |robot| {
                let load_base = match phase {
                    Phase::LoadSpike => 85.0,
                    Phase::MaintenanceWindow => 10.0,
                    _ => 40.0,
                };
                robot.set_cpu_load(load_base + jitter.sample(&mut rng) * 5.0);
                robot.set_memory_usage(load_base * 0.8 + jitter.sample(&mut rng) * 5.0);

                let drain = match phase {
                    Phase::BatteryDrain => 2.5,
                    Phase::MaintenanceWindow => -5.0, // charging
                    _ => 0.4,
                };
                robot.set_battery_level(robot.battery_level - drain + jitter.sample(&mut rng) * 0.2);
                robot.set_temperature(25.0 + robot.cpu_load * 0.2 + jitter.sample(&mut rng));
            })?;

            let robot = store
                .robot(&id)?
                .ok_or_else(|| anyhow::anyhow!("robot {id} vanished from store"))?;
            let next = target_status(phase, i, robot.battery_level, &mut rng);
            if next != robot.status {
                engine.transition(&id, next)?;
            }

            let current = store
                .robot(&id)?
                .ok_or_else(|| anyhow::anyhow!("robot {id} vanished from store"))?;
            let mut reading = RobotReading::capture(&current);
            reading.timestamp = timestamp;
            reading.signal_strength = Some(70.0 + jitter.sample(&mut rng) * 3.0);
            if !args.quiet {
                println!("{}", serde_json::to_string(&reading)?);
            }
            store.record_reading(reading)?;
        }
    }

    let window = TimeWindow::from_str(&args.window)
        .ok_or_else(|| anyhow::anyhow!("unknown window preset: {}", args.window))?;
    let aggregator = FleetAggregator::with_energy_model(store.clone(), config::get().energy);
    let stats = aggregator.compute_fleet_stats(window)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    if let Some(question) = args.ask.as_deref() {
        let client = CompletionClient::from_config(&config::get().advisor)?;
        let context = build_fleet_context(&store)?;
        let answer = tokio::runtime::Runtime::new()?.block_on(client.ask(question, &context))?;
        println!("\n{answer}");
    }

    Ok(())
}
