use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use taxi_sim::simulation::{
    DispatchPolicy, SimConfig, Simulation, TaxiState, DEFAULT_SETTLE_TICKS, DEFAULT_TAXI_SPEED,
    DEMO_RIDE_NODES,
};

#[derive(Parser)]
#[command(name = "taxi_sim")]
#[command(about = "Headless taxi dispatch simulation on the demo city")]
struct Cli {
    /// Maximum number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Taxi speed in map units per tick
    #[arg(long, default_value_t = DEFAULT_TAXI_SPEED)]
    speed: f32,

    /// Ticks a taxi stands still after a pickup or drop-off
    #[arg(long, default_value_t = DEFAULT_SETTLE_TICKS)]
    settle_ticks: u32,

    /// Match every waiting passenger each tick instead of one
    #[arg(long)]
    all_matches: bool,

    /// Ride requested at start, as PICKUP:DROPOFF (repeatable)
    #[arg(long = "ride", value_parser = parse_ride)]
    rides: Vec<(String, String)>,

    /// Number of random rides to request over the run
    #[arg(long, default_value = "4")]
    random_rides: usize,

    /// Ticks between random ride requests
    #[arg(long, default_value = "100")]
    request_every: u64,

    /// Seed for reproducible random rides
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks between progress reports (0 disables them)
    #[arg(long, default_value = "100")]
    report_every: u64,

    /// Print a terminal map with every report
    #[arg(long)]
    map: bool,
}

fn parse_ride(value: &str) -> Result<(String, String), String> {
    match value.split_once(':') {
        Some((pickup, dropoff)) if !pickup.is_empty() && !dropoff.is_empty() => {
            Ok((pickup.to_string(), dropoff.to_string()))
        }
        _ => Err(format!("expected PICKUP:DROPOFF, got '{}'", value)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SimConfig {
        taxi_speed: cli.speed,
        settle_ticks: cli.settle_ticks,
        dispatch_policy: if cli.all_matches {
            DispatchPolicy::AllEligible
        } else {
            DispatchPolicy::OnePerTick
        },
    };

    let mut sim = Simulation::create_demo(config).context("Failed to build demo city")?;

    for (pickup, dropoff) in &cli.rides {
        sim.request_ride_by_name(pickup, dropoff)
            .with_context(|| format!("Invalid ride {}:{}", pickup, dropoff))?;
    }

    run_headless(&mut sim, &cli);
    Ok(())
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(sim: &mut Simulation, cli: &Cli) {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    info!(
        "Running taxi simulation: up to {} ticks, speed {}, settle {} ticks",
        cli.ticks, cli.speed, cli.settle_ticks
    );
    sim.log_summary();
    if cli.map {
        println!("{}", sim.render_map(60));
    }

    let request_every = cli.request_every.max(1);
    let mut random_remaining = cli.random_rides;

    for tick in 0..cli.ticks {
        if random_remaining > 0 && tick % request_every == 0 {
            request_random_ride(sim, &mut rng);
            random_remaining -= 1;
        }

        sim.tick();

        if cli.report_every > 0 && sim.current_tick() % cli.report_every == 0 {
            info!("--- After tick {} ---", sim.current_tick());
            sim.log_summary();
            if cli.map {
                println!("{}", sim.render_map(60));
            }
        }

        let fleet_idle = sim
            .taxis()
            .iter()
            .all(|taxi| taxi.state == TaxiState::Idle && !taxi.is_settling());
        if random_remaining == 0 && sim.passengers().is_empty() && fleet_idle {
            info!("All rides served after {} ticks", sim.current_tick());
            break;
        }
    }

    info!("=== SIMULATION COMPLETE ===");
    sim.log_summary();
    if cli.map {
        println!("{}", sim.render_map(60));
    }
}

fn request_random_ride(sim: &mut Simulation, rng: &mut StdRng) {
    let Some(&pickup) = DEMO_RIDE_NODES.choose(rng) else {
        return;
    };
    let dropoffs: Vec<&str> = DEMO_RIDE_NODES
        .iter()
        .copied()
        .filter(|node| *node != pickup)
        .collect();
    let Some(&dropoff) = dropoffs.choose(rng) else {
        return;
    };

    // The simulation already warns about rejections
    if let Err(err) = sim.request_ride_by_name(pickup, dropoff) {
        debug!("Skipped random ride {} -> {}: {}", pickup, dropoff, err);
    }
}
