use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use junction_sim::config::{load_regimes, JunctionConfig};
use junction_sim::simulation::{default_regimes, Simulation, TrafficSystem, VehicleGenerator};

#[derive(Parser)]
#[command(name = "junction_sim")]
#[command(about = "Tick-based simulation of a junction with two traffic lights")]
struct Cli {
    /// Junction parameter file (lane lengths and light timing)
    #[arg(long)]
    properties: Option<PathBuf>,

    /// Arrival regime table
    #[arg(long)]
    probabilities: Option<PathBuf>,

    /// Total number of ticks to run (ignored with --interactive)
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Ticks between statistics reports
    #[arg(long, default_value = "100")]
    batch: u64,

    /// Pause after each tick, in milliseconds
    #[arg(long, default_value = "0")]
    delay_ms: u64,

    /// Seed for reproducible arrivals
    #[arg(long)]
    seed: Option<u64>,

    /// Ask whether to continue after each batch
    #[arg(long)]
    interactive: bool,

    /// Do not print the junction after every tick
    #[arg(long)]
    quiet: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("******* {err:#}");
        std::process::exit(1);
    }
}

fn build_system(cli: &Cli) -> Result<TrafficSystem> {
    let config = match &cli.properties {
        Some(path) => JunctionConfig::load(path)?,
        None => JunctionConfig::default(),
    };
    let regimes = match &cli.probabilities {
        Some(path) => load_regimes(path)?,
        None => default_regimes(),
    };
    let generator = match cli.seed {
        Some(seed) => VehicleGenerator::with_seed(regimes, seed)?,
        None => VehicleGenerator::new(regimes)?,
    };
    Ok(TrafficSystem::new(config, generator))
}

fn run(cli: Cli) -> Result<()> {
    let system = build_system(&cli)?;
    let setup = system.setup();
    info!(
        "Junction setup: {} regimes over a {}-tick cycle, lights every {} ticks",
        setup.regimes.len(),
        setup.regimes.iter().map(|r| r.duration).sum::<u64>(),
        setup.config.light_period
    );
    println!("{setup}");
    println!();

    let mut sim = Simulation::new(system);
    let batch = cli.batch.max(1);
    let delay = Duration::from_millis(cli.delay_ms);
    let stdin = io::stdin();

    loop {
        let ticks_to_run = if cli.interactive {
            batch
        } else {
            batch.min(cli.ticks.saturating_sub(sim.now()))
        };
        if ticks_to_run == 0 {
            break;
        }

        let result = sim.run(ticks_to_run, |now, system| {
            if !cli.quiet {
                println!("{}", system.snapshot());
                println!("------------- Time = {now} ----------------------");
            }
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        });

        if let Err(err) = result {
            println!("Statistics after {} time steps", sim.now());
            println!("{}", sim.system().statistics());
            return Err(err).context("simulation stopped");
        }

        let stats = sim.system().statistics();
        info!(
            "Batch done at tick {}: {} exited, {} in system, {} queued",
            sim.now(),
            stats.exited,
            stats.in_system,
            stats.queue_len
        );
        println!("{stats}");
        println!();

        if cli.interactive {
            print!("Continue (y/n)? ");
            io::stdout().flush()?;
            let mut answer = String::new();
            // End of input counts as "n"
            if stdin.lock().read_line(&mut answer)? == 0 || answer.trim() == "n" {
                println!();
                break;
            }
        }
    }

    log_summary(&sim);
    Ok(())
}

fn log_summary(sim: &Simulation) {
    let system = sim.system();
    info!("=== SIMULATION COMPLETE ===");
    info!("Time steps: {}", sim.now());
    info!("Vehicles generated: {}", system.generated());
    info!("Vehicles entered: {}", system.entered());
    info!("Vehicles exited: {}", system.statistics().exited);
    info!("Vehicles in system: {}", system.number_in_system());
    info!("Vehicles queued: {}", system.queue_len());
}
