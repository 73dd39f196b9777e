//! CLI entry point for the static liDARPT planning pipeline
//! (`SPEC_FULL.md` §15): reads the three input files named in `spec.md`
//! §6, runs `StaticContext`, and writes the output reports, in the same
//! read-deserialize-run-report shape as the teacher's `internal/src/
//! main.rs`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use model::json_serialisation::{load_config, load_network, load_requests};
use model::Telemetry;
use runner::{ContextDriver, PlanningError, StaticContext};

#[derive(Parser, Debug)]
#[command(name = "lidarpt-runner", about = "liDARPT static planning pipeline")]
struct Cli {
    /// Path to the config JSON file (`spec.md` §6).
    #[arg(long)]
    config: PathBuf,

    /// Path to the network JSON file (stops, lines, buses).
    #[arg(long)]
    network: PathBuf,

    /// Path to the requests CSV file.
    #[arg(long)]
    requests: PathBuf,

    /// Directory the output reports are written into.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lidarpt-runner: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PlanningError> {
    let mut telemetry = Telemetry::new();

    let start = Instant::now();
    let config = load_config(&cli.config)?;
    let network = load_network(&cli.network, config.capacity_per_line)?;
    let requests = load_requests(&cli.requests)?;
    telemetry.time_reading = Some(start.elapsed());
    println!(
        "loaded {} stops, {} lines, {} buses, {} requests, elapsed {:.2}s",
        network.stops().count(),
        network.lines().count(),
        network.buses().count(),
        requests.len(),
        telemetry.time_reading.unwrap().as_secs_f64()
    );

    let mut context = StaticContext { requests };
    let (pool, plan, ledger) = context.run(&network, &config, &mut telemetry)?;

    let report = executor::ExecutionReport::new(&plan, ledger);
    executor::write_reports(&cli.out, &report, &pool, &config, &telemetry).map_err(model::ModelError::from)?;

    let accepted = pool.requests().filter(|r| r.is_accepted()).count();
    println!("done: {}/{} requests accepted, reports written to {}", accepted, pool.len(), cli.out.display());

    Ok(())
}
