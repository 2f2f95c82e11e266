//! # Simulator
//!
//! Generates the raw fragments of a synthetic LED calibration run:
//! * Reads the description of the run from a JSON file (channels, fragmentation, baseline, noise and pulse shape).
//! * Generates the requested number of acquisition windows in parallel.
//! * Writes each window as one line of JSON, in the format read by the `led-calibration` component.
//!
mod simulation;
mod simulation_elements;

use chrono::Utc;
use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use nveto_common::Time;
use simulation::Simulation;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = nveto_common::version!(), about)]
struct Cli {
    /// Path to the JSON file describing the simulated run
    #[clap(long)]
    file: PathBuf,

    /// File to write the fragments to. If not given, fragments are written to stdout
    #[clap(long)]
    output: Option<PathBuf>,

    /// Number of acquisition windows to generate
    #[clap(long, default_value = "1")]
    num_windows: usize,

    /// Start time of the first window, in ns since the unix epoch. If not given, the current time is used
    #[clap(long)]
    start_time: Option<Time>,

    /// Seed of the random number generator. If not given, one is taken from the clock
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> miette::Result<()> {
    nveto_common::init_tracing("info");
    let args = Cli::parse();

    let file = File::open(&args.file)
        .into_diagnostic()
        .wrap_err(format!("Cannot open {}", args.file.display()))?;
    let simulation: Simulation = serde_json::from_reader(BufReader::new(file))
        .into_diagnostic()
        .wrap_err("Malformed simulation file")?;

    let now = Utc::now();
    // `timestamp_nanos_opt` returns `None` when the year is >2262.
    let start_time = args
        .start_time
        .or(now.timestamp_nanos_opt())
        .unwrap_or_default();
    let seed = args
        .seed
        .unwrap_or(now.timestamp_subsec_nanos() as u64);
    info!("Generating {} windows with seed {seed}", args.num_windows);

    let windows = simulation
        .generate_windows(args.num_windows, start_time, seed)
        .into_diagnostic()?;

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).into_diagnostic()?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(output);
    for fragments in &windows {
        serde_json::to_writer(&mut writer, fragments).into_diagnostic()?;
        writeln!(writer).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;
    info!("Wrote {} windows", windows.len());
    Ok(())
}
