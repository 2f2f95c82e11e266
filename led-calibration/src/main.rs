//! # LED Calibration
//!
//! The LED Calibration component performs the following functions:
//! * Reads batches of raw digitiser fragments, one acquisition window per line of the input file.
//! * Processes the batches in parallel, computing the baseline, LED amplitude, peak time and area of each channel.
//! * Writes the calibration records of each batch, in input order, as one line of the output.
//!
use clap::{Parser, ValueEnum};
use led_calibration::{CalibrationSettings, Fragment, LedCalibrationRecord, compute};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use miette::{IntoDiagnostic, WrapErr};
use nveto_common::metrics::{
    component_info_metric,
    failures::{self, FailureKind},
    names::{BATCHES_PROCESSED, BATCHES_RECEIVED, FAILURES, RECORDS_PRODUCED},
};
use rayon::prelude::*;
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Determines what happens when a batch cannot be decoded or calibrated.
#[derive(Default, Clone, Copy, Debug, ValueEnum)]
enum ErrorPolicy {
    /// Log the failure and continue with the next batch.
    #[default]
    Skip,
    /// Stop processing and exit with an error.
    Halt,
}

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = nveto_common::version!(), about)]
struct Cli {
    /// File of fragment batches, each line containing a JSON array of the fragments of one acquisition window
    #[clap(long)]
    input: PathBuf,

    /// File to write calibration records to, one JSON array per batch. If not given, records are written to stdout
    #[clap(long)]
    output: Option<PathBuf>,

    /// JSON file of calibration settings. If given, it replaces the settings given on the command line
    #[clap(long)]
    settings: Option<PathBuf>,

    #[clap(flatten)]
    calibration: CalibrationSettings,

    /// Determines whether a malformed batch is skipped or stops the run
    #[clap(long, value_enum, default_value_t)]
    on_error: ErrorPolicy,

    /// If set, OpenMetrics flavour metrics are made available on this endpoint
    #[clap(long, env)]
    observability_address: Option<SocketAddr>,
}

fn main() -> miette::Result<()> {
    nveto_common::init_tracing("info");
    let args = Cli::parse();

    if let Some(address) = args.observability_address {
        PrometheusBuilder::new()
            .with_http_listener(address)
            .install()
            .into_diagnostic()?;
    }
    describe_counter!(
        BATCHES_RECEIVED,
        metrics::Unit::Count,
        "Number of batches received"
    );
    describe_counter!(
        BATCHES_PROCESSED,
        metrics::Unit::Count,
        "Number of batches processed"
    );
    describe_counter!(
        RECORDS_PRODUCED,
        metrics::Unit::Count,
        "Number of calibration records produced"
    );
    describe_counter!(
        FAILURES,
        metrics::Unit::Count,
        "Number of failures encountered"
    );
    component_info_metric("led-calibration", nveto_common::version!());

    let settings = match &args.settings {
        Some(path) => read_settings(path)?,
        None => args.calibration.clone(),
    };
    debug!("Settings: {settings:?}");

    let batches = read_batches(&args.input, args.on_error)?;
    info!("Read {} batches from {}", batches.len(), args.input.display());

    let outcomes = batches
        .par_iter()
        .map(|(line, fragments)| (*line, compute(fragments, &settings)))
        .collect::<Vec<_>>();

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).into_diagnostic()?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = BufWriter::new(output);

    let mut skipped = 0;
    for (line, outcome) in outcomes {
        match outcome {
            Ok(records) => write_records(&mut writer, &records)?,
            Err(e) => match args.on_error {
                ErrorPolicy::Skip => {
                    warn!(channel = e.channel(), "Skipping batch on line {line}: {e}");
                    skipped += 1;
                }
                ErrorPolicy::Halt => {
                    return Err(e)
                        .into_diagnostic()
                        .wrap_err(format!("Batch on line {line} failed"));
                }
            },
        }
    }
    writer.flush().into_diagnostic()?;
    info!(
        "Processed {} batches, skipped {skipped}",
        batches.len() - skipped
    );
    Ok(())
}

/// Loads calibration settings from a JSON file.
fn read_settings(path: &Path) -> miette::Result<CalibrationSettings> {
    let file = File::open(path)
        .into_diagnostic()
        .wrap_err(format!("Cannot open settings file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .into_diagnostic()
        .wrap_err("Malformed settings file")
}

/// Reads every batch from the input file, paired with its line number.
///
/// Lines which are blank are ignored. Lines which cannot be decoded are handled according to `policy`.
fn read_batches(path: &Path, policy: ErrorPolicy) -> miette::Result<Vec<(usize, Vec<Fragment>)>> {
    let file = File::open(path)
        .into_diagnostic()
        .wrap_err(format!("Cannot open input file {}", path.display()))?;

    let mut batches = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = index + 1;
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }
        counter!(BATCHES_RECEIVED).increment(1);
        match serde_json::from_str::<Vec<Fragment>>(&line) {
            Ok(fragments) => batches.push((line_number, fragments)),
            Err(e) => {
                counter!(
                    FAILURES,
                    &[failures::get_label(FailureKind::UnableToDecodeBatch)]
                )
                .increment(1);
                match policy {
                    ErrorPolicy::Skip => warn!("Failed to decode batch on line {line_number}: {e}"),
                    ErrorPolicy::Halt => {
                        return Err(e)
                            .into_diagnostic()
                            .wrap_err(format!("Failed to decode batch on line {line_number}"));
                    }
                }
            }
        }
    }
    Ok(batches)
}

/// Writes the records of one batch as a single line of JSON.
fn write_records(writer: &mut impl Write, records: &[LedCalibrationRecord]) -> miette::Result<()> {
    serde_json::to_writer(&mut *writer, records).into_diagnostic()?;
    writeln!(writer).into_diagnostic()
}
