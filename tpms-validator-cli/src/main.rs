//! TPMS Decoder Validator CLI
//!
//! Command-line front end for the tpms-validator library. It adds:
//! - Argument parsing and default source resolution
//! - Parallel validation of sources
//! - Text and JSON reports
//! - A process exit status reflecting the failure count

use anyhow::Result;
use clap::Parser;
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tpms_validator::{Tally, Validator};

mod config;
mod report;

use config::{OutputFormat, RunConfig};

/// TPMS Decoder Validator - check decoded sensor records against protocol formulas
#[derive(Parser, Debug)]
#[command(name = "tpms-validator")]
#[command(about = "Validate decoded TPMS records against protocol formulas", long_about = None)]
#[command(version)]
pub(crate) struct Args {
    /// User capture JSON-lines file (can be repeated)
    #[arg(long, value_name = "FILE")]
    capture: Vec<PathBuf>,

    /// Reference-decoder output directory or file (can be repeated)
    #[arg(long, value_name = "PATH")]
    reference: Vec<PathBuf>,

    /// Directory holding the default sources when none are given
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Additional model to skip (can be repeated)
    #[arg(long, value_name = "MODEL")]
    exclude_model: Vec<String>,

    /// Round-trip tolerance in physical units
    #[arg(long, value_name = "F")]
    tolerance: Option<f64>,

    /// Skip the built-in checksum and formula vectors
    #[arg(long)]
    no_self_test: bool,

    /// Print a JSON summary instead of the text report
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("TPMS Validator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using validator library v{}", tpms_validator::VERSION);

    let run = RunConfig::from_args(&args)?;
    let tally = validate(&run);

    let generated = chrono::Local::now();
    let mut stdout = io::stdout().lock();
    match run.output {
        OutputFormat::Text => report::write_text(&mut stdout, &tally, &run.sources, generated)?,
        OutputFormat::Json => {
            let summary = report::Summary::new(&tally, &run.sources, generated);
            report::write_json(&mut stdout, &summary)?
        }
    }

    Ok(if tally.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Self-test, then every source in parallel, merged in source order
fn validate(run: &RunConfig) -> Tally {
    let validator = Validator::with_config(run.validator.clone());

    let mut tally = if validator.config().run_self_test {
        validator.self_test()
    } else {
        Tally::new()
    };

    let per_source: Vec<Tally> = run
        .sources
        .par_iter()
        .map(|source| validator.validate_source(source))
        .collect();

    for source_tally in per_source {
        tally.merge(source_tally);
    }

    log::info!(
        "Validation finished: {} passed, {} failed, {} skipped",
        tally.passed(),
        tally.failed(),
        tally.skipped()
    );
    tally
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
