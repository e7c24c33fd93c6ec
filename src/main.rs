//! Command-line entry point for the reorder forecaster
//!
//! Reads an extractor snapshot (and optionally a stock snapshot and a TOML
//! configuration file), runs the forecast pipeline, and prints the order
//! plan and monthly budget.

use chrono::NaiveDate;
use invoice_data::{SnapshotLoader, StockSnapshot};
use reorder_forecast::{ForecastConfig, ForecastPlanner};
use std::process::ExitCode;
use tracing::info;

const USAGE: &str = "\
Usage: restock [OPTIONS] <SNAPSHOT>

Arguments:
  <SNAPSHOT>          Extractor snapshot (JSON array of invoice documents)

Options:
  --csv               Treat the snapshot as a flat CSV export instead
  --stock <PATH>      Current-stock snapshot (JSON)
  --config <PATH>     Forecast configuration (TOML); defaults apply otherwise
  --today <DATE>      Reference date as YYYY-MM-DD (default: today)
  --json              Print the machine-readable report instead of text
  -h, --help          Show this help
";

struct CliArgs {
    snapshot: String,
    csv: bool,
    stock: Option<String>,
    config: Option<String>,
    today: Option<NaiveDate>,
    json: bool,
}

/// Parse command-line arguments; `Ok(None)` means help was requested.
fn parse_args() -> Result<Option<CliArgs>, String> {
    let mut snapshot = None;
    let mut csv = false;
    let mut stock = None;
    let mut config = None;
    let mut today = None;
    let mut json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--csv" => csv = true,
            "--json" => json = true,
            "--stock" => {
                stock = Some(args.next().ok_or("--stock requires a path")?);
            }
            "--config" => {
                config = Some(args.next().ok_or("--config requires a path")?);
            }
            "--today" => {
                let raw = args.next().ok_or("--today requires a date")?;
                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|e| format!("invalid --today '{}': {}", raw, e))?;
                today = Some(date);
            }
            "-h" | "--help" => return Ok(None),
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{}'", other));
            }
            other => {
                if snapshot.replace(other.to_string()).is_some() {
                    return Err("only one snapshot path is accepted".to_string());
                }
            }
        }
    }

    Ok(Some(CliArgs {
        snapshot: snapshot.ok_or("missing snapshot path")?,
        csv,
        stock,
        config,
        today,
        json,
    }))
}

fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => ForecastConfig::from_toml_file(path)?,
        None => ForecastConfig::default(),
    };
    let planner = ForecastPlanner::new(config)?;

    let (records, ingest_dropped) = if args.csv {
        SnapshotLoader::from_csv(&args.snapshot)?
    } else {
        let docs = SnapshotLoader::from_json(&args.snapshot)?;
        SnapshotLoader::flatten(&docs)
    };
    info!(
        records = records.len(),
        dropped = ingest_dropped.total(),
        snapshot = %args.snapshot,
        "Loaded purchase snapshot"
    );

    let stock = match &args.stock {
        Some(path) => Some(StockSnapshot::from_json(path)?),
        None => None,
    };

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut report = planner.plan(records, stock.as_ref(), today)?;
    report.dropped.merge(&ingest_dropped);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!();
            eprint!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
