//! Command-line interface: argument parsing and command dispatch.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use presale_trend::data::ALL_SIZES;
use presale_trend::discovery::{list_directory, resolve_source};
use presale_trend::report;
use presale_trend::stats::{forecast_all, ForecastReport};
use presale_trend::{Config, RecordSet, Session, Source};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "presale_trend", version, about = "Presale price CSV loader & linear trend forecaster")]
pub struct Cli {
    /// Config file (defaults to presale_trend.toml in the data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory searched when no file is given
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// CSV file; found in the data directory when omitted
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show encoding, column mapping, row counts and selectable values
    Inspect {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Forecast one region and size category
    Forecast {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        region: String,

        /// Size category (defaults to the all-sizes placeholder)
        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        target_year: Option<i32>,

        /// Print the report with series and trend line as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forecast every region and size category
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        target_year: Option<i32>,
    },
    /// Write the normalized table as CSV
    Export {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long)]
        out: PathBuf,
    },
}

impl Command {
    fn target_year(&self) -> Option<i32> {
        match self {
            Command::Forecast { target_year, .. } | Command::Summary { target_year, .. } => {
                *target_year
            }
            Command::Inspect { .. } | Command::Export { .. } => None,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let dir = cli.dir.clone().unwrap_or_else(|| config.data_dir());
    let mut session = Session::new();

    match cli.command {
        Command::Inspect { input } => {
            let (name, set) = load(&mut session, &input, &dir, &config)?;
            print!("{}", report::format_inspect(&name, &set));
        }
        Command::Forecast {
            input,
            region,
            size,
            json,
            ..
        } => {
            let (_, set) = load(&mut session, &input, &dir, &config)?;
            let size = size.unwrap_or_else(|| ALL_SIZES.to_string());
            forecast(&set, &region, &size, config.target_year(), config.trend_points(), json)?;
        }
        Command::Summary { input, .. } => {
            let (_, set) = load(&mut session, &input, &dir, &config)?;
            let target_year = config.target_year();
            let groups = forecast_all(&set, target_year, config.trend_points());
            print!("{}", report::format_summary(&groups, target_year));
        }
        Command::Export { input, out } => {
            let (_, set) = load(&mut session, &input, &dir, &config)?;
            let file = File::create(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            set.write_csv(BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(path = %out.display(), rows = set.len(), "exported");
            println!("Wrote {} records to {}", set.len(), out.display());
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match (&cli.config, &cli.dir) {
        (Some(path), _) => Config::load_from_file(path)?,
        (None, Some(dir)) => Config::discover(dir)?,
        (None, None) => Config::discover(Path::new("."))?,
    };
    // Command-line values win over the file and are held to the same limits
    let config = config.merge(Config {
        target_year: cli.command.target_year(),
        trend_points: None,
        default_file: None,
        data_dir: None,
    });
    config.validate()?;
    Ok(config)
}

fn load(
    session: &mut Session,
    input: &InputArgs,
    dir: &Path,
    config: &Config,
) -> Result<(String, Arc<RecordSet>)> {
    let Some(path) = resolve_source(input.file.as_deref(), dir, config.default_file()) else {
        print_directory(dir);
        bail!(
            "No CSV file found in {} (expected '{}')",
            dir.display(),
            config.default_file()
        );
    };

    let source = Source::Path(path);
    match session.load(&source) {
        Ok(set) => Ok((source.name(), set)),
        Err(e) => {
            eprintln!("Failed to load data: {e}");
            print_directory(dir);
            bail!("Failed to load {}", source.name());
        }
    }
}

fn print_directory(dir: &Path) {
    match list_directory(dir) {
        Ok(names) => {
            eprintln!("Files in {}:", dir.display());
            for name in names {
                eprintln!("  {name}");
            }
        }
        Err(e) => eprintln!("Could not list {}: {e}", dir.display()),
    }
}

fn forecast(
    set: &RecordSet,
    region: &str,
    size: &str,
    target_year: i32,
    trend_points: usize,
    json: bool,
) -> Result<()> {
    let records = set.filter(region, size);
    if records.is_empty() {
        bail!(
            "No data for region '{region}' and size '{size}'. Regions: {}. Sizes: {}",
            set.regions().join(", "),
            set.size_categories().join(", ")
        );
    }

    match ForecastReport::build(region, size, &records, target_year, trend_points) {
        Ok(forecast) if json => {
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        }
        Ok(forecast) => {
            print!("{}", report::format_history(&records));
            println!();
            print!("{}", report::format_forecast(&forecast));
        }
        Err(e) => {
            warn!(region, size, error = %e, "no trend line");
            print!("{}", report::format_history(&records));
            println!();
            println!("{}", report::format_forecast_error(&e));
        }
    }
    Ok(())
}
