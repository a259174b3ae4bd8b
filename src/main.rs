use chrono::Local;
use clap::Parser;
use log::{LevelFilter, debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};

use radiant_routes::config::{Config, ConfigError, SeasonPolicy};
use radiant_routes::pipeline;

/// Automated solar irradiance for birds in flight
#[derive(Parser, Debug)]
#[command(name = "radiant-routes", version)]
struct Cli {
    /// Path to input csv file
    #[arg(value_parser = existing_file)]
    infile: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SMARTS installation directory, overrides the config file
    #[arg(long)]
    smarts_dir: Option<PathBuf>,

    /// Label for this run's files, defaults to the input file name
    #[arg(long)]
    run_id: Option<String>,

    /// What to do with seasons other than spring and fall: lenient or strict
    #[arg(long)]
    season_policy: Option<SeasonPolicy>,

    /// Logging level: debug, info, warning, error, critical
    #[arg(short, long, default_value = "warning")]
    verbose: String,

    /// Directory for a log file named log-YYYY-MM-DD_HH:MM:SS.log
    #[arg(short, long, value_parser = existing_dir)]
    logfile: Option<PathBuf>,
}

fn existing_file(path: &str) -> Result<PathBuf, String> {
    let path = Path::new(path);
    if path.is_file() {
        std::path::absolute(path).map_err(|e| e.to_string())
    } else {
        Err(format!("{} is not a valid path to a file", path.display()))
    }
}

fn existing_dir(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("{} is not a valid directory", path.display()))
    }
}

fn level_filter(level: &str) -> Result<LevelFilter, String> {
    match level.to_ascii_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warning" | "warn" => Ok(LevelFilter::Warn),
        "error" | "critical" => Ok(LevelFilter::Error),
        other => Err(format!("unknown log level '{}'", other)),
    }
}

fn init_logging(level: LevelFilter, logdir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(dir) = logdir {
        let name = format!("log-{}.log", Local::now().format("%Y-%m-%d_%H:%M:%S"));
        let file = File::create(dir.join(name))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(level_filter(&cli.verbose)?, cli.logfile.as_deref())?;
    debug!("{:?}", cli);

    let mut config = match (&cli.config, &cli.smarts_dir) {
        (Some(path), _) => Config::from_file(path)?,
        (None, Some(dir)) => Config::new(dir),
        (None, None) => return Err(ConfigError::SmartsDir.into()),
    };
    if let Some(dir) = cli.smarts_dir {
        config = config.with_smarts_dir(dir);
    }
    if let Some(policy) = cli.season_policy {
        config = config.with_season_policy(policy);
    }

    let run_id = match cli.run_id {
        Some(id) => id,
        None => cli
            .infile
            .file_stem()
            .map(|stem| stem.to_string_lossy().replace(char::is_whitespace, "_"))
            .ok_or("cannot derive a run id from the input file name")?,
    };

    let summary = pipeline::run(&config, &cli.infile, &run_id)?;

    info!(
        "run {} finished: {} rows, {} documents, {} irradiance values",
        run_id,
        summary.results.len(),
        summary.documents_written,
        summary.successes()
    );
    println!(
        "{} of {} rows produced an irradiance value, results in {}",
        summary.successes(),
        summary.results.len(),
        summary.results_file.display()
    );

    Ok(())
}
