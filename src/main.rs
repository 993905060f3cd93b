mod catalog;
mod config;
mod display;
mod frame;
mod geo;
mod geofence;
mod propagate;
mod publish;
mod scheduler;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::catalog::{Catalog, CatalogError};
use crate::config::{Config, ConfigError};
use crate::geofence::Geofence;
use crate::propagate::Sgp4Propagator;
use crate::publish::MapPublisher;
use crate::scheduler::Scheduler;

type Tracker = Scheduler<Sgp4Propagator, MapPublisher>;

#[derive(Parser)]
#[command(name = "sat-geofence")]
#[command(about = "Live satellite positions classified against a geofence")]
struct Cli {
    /// YAML config file; built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a fresh map every refresh interval (default)
    Run {
        /// Do not open the map in a viewer
        #[arg(long)]
        no_display: bool,
    },
    /// Publish a single frame and exit
    Once,
    /// Validate the config and satellite catalog
    Validate,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Commands::Run { no_display: false }) {
        Commands::Run { no_display } => run(config, no_display).await,
        Commands::Once => once(&config),
        Commands::Validate => validate(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

fn build_tracker(config: &Config) -> Result<Tracker, StartupError> {
    let catalog = Arc::new(Catalog::load(config.catalog.tle_file.as_deref())?);
    let geofence = Geofence::new(config.region.clone(), config.advisories.clone());
    let publisher = MapPublisher::new(
        config.map_settings()?,
        config.output.path.clone(),
        config.output.snapshot_path.clone(),
    );

    Ok(Scheduler::new(
        catalog,
        Sgp4Propagator,
        geofence,
        publisher,
        config.refresh.clone(),
    ))
}

async fn run(config: Config, no_display: bool) -> ExitCode {
    let tracker = match build_tracker(&config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Tracking geofence '{}' -> {}",
        config.region.name,
        config.output.path.display()
    );

    let token = CancellationToken::new();
    let mut handle = tracker.spawn(token.clone());

    if config.display.enabled && !no_display {
        let published = handle.subscribe();
        let program = config.display.command.clone();
        tokio::spawn(async move {
            if let Some(location) = scheduler::first_publish(published).await {
                if let Err(e) = display::open_artifact(&location, program.as_deref()) {
                    log::warn!("Could not open map viewer: {}", e);
                }
            }
        });
    }

    let finished = tokio::select! {
        result = handle.finished() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    let result = match finished {
        Some(result) => result,
        None => {
            log::info!("Interrupt received, stopping");
            handle.stop().await
        }
    };

    let status = handle.status();
    println!(
        "Tracker {} after {} ticks ({} frames published)",
        status.state, status.ticks, status.frames_published
    );
    if let (Some(at), Some(artifact)) = (status.last_captured_at, &status.last_artifact) {
        println!(
            "Last frame {} -> {}",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            artifact.display()
        );
    }
    if let Some(err) = &status.last_error {
        eprintln!("Last tick error: {}", err);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Tracker stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn once(config: &Config) -> ExitCode {
    let tracker = match build_tracker(config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match tracker.tick(Utc::now()) {
        Ok((frame, location)) => {
            println!(
                "LIVE UPDATE | {} | {} in region",
                frame.captured_at().format("%Y-%m-%d %H:%M:%S UTC"),
                frame.in_region_count()
            );
            for observation in frame.observations() {
                println!("{}", observation.report_line());
            }
            println!("Map updated: {}", location);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Update failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(config: &Config) -> ExitCode {
    let catalog = match Catalog::load(config.catalog.tle_file.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let region = &config.region;
    println!("Config is valid ({} satellites)", catalog.len());
    println!(
        "  region: {} lat ({}, {}) lon ({}, {})",
        region.name, region.lat_min, region.lat_max, region.lon_min, region.lon_max
    );
    println!(
        "  refresh: every {} ({})",
        humantime::format_duration(config.refresh.interval),
        config.refresh.policy
    );
    println!("  output: {}", config.output.path.display());
    for (i, record) in catalog.iter().enumerate() {
        println!("  {}: {} (NORAD {})", i + 1, record.name, record.norad_id);
    }
    ExitCode::SUCCESS
}
