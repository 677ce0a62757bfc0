//! drm-info - print DRM device capabilities and display resources

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use drm_info::{Config, Destination};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "drm-info")]
#[command(about = "Report DRM device capabilities, CRTCs, encoders, connectors and modes", long_about = None)]
struct Args {
    /// Device nodes to report (default: every /dev/dri/card*)
    devices: Vec<PathBuf>,

    /// Where to write the report
    #[arg(short, long, value_enum)]
    output: Option<Destination>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,
}

/// All DRM primary nodes, sorted
fn default_devices() -> Vec<PathBuf> {
    let mut cards: Vec<PathBuf> = std::fs::read_dir("/dev/dri")
        .map(|dir| {
            dir.filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with("card"))
                })
                .collect()
        })
        .unwrap_or_default();
    cards.sort();
    cards
}

fn init_logging(args: &Args, config: &Config) {
    let default_filter = if args.debug {
        "debug,drm_info=debug"
    } else {
        config.log_filter.as_deref().unwrap_or("warn,drm_info=info")
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Explicit `--config` errors are fatal; a bad default file is only reported
fn load_config(args: &Args) -> Result<(Config, Option<drm_info::Error>)> {
    match &args.config {
        Some(path) => Config::from_file(path)
            .map(|config| (config, None))
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(Config::load()),
    }
}

fn run(args: Args) -> Result<bool> {
    let (config, ignored) = load_config(&args)?;
    init_logging(&args, &config);
    if let Some(e) = ignored {
        warn!("Ignoring config: {}", e);
    }

    let devices = if args.devices.is_empty() {
        default_devices()
    } else {
        args.devices
    };
    if devices.is_empty() {
        anyhow::bail!("no DRM devices found under /dev/dri");
    }

    let destination = args.output.unwrap_or(config.output);
    debug!(?config, ?destination, count = devices.len(), "Starting report");

    let mut out = destination.writer();
    let summary = drm_info::run(&devices[..], &mut *out).context("failed to write report")?;

    info!(
        devices = summary.devices,
        failed = summary.failed.len(),
        "Report finished"
    );
    Ok(summary.success())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("drm-info: {:#}", e);
            ExitCode::from(2)
        }
    }
}
