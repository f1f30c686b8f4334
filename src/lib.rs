//! Birdwatch - bird feeder camera for the Raspberry Pi.
//!
//! Polls a camera-attached vision accelerator for classification results,
//! ignores known false positives, and for each qualifying detection appends
//! a line to an observation log and saves a still image.

#![warn(missing_docs)]

pub mod button;
pub mod camera;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod feedback;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod shutdown;

use button::SysfsButton;
use camera::CommandCamera;
use cli::{Cli, Command, ConfigAction, WatchArgs};
use config::{Config, config_file_path, load_config_file, save_config, validate_config};
use inference::{CommandInference, ReplayInference};
use output::{LocalClock, ObservationLog};
use pipeline::{DetectionSettings, ManualSettings, run_detection, run_manual};
use shutdown::Shutdown;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the birdwatch CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose, cli.quiet);

    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path()?,
    };

    match cli.command {
        Some(Command::Config { action }) => handle_config_command(action, &config_path),
        Some(Command::Snap) => {
            let config = load_config(&config_path)?;
            let shutdown = install_shutdown_handler();
            snap(&config, &shutdown)
        }
        None => {
            let mut config = load_config_file(&config_path)?;
            apply_overrides(&mut config, &cli.watch);
            validate_config(&config)?;
            let shutdown = install_shutdown_handler();
            watch(&config, &cli.watch, &shutdown)
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let config = load_config_file(path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Command line flags take precedence over the configuration file.
fn apply_overrides(config: &mut Config, args: &WatchArgs) {
    if let Some(threshold) = args.threshold {
        config.detection.threshold = threshold;
    }
    if let Some(top_k) = args.top_k {
        config.detection.top_k = top_k;
    }
    if let Some(model) = args.model {
        config.detection.model = model;
    }
    if let Some(debounce) = args.debounce {
        config.detection.debounce_secs = debounce;
    }
    if args.no_roi_sample {
        config.camera.roi_sample = false;
    }
}

/// Install a SIGINT/SIGTERM handler that requests an orderly shutdown.
///
/// Repeated signals are ignored so peripherals are always released by the
/// main thread; hooks on the flag unblock a stalled inference read.
fn install_shutdown_handler() -> Shutdown {
    let shutdown = Shutdown::new();
    let handle = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        if handle.trigger() {
            info!("Shutting down");
        } else {
            warn!("Already shutting down, releasing peripherals");
        }
    }) {
        warn!("Failed to install signal handler: {e}");
    }

    shutdown
}

/// Run the detection loop with the configured camera and inference program.
fn watch(config: &Config, args: &WatchArgs, shutdown: &Shutdown) -> Result<()> {
    let settings = DetectionSettings::from_config(config);
    let log = ObservationLog::new(&config.output.log_file);
    let detection = &config.detection;

    info!(
        "Watching with {} model: threshold={:.2}, top_k={}, debounce={}s, {} boring label(s)",
        detection.model,
        detection.threshold,
        detection.top_k,
        detection.debounce_secs,
        settings.boring.len()
    );

    let camera = CommandCamera::new(config.camera.clone());
    let feedback = feedback::from_config(&config.feedback);

    let summary = if let Some(replay) = &args.replay {
        run_detection(
            &settings,
            camera,
            feedback,
            &log,
            || ReplayInference::open(replay),
            shutdown,
            &LocalClock,
        )?
    } else {
        run_detection(
            &settings,
            camera,
            feedback,
            &log,
            || {
                let inference =
                    CommandInference::start(&config.inference, detection.model, args.sparse)?;
                if let Some(handle) = inference.kill_handle() {
                    shutdown.on_trigger(move || handle.kill());
                }
                Ok(inference)
            },
            shutdown,
            &LocalClock,
        )?
    };

    info!(
        "Stopped{}: {} result(s), {} detection(s), {} boring skipped",
        if summary.interrupted { " on signal" } else { "" },
        summary.results,
        summary.detections,
        summary.skipped_boring
    );

    Ok(())
}

/// Run button-triggered manual capture.
fn snap(config: &Config, shutdown: &Shutdown) -> Result<()> {
    let settings = ManualSettings {
        image_dir: config.output.image_dir.clone(),
        poll_interval: Duration::from_millis(config.button.poll_interval_ms),
    };
    let mut button = SysfsButton::new(&config.button);
    let camera = CommandCamera::new(config.camera.clone());
    let feedback = feedback::from_config(&config.feedback);

    let captured = run_manual(&settings, &mut button, camera, feedback, shutdown, &LocalClock)?;
    info!("Stopped: {captured} picture(s) taken");
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Init => {
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                save_config(&Config::default(), path)?;
                println!("Created configuration file: {}", path.display());
                println!("\nEdit [camera], [inference] and [detection] to match your kit.");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config_file(path)?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{rendered}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
