//! CLI argument definitions.

use crate::cli::validators::{parse_threshold, parse_top_k};
use crate::config::ModelKind;
use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Ids of detection options that also read `BIRDWATCH_*` variables.
const WATCH_ENV_ARGS: [&str; 3] = ["threshold", "top_k", "model"];

/// Takes a picture whenever the vision kit spots a bird at the feeder.
#[derive(Debug, Parser)]
#[command(name = "birdwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: watch for detections).
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Detection options.
    #[command(flatten)]
    pub watch: WatchArgs,

    /// Configuration file (default: platform config directory).
    #[arg(long, global = true, env = "BIRDWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse the process arguments, exiting with usage on error.
    pub fn parse_args() -> Self {
        Self::try_parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `args`. Detection environment variables are only consulted
    /// when no subcommand is given, so a stale `BIRDWATCH_THRESHOLD` does
    /// not break `snap` or `config`.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        let without_env = WATCH_ENV_ARGS
            .iter()
            .fold(Self::command(), |cmd, id| cmd.mut_arg(*id, |arg| arg.env(None::<&str>)));
        if let Ok(matches) = without_env.try_get_matches_from(args.clone())
            && let Ok(cli) = Self::from_arg_matches(&matches)
            && cli.command.is_some()
        {
            return Ok(cli);
        }

        Self::try_parse_from(args)
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Take a picture each time the button is pressed.
    Snap,
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the detection loop.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Classification probability threshold (0.0-1.0, exclusive of 0).
    #[arg(short, long, value_parser = parse_threshold, env = "BIRDWATCH_THRESHOLD")]
    pub threshold: Option<f32>,

    /// Max number of returned classes per frame.
    #[arg(
        short = 'n',
        long = "top_k",
        visible_alias = "top-k",
        value_parser = parse_top_k,
        env = "BIRDWATCH_TOP_K"
    )]
    pub top_k: Option<usize>,

    /// Model to run.
    #[arg(short, long, value_enum, env = "BIRDWATCH_MODEL")]
    pub model: Option<ModelKind>,

    /// Ask the inference program for sparse output.
    #[arg(short, long)]
    pub sparse: bool,

    /// Seconds to pause after each capture.
    #[arg(long, value_name = "SECS")]
    pub debounce: Option<u64>,

    /// Read classification results from a JSON-lines file instead of the camera.
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Skip the region-of-interest sample at startup.
    #[arg(long)]
    pub no_roi_sample: bool,
}
