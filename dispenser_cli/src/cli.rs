//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config file used when `--config` is not given; skipped if absent.
pub const DEFAULT_CONFIG: &str = "etc/dispenser.toml";

#[derive(Parser, Debug)]
#[command(name = "dispenser", version, about = "Periodic container-gated fluid dispenser")]
pub struct Cli {
    /// Path to config TOML. Defaults to etc/dispenser.toml when present,
    /// otherwise built-in defaults.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log and report as JSON instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG wins if set
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the dispensing loop until Ctrl-C or the tick limit
    Run {
        /// Stop after this many controller ticks
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Simulated sensor readings in cm, replayed in order (last one repeats).
        /// Ignored with real hardware.
        #[arg(long = "sim-distance", value_name = "CM", num_args = 1..)]
        sim_distance: Vec<u16>,
    },
    /// Take one reading from every peripheral and report
    SelfCheck,
}
