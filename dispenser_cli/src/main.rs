mod assembly;
mod cli;
mod commands;
mod error_fmt;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use dispenser_config::{Config, Rotation};
use dispenser_core::error::DispenserError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        tracing::error!(error = %e, "exiting with error");
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg);

    match cli.cmd {
        Commands::Run {
            ticks,
            sim_distance,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            if let Err(e) = ctrlc::set_handler(move || {
                flag.store(true, Ordering::Relaxed);
            }) {
                tracing::warn!(error = %e, "could not install Ctrl-C handler");
            }
            let report = commands::run_loop(&cfg, ticks, &sim_distance, shutdown)?;
            commands::print_report(&report, cli.json);
        }
        Commands::SelfCheck => commands::self_check(&cfg, cli.json)?,
    }
    Ok(())
}

/// Explicit paths must exist; the default path is optional.
fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    let (path, explicit) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG), false),
    };
    if !explicit && !path.exists() {
        return Ok(Config::default());
    }
    dispenser_config::load_file(path)
        .map_err(|e| eyre::Report::new(DispenserError::Config(e.to_string())))
}

fn init_tracing(json: bool, cli_level: Option<&str>, cfg: &Config) {
    let level = cli_level
        .or(cfg.logging.level.as_deref())
        .unwrap_or("info")
        .to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    // console goes to stderr; stdout carries the run summary
    let (json_layer, pretty_layer) = if json {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    let file_layer = cfg.logging.file.as_deref().map(|file| {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "dispenser.log".into(), |n| n.to_os_string());
        let appender = match cfg.logging.rotation {
            Rotation::Never => tracing_appender::rolling::never(dir, name),
            Rotation::Daily => tracing_appender::rolling::daily(dir, name),
            Rotation::Hourly => tracing_appender::rolling::hourly(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(file_layer)
        .try_init();
}
