mod cli;
mod commands;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use inboxwatch_core::config::AppConfig;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // One run drives one mailbox sequentially; no worker pool needed
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();
    let log_file = init_tracing(cli.log_dir.as_deref())?;
    if let Some(path) = log_file {
        info!(path = %path.display(), "writing debug log");
    }

    let config_str = std::fs::read_to_string(&cli.config).unwrap_or_else(|_| {
        warn!(path = %cli.config, "config file not found, using defaults");
        include_str!("../config/default.toml").to_string()
    });
    let mut config = AppConfig::from_toml(&config_str)?;

    // Environment variable overrides
    if let Ok(v) = std::env::var("POLL_DEADLINE_SECONDS") {
        if let Ok(n) = v.parse::<u64>() {
            config.activation.deadline_seconds = n;
        }
    }
    if let Ok(v) = std::env::var("POLL_INTERVAL_SECONDS") {
        if let Some(n) = v.parse::<u64>().ok().filter(|&n| n > 0) {
            config.activation.poll_interval_seconds = n;
        }
    }
    if let Ok(v) = std::env::var("RESULT_LOG") {
        if !v.trim().is_empty() {
            config.general.result_log = v;
        }
    }
    if let Ok(v) = std::env::var("HTTP_PROXY_URL") {
        config.http.proxy = Some(v).filter(|p| !p.trim().is_empty());
    }

    match cli.command {
        Commands::Create => {
            commands::create::run(config).await?;
        }
        Commands::Watch {
            deadline,
            interval,
            no_save,
        } => {
            commands::watch::run(config, deadline, interval, no_save).await?;
        }
        Commands::Extract { file, prefix } => {
            commands::extract::run(config, file, prefix).await?;
        }
        Commands::Results => {
            commands::results::run(config).await?;
        }
    }

    Ok(())
}

/// Console output follows `RUST_LOG` (default `info`). With a log directory,
/// every run also gets its own file capturing DEBUG and above.
fn init_tracing(log_dir: Option<&str>) -> Result<Option<PathBuf>> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let (file_layer, path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {dir}"))?;
            let path = log_file_path(Path::new(dir), Local::now());
            let file = std::fs::File::create(&path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();
    Ok(path)
}

fn log_file_path(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("inboxwatch_{}.log", now.format("%Y%m%d_%H%M%S")))
}
