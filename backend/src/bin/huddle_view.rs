//! Huddle snapshot viewer.
//!
//! Reads a board snapshot as JSON and prints the aggregated view as JSON.
//!
//! # Usage
//!
//! ```bash
//! # From a file
//! cargo run --bin huddle-view -- snapshot.json
//!
//! # From stdin, with an explicit config file
//! cat snapshot.json | cargo run --bin huddle-view -- - --config huddle.toml
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)
//! - `HUDDLE_TOP_WINDOWS`, `HUDDLE_RATE_LIMIT_PER_MINUTE`, `HUDDLE_MAX_TOTAL_SLOTS`:
//!   configuration overrides

use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use huddle_engine::config::EngineConfig;
use huddle_engine::services::aggregate::{aggregate, Aggregate, BoardSnapshot};

struct Args {
    input: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut input = None;
    let mut config = None;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-" => input = None,
            other if other.starts_with('-') => bail!("unknown flag {}", other),
            other => input = Some(PathBuf::from(other)),
        }
    }

    Ok(Args { input, config })
}

fn read_snapshot(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read snapshot from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging on stderr so stdout stays machine-readable
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            EngineConfig::from_file(path)?.apply_env_overrides(|key| env::var(key).ok())?
        }
        None => EngineConfig::load()?,
    };
    debug!(?config, "Configuration loaded");

    let raw = read_snapshot(args.input.as_ref())?;
    let snapshot: BoardSnapshot =
        serde_json::from_str(&raw).context("snapshot is not a valid board snapshot")?;
    if let Err(e) = snapshot.validate(&config.limits) {
        bail!("rejected {} snapshot: {}", snapshot.kind(), e);
    }
    info!(kind = %snapshot.kind(), "Aggregating snapshot");

    let view = aggregate(&snapshot, &config);
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
