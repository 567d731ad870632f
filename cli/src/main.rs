//! Stage CLI - replays navigation scripts against an in-memory host.
//!
//! ```text
//! main() -> Script::load -> Runner::start (restore or launch)
//!                               |
//!                               v
//!                 Runner::apply(step) per step -> stdout
//!                               |
//!                               v
//!                    Runner::save (with a snapshot dir)
//! ```
//!
//! Logs go to stderr so stdout stays a clean transcript of the stack.

mod runner;
mod script;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use stage_config::StageConfig;
use stage_core::SnapshotStore;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::runner::Runner;
use crate::script::Script;

#[derive(Parser, Debug)]
#[command(name = "stage")]
#[command(about = "Replay a scene navigation script and print the stack after each step")]
#[command(version)]
struct Cli {
    /// Navigation script (TOML)
    script: PathBuf,

    /// Directory for stage snapshots; overrides `[persistence]` in config
    #[arg(long, value_name = "DIR")]
    snapshot_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.stage/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StageConfig::load_from(path),
        None => StageConfig::load(),
    }
    .unwrap_or_default();

    let script = Script::load(&cli.script)?;
    let store = cli
        .snapshot_dir
        .clone()
        .map(SnapshotStore::new)
        .or_else(|| SnapshotStore::from_config(&config.persistence));

    let mut runner = Runner::start(&script, &config, store.as_ref())?;

    let mut out = io::stdout().lock();
    write!(out, "{}", runner.render()?)?;
    for step in &script.steps {
        write!(out, "{}", runner.apply(step)?)?;
    }
    out.flush()?;

    if let Some(store) = &store {
        runner.save(store)?;
    }
    Ok(())
}
