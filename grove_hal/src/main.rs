//! # Grove HAL Binary
//!
//! Runs the drivers listed in `grove.toml` on the simulation adaptor and
//! logs every event they publish.
//!
//! # Usage
//!
//! ```bash
//! # Run with the default config path
//! grove_hal
//!
//! # Run a specific config for ten seconds with verbose logging
//! grove_hal --config config/grove.toml --duration 10 -v
//!
//! # JSON logs
//! grove_hal -c config/grove.toml --json
//! ```

use clap::Parser;
use grove_common::hal::consts::DEFAULT_CONFIG_PATH;
use grove_hal::core::GroveCore;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Grove HAL - Grove sensor drivers with background polling
#[derive(Parser, Debug)]
#[command(name = "grove_hal")]
#[command(version)]
#[command(about = "Grove sensor and actuator drivers with background polling")]
#[command(long_about = None)]
struct Args {
    /// Path to the configuration file (grove.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    /// Stop after this many seconds (runs until Ctrl-C when omitted)
    #[arg(short, long, value_name = "SECONDS")]
    duration: Option<u64>,
}

fn main() {
    if let Err(e) = run() {
        error!("Grove HAL failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config errors are reported once tracing is up
    let loaded = GroveCore::load_config(&args.config);
    let config_level = loaded
        .as_ref()
        .map(|c| Level::from(c.shared.log_level))
        .unwrap_or(Level::INFO);
    setup_tracing(&args, config_level);

    info!("Grove HAL v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded?;
    let mut core = GroveCore::new(config)?;

    let running = core.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    core.init()?;
    if let Err(e) = core.run(args.duration.map(Duration::from_secs)) {
        error!("Event loop error: {}", e);
    }
    core.shutdown()?;

    info!("Grove HAL shutdown complete");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
///
/// `-v` raises the level to at least DEBUG.
fn setup_tracing(args: &Args, config_level: Level) {
    let level = if args.verbose {
        config_level.max(Level::DEBUG)
    } else {
        config_level
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
