//! mediaconv CLI
//!
//! Batch image and video format conversion from the command line.
//!
//! # Usage
//!
//! ```bash
//! mediaconv image ~/Pictures/export -f png -W 1920
//! mediaconv video clip.mov raw.h265 -f mp4 --crf 20 -o converted/
//! mediaconv list --kind image ~/Pictures/export
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use mediaconv_cli::cli::{commands, Cli, EXIT_BATCH_ERROR, EXIT_INTERRUPTED};
use mediaconv_cli::config_initialization::{initialize_configuration_hierarchy, RuntimeConfig};
use mediaconv_cli::utils::logging::init_logging;

/// Blocking work (an image encode, a pending prompt) gets this long after Ctrl-C
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Main entry point for the mediaconv CLI application
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match initialize_configuration_hierarchy(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(EXIT_BATCH_ERROR);
        }
    };
    init_logging(&config.logging);

    info!("Starting mediaconv {}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config.config_file {
        info!("Configuration file: {}", path.display());
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {}", e);
            return ExitCode::from(EXIT_BATCH_ERROR);
        }
    };

    let code = runtime.block_on(run(&cli, &config));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    ExitCode::from(code)
}

/// Race the command against Ctrl-C; dropping the command stops its transcoder
async fn run(cli: &Cli, config: &RuntimeConfig) -> u8 {
    tokio::select! {
        outcome = commands::run(cli, config) => match outcome {
            Ok(code) => code,
            Err(e) => {
                eprintln!("error: {:#}", e);
                EXIT_BATCH_ERROR
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping the current conversion");
            eprintln!("interrupted");
            EXIT_INTERRUPTED
        }
    }
}
