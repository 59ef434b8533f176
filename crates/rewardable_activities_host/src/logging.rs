//! Host logging.
//!
//! Plugin decisions, console commands and player messages all go through
//! `tracing`; this module installs the subscriber that prints them.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber for the host process.
///
/// Replayed event files can be long, so JSON output is available for piping
/// the log into other tools.
///
/// # Arguments
///
/// * `config` - The `[logging]` section of the host configuration
/// * `json_format` - `--json-logs` from the command line; forces JSON output
///
/// # Returns
///
/// `Ok(())` once the subscriber is installed. Fails when a global subscriber
/// already exists, which only happens when the host is embedded in tests.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}

/// Displays the startup banner.
pub fn display_banner() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("╔══════════════════════════════════════════╗");
    info!("║        🪙 REWARDABLE ACTIVITIES 🪙        ║");
    info!("║              Host v{:<10}            ║", version);
    info!("║                                          ║");
    info!("║  🏷️  Ownership tagging                    ║");
    info!("║  ⏳ Per-player reward limiter            ║");
    info!("╚══════════════════════════════════════════╝");
}
