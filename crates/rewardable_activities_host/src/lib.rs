//! # Rewardable Activities Host
//!
//! Console host for the rewardable activities plugin. It stands in for a game
//! server: world events arrive as JSON lines, rewards are paid into an
//! in-memory ledger, and console commands and player messages are logged.
//!
//! ## Quick Start
//!
//! ```bash
//! # Read events from stdin with the default configuration
//! rewardable-activities
//!
//! # Replay a recorded event file with debug logging
//! rewardable-activities --events session.jsonl --log-level debug
//!
//! # Use a different plugin configuration and no economy
//! rewardable-activities --plugin-config rewards.toml --no-economy
//! ```
//!
//! ## Input
//!
//! One JSON object per line, tagged by `type` (`block_break`, `block_place`,
//! `piston_extend`, `entity_kill`, ...). The line `{"type":"reload"}` re-reads
//! the plugin configuration.
//!
//! ## Configuration
//!
//! The host loads its settings from a TOML file (default: `host.toml`) and the
//! plugin's settings from the file named in `[plugin] config_path`. Missing
//! files are created with defaults.
//!
//! ## Signal Handling
//!
//! The host shuts down gracefully on SIGINT (Ctrl+C) and SIGTERM (Unix).

use tracing::error;

mod app;
mod cli;
mod config;
mod context;
mod logging;
mod signals;

pub use app::{Application, HostInput, RunSummary};
pub use cli::CliArgs;
pub use config::{AppConfig, EconomySettings, LoggingSettings, MaintenanceSettings, PluginSettings};
pub use context::{ConsoleContext, LedgerEconomy};

/// Main entry point for the host.
///
/// Called from `main` inside the tokio runtime.
///
/// # Exit Codes
///
/// * **0**: Input ended or shutdown was requested
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging settings come from the config file, before the application
    // proper validates it.
    let mut config = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default();
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}
