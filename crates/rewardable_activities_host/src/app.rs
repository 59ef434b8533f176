//! Main application logic and lifecycle management.
//!
//! The `Application` loads the host and plugin configuration, enables the
//! plugin, and then runs a single task that multiplexes:
//! - world events read as JSON lines from a file or stdin
//! - the periodic limiter purge
//! - the shutdown signal
//!
//! Keeping all three on one task means plugin state is only ever touched from
//! one place, the same way a game server drives plugins from its simulation
//! thread.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    context::{ConsoleContext, LedgerEconomy},
    logging::display_banner,
    signals::wait_for_shutdown_signal,
};
use rewardable_activities::{
    DispatchStats, EconomyProvider, RewardableActivitiesPlugin, TomlConfig, WorldEvent,
    DEFAULT_CONFIG,
};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

/// One parsed line of host input.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    Event(WorldEvent),
    /// `{"type":"reload"}`: re-read the plugin configuration
    Reload,
}

impl HostInput {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, serde_json::Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(line)?;
        if value.get("type").and_then(Value::as_str) == Some("reload") {
            return Ok(Some(HostInput::Reload));
        }
        Ok(Some(HostInput::Event(serde_json::from_value(value)?)))
    }
}

/// Counters for one run of the input loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines: u64,
    pub malformed: u64,
    pub reloads: u64,
    pub purged: u64,
    pub dispatch: DispatchStats,
}

/// Main application struct.
pub struct Application {
    config: AppConfig,
    events_path: Option<PathBuf>,
    plugin_config_path: PathBuf,
    plugin: RewardableActivitiesPlugin,
    context: Arc<ConsoleContext>,
    economy: Option<Arc<LedgerEconomy>>,
    summary: RunSummary,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// 1. Load the host configuration (creating a default file if missing)
    /// 2. Apply command-line overrides and validate
    /// 3. Write the default plugin configuration if none exists
    /// 4. Enable the plugin with the console context and, unless disabled,
    ///    the in-memory economy
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(plugin_config) = &args.plugin_config {
            config.plugin.config_path = plugin_config.to_string_lossy().to_string();
        }

        if let Some(log_level) = &args.log_level {
            config.logging.level = log_level.clone();
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if args.no_economy {
            config.economy.enabled = false;
        }

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        let plugin_config_path = config.plugin_config_path();
        if !plugin_config_path.exists() {
            tokio::fs::write(&plugin_config_path, DEFAULT_CONFIG).await?;
            info!(
                "Created default plugin configuration file: {}",
                plugin_config_path.display()
            );
        }
        let plugin_config = TomlConfig::load(&plugin_config_path)?;

        let context = Arc::new(ConsoleContext::new());
        let economy = config
            .economy
            .enabled
            .then(|| Arc::new(LedgerEconomy::new(config.economy.starting_balance)));

        let mut plugin = RewardableActivitiesPlugin::new(context.clone());
        plugin.on_enable(
            &plugin_config,
            economy
                .clone()
                .map(|economy| economy as Arc<dyn EconomyProvider>),
        );

        info!(
            "📂 Config: {} | Plugin config: {}",
            args.config_path.display(),
            plugin_config_path.display()
        );

        Ok(Self {
            config,
            events_path: args.events_path,
            plugin_config_path,
            plugin,
            context,
            economy,
            summary: RunSummary::default(),
        })
    }

    pub fn plugin(&self) -> &RewardableActivitiesPlugin {
        &self.plugin
    }

    pub fn economy(&self) -> Option<&Arc<LedgerEconomy>> {
        self.economy.as_ref()
    }

    pub fn context(&self) -> &ConsoleContext {
        &self.context
    }

    /// Runs until the input ends or a shutdown signal arrives.
    pub async fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &self.events_path {
            Some(path) => {
                info!("📥 Reading world events from {}", path.display());
                Box::new(BufReader::new(tokio::fs::File::open(path).await?))
            }
            None => {
                info!("📥 Reading world events from stdin (one JSON object per line)");
                Box::new(BufReader::new(tokio::io::stdin()))
            }
        };

        let shutdown = async {
            if let Err(e) = wait_for_shutdown_signal().await {
                error!("Failed to set up shutdown signal handler: {e}");
                std::future::pending::<()>().await;
            }
        };

        info!("✅ Rewardable activities host is now running!");
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        self.process(reader, shutdown).await;
        self.shutdown();
        Ok(())
    }

    /// Feeds every line of `reader` to the plugin, purging expired limiter
    /// records on the configured interval, until the input ends or `shutdown`
    /// resolves.
    pub async fn process<R, S>(&mut self, reader: R, shutdown: S) -> RunSummary
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = reader.lines();
        let mut purge = tokio::time::interval(Duration::from_secs(
            self.config.maintenance.purge_interval_secs,
        ));
        purge.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => self.process_line(&line),
                    Ok(None) => {
                        info!("📭 End of event input");
                        break;
                    }
                    Err(e) => {
                        error!("❌ Failed to read event input: {}", e);
                        break;
                    }
                },
                _ = purge.tick() => {
                    self.summary.purged += self.plugin.maintain(Instant::now()) as u64;
                }
                _ = &mut shutdown => {
                    info!("🛑 Shutdown signal received, stopping event processing...");
                    break;
                }
            }
        }

        self.summary.dispatch = self.plugin.stats();
        self.summary
    }

    fn process_line(&mut self, line: &str) {
        self.summary.lines += 1;
        match HostInput::parse(line) {
            Ok(None) => {}
            Ok(Some(HostInput::Event(event))) => {
                let outcome = self.plugin.handle(&event, Instant::now());
                debug!("📨 {} -> {:?}", event.name(), outcome);
            }
            Ok(Some(HostInput::Reload)) => self.reload(),
            Err(e) => {
                self.summary.malformed += 1;
                warn!("⚠️ Skipping malformed input line {}: {}", self.summary.lines, e);
            }
        }
    }

    fn reload(&mut self) {
        self.summary.reloads += 1;
        info!(
            "🔄 Reloading plugin configuration from {}",
            self.plugin_config_path.display()
        );
        if let Err(e) = self.plugin.reload_from_file(&self.plugin_config_path) {
            error!("❌ Reload failed, keeping previous configuration: {}", e);
        }
    }

    /// Disables the plugin and logs final statistics.
    pub fn shutdown(&mut self) -> DispatchStats {
        let stats = self.plugin.on_disable();
        info!("📊 Final Statistics:");
        info!("  - Input lines: {} ({} malformed)", self.summary.lines, self.summary.malformed);
        info!("  - Events processed: {}", stats.events);
        info!("  - Rewards granted: {}", stats.rewarded);
        info!("  - Rewards suppressed: {}", stats.suppressed);
        info!("  - Reloads: {}", self.summary.reloads);
        info!("  - Limiter records purged: {}", self.summary.purged);
        info!(
            "  - Commands dispatched: {} | Messages sent: {}",
            self.context.commands_dispatched(),
            self.context.messages_sent()
        );
        if let Some(economy) = &self.economy {
            info!(
                "  - Currency paid: {:.2} across {} account(s)",
                economy.total(),
                economy.accounts()
            );
        }
        info!("✅ Rewardable activities host shutdown complete");
        stats
    }
}
