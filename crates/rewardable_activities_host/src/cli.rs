//! Command-line interface handling for the rewardable activities host.
//!
//! Arguments override the matching host configuration settings.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the host configuration file
    pub config_path: PathBuf,
    /// Optional override for the plugin configuration file
    pub plugin_config: Option<PathBuf>,
    /// File of JSON-lines world events; stdin when absent
    pub events_path: Option<PathBuf>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Run without an economy provider
    pub no_economy: bool,
}

impl CliArgs {
    /// Parses the process arguments.
    pub fn parse() -> Self {
        Self::from_matches(&Self::command().get_matches())
    }

    /// The clap command definition.
    pub fn command() -> Command {
        Command::new("Rewardable Activities Host")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Feeds world events to the rewardable activities plugin")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Host configuration file path")
                    .default_value("host.toml"),
            )
            .arg(
                Arg::new("plugin-config")
                    .short('p')
                    .long("plugin-config")
                    .value_name("FILE")
                    .help("Plugin configuration file path"),
            )
            .arg(
                Arg::new("events")
                    .short('e')
                    .long("events")
                    .value_name("FILE")
                    .help("Read world events from FILE instead of stdin (one JSON object per line)"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(clap::ArgAction::SetTrue),
            )
            .arg(
                Arg::new("no-economy")
                    .long("no-economy")
                    .help("Run without an economy provider; currency rewards are skipped")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("host.toml")),
            plugin_config: matches.get_one::<String>("plugin-config").map(PathBuf::from),
            events_path: matches.get_one::<String>("events").map(PathBuf::from),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            no_economy: matches.get_flag("no-economy"),
        }
    }
}
