//! Plugin configuration.
//!
//! Settings are read through the [`ConfigSource`] trait using dotted paths
//! (`general.reward-limiter.limit`) with a caller-supplied default, the same
//! way a server's plugin configuration API hands out values. [`TomlConfig`]
//! implements it over a TOML document; [`PluginSettings`] resolves the typed
//! settings the plugin needs, including the fallbacks to older key layouts.

use serde::{Deserialize, Serialize};
use std::path::Path;
use toml::{Table, Value};

/// Configuration file shipped with the plugin and written on first start.
pub const DEFAULT_CONFIG: &str = r#"# Rewardable Activities configuration

[general.reward-limiter]
# Cap how many rewards a player can receive within the cooldown window.
enabled = false
limit = 10
# Window length, e.g. "45s", "10m", "1h30m".
cooldown = "10m"
limit-reached-message = "&cYou have reached the reward limit. You have to wait for a while before you can receive more rewards."

[block.ownership-check]
# Track blocks placed by players.
place = true
# Do not reward breaking blocks that a player placed.
break = true

[entity.ownership-check]
# Track animals bred by players and do not reward killing them.
breed = true
# Do not reward killing mobs that came out of a spawner.
spawner = true

# Rewards. Each entry is keyed by material, entity type or item name.
#   chance   - probability between 0.0 and 1.0 (default 1.0)
#   currency - amount deposited through the economy provider (default 0)
#   commands - console commands; {player}, {player_id}, {amount}, {target}
#   message  - message sent to the player, supports & colour codes

[block.break.DIAMOND_ORE]
currency = 5.0
message = "&aYou earned &e{amount} &afor mining diamonds!"

[block.break.STONE]
chance = 0.1
currency = 0.25

[block.place.TORCH]
chance = 0.5
currency = 0.1

[entity.kill.ZOMBIE]
currency = 1.0
commands = ["xp add {player} 5"]

[entity.breed.COW]
currency = 0.5

[item.fish.COD]
currency = 0.75
message = "&bNice catch!"
"#;

/// Errors raised while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Typed access to configuration values by dotted path.
///
/// Every getter takes the default returned when the path is missing or holds a
/// value of the wrong type.
pub trait ConfigSource: Send + Sync {
    fn get_bool(&self, path: &str, default: bool) -> bool;

    fn get_int(&self, path: &str, default: i64) -> i64;

    fn get_string(&self, path: &str, default: &str) -> String;

    /// Whether any value, of any type, exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// The table at `path`, if `path` names a table.
    fn section(&self, path: &str) -> Option<Table>;
}

/// [`ConfigSource`] backed by a parsed TOML document.
#[derive(Debug, Clone, Default)]
pub struct TomlConfig {
    root: Table,
}

impl TomlConfig {
    pub fn new(root: Table) -> Self {
        Self { root }
    }

    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(content.parse::<Table>()?))
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }
}

impl ConfigSource for TomlConfig {
    fn get_bool(&self, path: &str, default: bool) -> bool {
        self.lookup(path)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    fn get_int(&self, path: &str, default: i64) -> i64 {
        self.lookup(path)
            .and_then(Value::as_integer)
            .unwrap_or(default)
    }

    fn get_string(&self, path: &str, default: &str) -> String {
        self.lookup(path)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    fn section(&self, path: &str) -> Option<Table> {
        self.lookup(path).and_then(Value::as_table).cloned()
    }
}

fn default_limit_reached_message() -> String {
    "&cYou have reached the reward limit. You have to wait for a while before you can receive more rewards.".to_string()
}

/// Reward limiter settings, as written in the configuration.
///
/// Validation happens when the settings are applied to the limiter: a bad
/// limit or cooldown disables it instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLimiterSettings {
    pub enabled: bool,
    pub limit: i64,
    pub cooldown: String,
    pub limit_reached_message: String,
}

impl Default for RewardLimiterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: 10,
            cooldown: "10m".to_string(),
            limit_reached_message: default_limit_reached_message(),
        }
    }
}

/// Which ownership checks are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipSettings {
    /// Tag blocks placed by players
    pub block_place: bool,
    /// Withhold break rewards for player-placed blocks
    pub block_break: bool,
    /// Tag offspring of player breeding and withhold kill rewards for them
    pub entity_breed: bool,
    /// Tag spawner mobs and withhold kill rewards for them
    pub entity_spawner: bool,
}

impl Default for OwnershipSettings {
    fn default() -> Self {
        Self {
            block_place: true,
            block_break: true,
            entity_breed: true,
            entity_spawner: true,
        }
    }
}

/// Every setting the plugin reads from its configuration, resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSettings {
    pub reward_limiter: RewardLimiterSettings,
    pub ownership: OwnershipSettings,
}

impl PluginSettings {
    /// Resolves the settings from `source`.
    ///
    /// Older configurations used a single `block.ownership-check` and
    /// `entity.ownership-check` boolean; those are honoured when the newer
    /// per-check keys are absent.
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let defaults = RewardLimiterSettings::default();
        let reward_limiter = RewardLimiterSettings {
            enabled: source.get_bool("general.reward-limiter.enabled", defaults.enabled),
            limit: source.get_int("general.reward-limiter.limit", defaults.limit),
            cooldown: source.get_string("general.reward-limiter.cooldown", &defaults.cooldown),
            limit_reached_message: source.get_string(
                "general.reward-limiter.limit-reached-message",
                &defaults.limit_reached_message,
            ),
        };

        let legacy_block = source.get_bool("block.ownership-check", true);
        let block_place = source.get_bool("block.ownership-check.place", true);
        let block_break = source.get_bool(
            "block.ownership-check.break",
            source.get_bool("block.ownership-check.place", legacy_block),
        );
        let entity_breed = source.get_bool(
            "entity.ownership-check.breed",
            source.get_bool("entity.ownership-check", true),
        );
        let entity_spawner = source.get_bool("entity.ownership-check.spawner", true);

        Self {
            reward_limiter,
            ownership: OwnershipSettings {
                block_place,
                block_break,
                entity_breed,
                entity_spawner,
            },
        }
    }
}
