//! Reward definitions and the catalog that maps activities to them.

use crate::config::ConfigSource;
use crate::types::{normalize_target, ActivityKey, ActivityKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

fn default_chance() -> f64 {
    1.0
}

/// What a player receives for one occurrence of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RewardDefinition {
    /// Probability between 0.0 and 1.0 that the reward is granted
    #[serde(default = "default_chance")]
    pub chance: f64,
    /// Currency deposited through the economy provider
    #[serde(default)]
    pub currency: f64,
    /// Console commands dispatched on grant
    #[serde(default)]
    pub commands: Vec<String>,
    /// Message sent to the player on grant
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for RewardDefinition {
    fn default() -> Self {
        Self {
            chance: default_chance(),
            currency: 0.0,
            commands: Vec::new(),
            message: None,
        }
    }
}

/// Lookup from activity to reward definition.
pub trait RewardCatalog: Send + Sync {
    fn lookup(&self, key: &ActivityKey) -> Option<&RewardDefinition>;

    /// Number of rewardable targets of `kind`.
    fn count(&self, kind: ActivityKind) -> usize;
}

/// Catalog read from the plugin configuration.
///
/// Each [`ActivityKind`] reads the table at its section path (for example
/// `block.break`), where every key is a target name and every value a
/// [`RewardDefinition`].
#[derive(Debug, Clone, Default)]
pub struct ConfigRewardCatalog {
    rewards: HashMap<ActivityKind, HashMap<String, RewardDefinition>>,
}

impl ConfigRewardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every activity section from `source`.
    ///
    /// Entries that do not deserialize are skipped with a warning.
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let mut catalog = Self::new();
        for kind in ActivityKind::ALL {
            let Some(section) = source.section(kind.section_path()) else {
                continue;
            };
            for (target, value) in section {
                match RewardDefinition::deserialize(value) {
                    Ok(definition) => catalog.insert(kind, &target, definition),
                    Err(e) => warn!(
                        "⚠️ Skipping invalid reward {}.{}: {}",
                        kind.section_path(),
                        target,
                        e
                    ),
                }
            }
        }
        catalog
    }

    /// Adds or replaces the reward for `target`. Chance is clamped to `[0, 1]`
    /// and a negative or non-finite currency amount is treated as zero.
    pub fn insert(&mut self, kind: ActivityKind, target: &str, mut definition: RewardDefinition) {
        definition.chance = if definition.chance.is_nan() {
            0.0
        } else {
            definition.chance.clamp(0.0, 1.0)
        };
        if !definition.currency.is_finite() || definition.currency < 0.0 {
            definition.currency = 0.0;
        }
        self.rewards
            .entry(kind)
            .or_default()
            .insert(normalize_target(target), definition);
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.values().all(HashMap::is_empty)
    }
}

impl RewardCatalog for ConfigRewardCatalog {
    fn lookup(&self, key: &ActivityKey) -> Option<&RewardDefinition> {
        self.rewards.get(&key.kind)?.get(&key.target)
    }

    fn count(&self, kind: ActivityKind) -> usize {
        self.rewards.get(&kind).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TomlConfig, DEFAULT_CONFIG};

    #[test]
    fn test_loads_default_catalog() {
        let config = TomlConfig::from_str(DEFAULT_CONFIG).unwrap();
        let catalog = ConfigRewardCatalog::from_source(&config);

        assert_eq!(catalog.count(ActivityKind::BlockBreak), 2);
        assert_eq!(catalog.count(ActivityKind::BlockPlace), 1);
        assert_eq!(catalog.count(ActivityKind::EntityKill), 1);
        assert_eq!(catalog.count(ActivityKind::EntityBreed), 1);
        assert_eq!(catalog.count(ActivityKind::ItemFish), 1);

        let zombie = catalog
            .lookup(&ActivityKey::new(ActivityKind::EntityKill, "zombie"))
            .unwrap();
        assert_eq!(zombie.chance, 1.0);
        assert_eq!(zombie.currency, 1.0);
        assert_eq!(zombie.commands, vec!["xp add {player} 5".to_string()]);
    }

    #[test]
    fn test_lookup_is_per_kind() {
        let config = TomlConfig::from_str(DEFAULT_CONFIG).unwrap();
        let catalog = ConfigRewardCatalog::from_source(&config);

        assert!(catalog
            .lookup(&ActivityKey::new(ActivityKind::BlockBreak, "STONE"))
            .is_some());
        assert!(catalog
            .lookup(&ActivityKey::new(ActivityKind::BlockPlace, "STONE"))
            .is_none());
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let config = TomlConfig::from_str(
            r#"
[block.break.STONE]
currency = 1.0

[block.break.DIRT]
currency = "lots"

[block.break]
GRAVEL = 3
"#,
        )
        .unwrap();
        let catalog = ConfigRewardCatalog::from_source(&config);

        assert_eq!(catalog.count(ActivityKind::BlockBreak), 1);
        assert!(catalog
            .lookup(&ActivityKey::new(ActivityKind::BlockBreak, "STONE"))
            .is_some());
    }

    #[test]
    fn test_values_are_sanitized() {
        let mut catalog = ConfigRewardCatalog::new();
        catalog.insert(
            ActivityKind::ItemFish,
            "salmon",
            RewardDefinition {
                chance: 4.0,
                currency: -2.0,
                ..Default::default()
            },
        );

        let salmon = catalog
            .lookup(&ActivityKey::new(ActivityKind::ItemFish, "SALMON"))
            .unwrap();
        assert_eq!(salmon.chance, 1.0);
        assert_eq!(salmon.currency, 0.0);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = ConfigRewardCatalog::from_source(&TomlConfig::default());
        assert!(catalog.is_empty());
        for kind in ActivityKind::ALL {
            assert_eq!(catalog.count(kind), 0);
        }
    }
}
