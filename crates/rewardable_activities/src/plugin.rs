//! # Plugin Lifecycle
//!
//! [`RewardableActivitiesPlugin`] is the object a host server loads. It owns
//! the tag and record stores for one server run and exposes the lifecycle the
//! host drives:
//!
//! 1. [`on_enable`](RewardableActivitiesPlugin::on_enable) - read the
//!    configuration, attach the optional economy provider
//! 2. [`handle`](RewardableActivitiesPlugin::handle) - one call per world event
//! 3. [`maintain`](RewardableActivitiesPlugin::maintain) - periodic limiter
//!    garbage collection, from the same task that calls `handle`
//! 4. [`reload`](RewardableActivitiesPlugin::reload) - re-read the configuration
//! 5. [`on_disable`](RewardableActivitiesPlugin::on_disable) - log a summary
//!    and drop all in-memory state
//!
//! An economy provider that starts or stops while the plugin runs is handed
//! over with [`attach_economy`](RewardableActivitiesPlugin::attach_economy) and
//! [`detach_economy`](RewardableActivitiesPlugin::detach_economy).
//!
//! ## Reload
//!
//! Reloading replaces the limiter policy, the ownership flags and the reward
//! catalog. Limiter records are cleared so every player starts a fresh window;
//! ownership tags are kept because they describe the world, not the settings.

use crate::catalog::{ConfigRewardCatalog, RewardCatalog};
use crate::config::{ConfigError, ConfigSource, PluginSettings, TomlConfig};
use crate::context::{EconomyProvider, ServerContext};
use crate::dispatcher::{ActivityDispatcher, DispatchStats, Outcome};
use crate::events::WorldEvent;
use crate::limiter::{RecordStore, RewardLimiter};
use crate::ownership::{OwnershipTagger, TagStore};
use crate::types::ActivityKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "RewardableActivities";

/// Errors surfaced by the plugin lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Plugin is not enabled")]
    NotEnabled,
}

/// Rewards players for natural activities while ignoring player-made objects
/// and, optionally, capping rewards per player.
#[derive(Debug)]
pub struct RewardableActivitiesPlugin {
    name: String,
    settings: PluginSettings,
    dispatcher: ActivityDispatcher,
    enabled: bool,
}

impl RewardableActivitiesPlugin {
    /// Creates a disabled plugin with fresh, empty stores.
    pub fn new(context: Arc<dyn ServerContext>) -> Self {
        debug!("🪙 {}: Creating new instance", PLUGIN_NAME);
        let tagger = OwnershipTagger::new(Arc::new(TagStore::new()));
        let limiter = RewardLimiter::new(Arc::new(RecordStore::new()));
        Self {
            name: PLUGIN_NAME.to_string(),
            settings: PluginSettings::default(),
            dispatcher: ActivityDispatcher::new(tagger, limiter, context),
            enabled: false,
        }
    }

    /// Seeds the chance rolls, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.dispatcher = self.dispatcher.with_seed(seed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn dispatcher(&self) -> &ActivityDispatcher {
        &self.dispatcher
    }

    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    /// Applies the configuration in `source` and starts accepting events.
    pub fn on_enable(
        &mut self,
        source: &dyn ConfigSource,
        economy: Option<Arc<dyn EconomyProvider>>,
    ) {
        match economy {
            Some(provider) => self.attach_economy(provider),
            None => warn!(
                "⚠️ {}: Could not find an economy provider, currency rewards will not be supported",
                self.name
            ),
        }
        self.apply(source);
        self.enabled = true;
        info!("🪙 {} v{}: Enabled", self.name, self.version());
    }

    /// Starts paying currency through `provider`, replacing any previous one.
    pub fn attach_economy(&mut self, provider: Arc<dyn EconomyProvider>) {
        info!("🪙 {}: Economy has been successfully set up", self.name);
        info!("🪙 {}: Economy provider: {}", self.name, provider.name());
        self.dispatcher.set_economy(Some(provider));
    }

    /// Stops paying currency and returns the provider that was attached.
    pub fn detach_economy(&mut self) -> Option<Arc<dyn EconomyProvider>> {
        let provider = self.dispatcher.economy().cloned()?;
        self.dispatcher.set_economy(None);
        info!(
            "🪙 {}: Economy provider {} was disabled, currency rewards will not be supported",
            self.name,
            provider.name()
        );
        Some(provider)
    }

    /// Re-reads every setting and the reward catalog from `source`.
    pub fn reload(&mut self, source: &dyn ConfigSource) {
        self.apply(source);
        info!("🔄 {}: Configuration reloaded", self.name);
    }

    /// Loads the configuration file at `path` and reloads from it.
    ///
    /// When the file cannot be read or parsed the previous settings stay
    /// active and the error is returned.
    pub fn reload_from_file(&mut self, path: &Path) -> Result<(), PluginError> {
        if !self.enabled {
            return Err(PluginError::NotEnabled);
        }
        let config = TomlConfig::load(path)?;
        self.reload(&config);
        Ok(())
    }

    /// Stops accepting events and drops all tags and limiter records.
    pub fn on_disable(&mut self) -> DispatchStats {
        let stats = self.dispatcher.stats();
        info!(
            "🪙 {}: Shutting down. Processed {} events, granted {} rewards, suppressed {}",
            self.name, stats.events, stats.rewarded, stats.suppressed
        );
        self.dispatcher.tagger().clear();
        self.dispatcher.limiter().clear();
        self.enabled = false;
        stats
    }

    /// Dispatches one world event. Events arriving while the plugin is
    /// disabled are ignored.
    pub fn handle(&mut self, event: &WorldEvent, now: Instant) -> Outcome {
        if !self.enabled {
            return Outcome::Ignored;
        }
        self.dispatcher.handle(event, now)
    }

    /// Drops expired limiter records and returns how many were removed.
    pub fn maintain(&self, now: Instant) -> usize {
        let purged = self.dispatcher.limiter().purge_expired(now);
        if purged > 0 {
            debug!("🧹 {}: Purged {} expired limiter record(s)", self.name, purged);
        }
        purged
    }

    fn apply(&mut self, source: &dyn ConfigSource) {
        self.settings = PluginSettings::from_source(source);
        self.dispatcher.set_ownership(self.settings.ownership);
        self.dispatcher.set_catalog(ConfigRewardCatalog::from_source(source));
        self.dispatcher.configure_limiter(&self.settings.reward_limiter);
        self.log_summary();
    }

    fn log_summary(&self) {
        let policy = self.dispatcher.limiter().policy();
        if policy.enabled {
            info!(
                "⏳ Reward limiter: {} reward(s) per {:?}",
                policy.limit, policy.window
            );
        } else {
            info!("⏳ Reward limiter: disabled");
        }

        let ownership = self.settings.ownership;
        info!(
            "🏷️ Ownership checks: place={}, break={}, breed={}, spawner={}",
            ownership.block_place,
            ownership.block_break,
            ownership.entity_breed,
            ownership.entity_spawner
        );

        let catalog = self.dispatcher.catalog();
        for kind in ActivityKind::ALL {
            info!("🎁 {} activities: {}", kind.label(), catalog.count(kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG;
    use crate::context::EconomyError;
    use crate::events::Actor;
    use crate::types::{BlockPos, EntityId, PlayerId};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Wallet {
        deposits: Mutex<Vec<f64>>,
    }

    impl EconomyProvider for Wallet {
        fn name(&self) -> &str {
            "wallet"
        }

        fn deposit(&self, _player: PlayerId, amount: f64) -> Result<(), EconomyError> {
            self.deposits.lock().unwrap().push(amount);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct SilentContext;

    impl ServerContext for SilentContext {
        fn dispatch_command(&self, _command: &str) {}

        fn send_message(&self, _player: PlayerId, _message: &str) {}
    }

    fn plugin() -> RewardableActivitiesPlugin {
        RewardableActivitiesPlugin::new(Arc::new(SilentContext)).with_seed(1)
    }

    fn mine_diamond(player: &Actor, x: i32) -> WorldEvent {
        WorldEvent::BlockBreak {
            player: player.clone(),
            block: BlockPos::new(x, 12, 0),
            material: "DIAMOND_ORE".to_string(),
        }
    }

    const LIMITED: &str = r#"
[general.reward-limiter]
enabled = true
limit = 1
cooldown = "30s"

[block.break.DIAMOND_ORE]
currency = 5.0
"#;

    #[test]
    fn test_lifecycle_metadata() {
        let plugin = plugin();
        assert_eq!(plugin.name(), "RewardableActivities");
        assert!(!plugin.version().is_empty());
        assert!(!plugin.is_enabled());
    }

    #[test]
    fn test_events_ignored_until_enabled() {
        let mut plugin = plugin();
        let player = Actor::new(PlayerId::new(), "Steve");

        assert_eq!(plugin.handle(&mine_diamond(&player, 0), Instant::now()), Outcome::Ignored);
        assert_eq!(plugin.stats().events, 0);

        plugin.on_enable(&TomlConfig::from_str(DEFAULT_CONFIG).unwrap(), None);
        assert!(plugin.handle(&mine_diamond(&player, 0), Instant::now()).is_rewarded());
    }

    #[test]
    fn test_enable_applies_settings() {
        let mut plugin = plugin();
        plugin.on_enable(&TomlConfig::from_str(LIMITED).unwrap(), None);

        let policy = plugin.dispatcher().limiter().policy();
        assert!(policy.enabled);
        assert_eq!(policy.limit, 1);
        assert_eq!(policy.window, Duration::from_secs(30));
        assert_eq!(plugin.dispatcher().catalog().count(ActivityKind::BlockBreak), 1);
    }

    #[test]
    fn test_reload_resets_limiter_but_keeps_tags() {
        let mut plugin = plugin();
        let config = TomlConfig::from_str(LIMITED).unwrap();
        plugin.on_enable(&config, None);
        let player = Actor::new(PlayerId::new(), "Steve");
        let now = Instant::now();

        assert!(plugin.handle(&mine_diamond(&player, 0), now).is_rewarded());
        assert!(!plugin.handle(&mine_diamond(&player, 1), now).is_rewarded());

        let placed = BlockPos::new(9, 9, 9);
        plugin.dispatcher().tagger().tag_block(placed);

        plugin.reload(&config);
        assert!(plugin.dispatcher().limiter().is_empty());
        assert!(plugin.dispatcher().tagger().is_block_tagged(placed));
        assert!(plugin.handle(&mine_diamond(&player, 2), now).is_rewarded());
    }

    #[test]
    fn test_reload_from_file_keeps_previous_settings_on_error() {
        let mut plugin = plugin();
        plugin.on_enable(&TomlConfig::from_str(LIMITED).unwrap(), None);

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[general.reward-limiter\nlimit = ").unwrap();

        let result = plugin.reload_from_file(file.path());
        assert!(matches!(result, Err(PluginError::Config(ConfigError::Parse(_)))));
        assert!(plugin.dispatcher().limiter().is_enabled());
        assert_eq!(plugin.settings().reward_limiter.limit, 1);
    }

    #[test]
    fn test_reload_from_file_applies_new_settings() {
        let mut plugin = plugin();
        plugin.on_enable(&TomlConfig::from_str(LIMITED).unwrap(), None);

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), DEFAULT_CONFIG).unwrap();

        plugin.reload_from_file(file.path()).unwrap();
        assert!(!plugin.dispatcher().limiter().is_enabled());
        assert_eq!(plugin.dispatcher().catalog().count(ActivityKind::ItemFish), 1);
    }

    #[test]
    fn test_reload_requires_enabled_plugin() {
        let mut plugin = plugin();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), DEFAULT_CONFIG).unwrap();

        assert!(matches!(
            plugin.reload_from_file(file.path()),
            Err(PluginError::NotEnabled)
        ));
    }

    #[test]
    fn test_maintain_purges_expired_records() {
        let mut plugin = plugin();
        plugin.on_enable(&TomlConfig::from_str(LIMITED).unwrap(), None);
        let now = Instant::now();

        for name in ["Steve", "Alex"] {
            let player = Actor::new(PlayerId::new(), name);
            plugin.handle(&mine_diamond(&player, 0), now);
        }
        assert_eq!(plugin.dispatcher().limiter().len(), 2);

        assert_eq!(plugin.maintain(now + Duration::from_secs(10)), 0);
        assert_eq!(plugin.maintain(now + Duration::from_secs(31)), 2);
        assert!(plugin.dispatcher().limiter().is_empty());
    }

    #[test]
    fn test_disable_drops_state() {
        let mut plugin = plugin();
        plugin.on_enable(&TomlConfig::from_str(LIMITED).unwrap(), None);
        let player = Actor::new(PlayerId::new(), "Steve");
        plugin.handle(&mine_diamond(&player, 0), Instant::now());
        plugin.dispatcher().tagger().tag_block(BlockPos::new(0, 0, 0));

        let stats = plugin.on_disable();
        assert_eq!(stats.rewarded, 1);
        assert!(!plugin.is_enabled());
        assert!(plugin.dispatcher().tagger().is_empty());
        assert!(plugin.dispatcher().limiter().is_empty());
    }

    #[test]
    fn test_economy_attached_after_enable_receives_deposits() {
        let mut plugin = plugin();
        plugin.on_enable(&TomlConfig::from_str(DEFAULT_CONFIG).unwrap(), None);
        let player = Actor::new(PlayerId::new(), "Steve");
        let now = Instant::now();

        assert!(plugin.handle(&mine_diamond(&player, 0), now).is_rewarded());

        let wallet = Arc::new(Wallet::default());
        plugin.attach_economy(wallet.clone());
        assert!(plugin.handle(&mine_diamond(&player, 1), now).is_rewarded());
        assert_eq!(*wallet.deposits.lock().unwrap(), vec![5.0]);
    }

    #[test]
    fn test_detach_economy_stops_deposits() {
        let mut plugin = plugin();
        let wallet = Arc::new(Wallet::default());
        plugin.on_enable(&TomlConfig::from_str(DEFAULT_CONFIG).unwrap(), Some(wallet.clone()));
        let player = Actor::new(PlayerId::new(), "Steve");

        let detached = plugin.detach_economy();
        assert_eq!(detached.map(|provider| provider.name().to_string()), Some("wallet".to_string()));
        assert!(plugin.detach_economy().is_none());

        assert!(plugin.handle(&mine_diamond(&player, 0), Instant::now()).is_rewarded());
        assert!(wallet.deposits.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reload_disabling_spawner_check_rewards_existing_mobs() {
        let mut plugin = plugin();
        plugin.on_enable(&TomlConfig::from_str(DEFAULT_CONFIG).unwrap(), None);
        let player = Actor::new(PlayerId::new(), "Steve");
        let zombie = EntityId::new();
        let now = Instant::now();

        plugin.handle(
            &WorldEvent::SpawnerSpawn {
                spawner: BlockPos::new(0, 20, 0),
                entity: zombie,
                entity_type: "ZOMBIE".to_string(),
            },
            now,
        );
        assert!(plugin.dispatcher().tagger().is_entity_tagged(zombie));

        let relaxed = DEFAULT_CONFIG.replace("spawner = true", "spawner = false");
        plugin.reload(&TomlConfig::from_str(&relaxed).unwrap());

        let outcome = plugin.handle(
            &WorldEvent::EntityKill {
                player,
                entity: zombie,
                entity_type: "ZOMBIE".to_string(),
            },
            now,
        );
        assert!(outcome.is_rewarded());
    }
}
