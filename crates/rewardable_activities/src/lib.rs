//! # Rewardable Activities
//!
//! A game server plugin that rewards players for natural in-game activities
//! (breaking and placing blocks, killing and breeding animals, fishing) while
//! refusing to reward activities on objects the player created themselves.
//!
//! ## Overview
//!
//! Two components carry the plugin:
//! - **Ownership Tagger** ([`OwnershipTagger`]): remembers which blocks and
//!   entities are in a player-caused state and keeps that knowledge correct
//!   when pistons move blocks or animals breed
//! - **Reward Limiter** ([`RewardLimiter`]): caps how many rewards a player
//!   receives within a rolling cooldown window
//!
//! The [`ActivityDispatcher`] ties them to the reward catalog and the host's
//! economy, and [`RewardableActivitiesPlugin`] wraps everything in the
//! enable/reload/disable lifecycle a host server drives.
//!
//! ## Example Usage
//!
//! ```rust
//! use rewardable_activities::{
//!     Actor, BlockPos, PlayerId, RewardableActivitiesPlugin, ServerContext, TomlConfig,
//!     WorldEvent, DEFAULT_CONFIG,
//! };
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! #[derive(Debug)]
//! struct Console;
//!
//! impl ServerContext for Console {
//!     fn dispatch_command(&self, command: &str) {
//!         println!("> {command}");
//!     }
//!
//!     fn send_message(&self, player: PlayerId, message: &str) {
//!         println!("[{player}] {message}");
//!     }
//! }
//!
//! let mut plugin = RewardableActivitiesPlugin::new(Arc::new(Console));
//! plugin.on_enable(&TomlConfig::from_str(DEFAULT_CONFIG)?, None);
//!
//! let steve = Actor::new(PlayerId::new(), "Steve");
//! let placed = BlockPos::new(0, 64, 0);
//! plugin.handle(
//!     &WorldEvent::BlockPlace { player: steve.clone(), block: placed, material: "DIAMOND_ORE".into() },
//!     Instant::now(),
//! );
//! let outcome = plugin.handle(
//!     &WorldEvent::BlockBreak { player: steve, block: placed, material: "DIAMOND_ORE".into() },
//!     Instant::now(),
//! );
//! assert!(!outcome.is_rewarded());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`] - Identifiers, coordinates and catalog keys
//! - [`ownership`] - Ownership tags and their propagation
//! - [`limiter`] - Per-player reward limiting and the cooldown parser
//! - [`config`] - Configuration access and resolved settings
//! - [`catalog`] - Reward definitions per activity
//! - [`events`] - Inbound world events
//! - [`context`] - Capabilities supplied by the host server
//! - [`dispatcher`] - Event routing and the grant pipeline
//! - [`plugin`] - Plugin lifecycle
//! - [`text`] - Colour codes and placeholders

pub mod catalog;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod events;
pub mod limiter;
pub mod ownership;
pub mod plugin;
pub mod text;
pub mod types;

pub use catalog::{ConfigRewardCatalog, RewardCatalog, RewardDefinition};
pub use config::{
    ConfigError, ConfigSource, OwnershipSettings, PluginSettings, RewardLimiterSettings,
    TomlConfig, DEFAULT_CONFIG,
};
pub use context::{EconomyError, EconomyProvider, ServerContext};
pub use dispatcher::{ActivityDispatcher, DispatchStats, Outcome, RewardGrant, SuppressReason};
pub use events::{Actor, WorldEvent};
pub use limiter::{
    parse_duration, DurationParseError, GrantDecision, LimiterPolicy, PlayerRewardRecord,
    RecordStore, RewardLimiter,
};
pub use ownership::{OwnershipTagger, TagStore};
pub use plugin::{PluginError, RewardableActivitiesPlugin, PLUGIN_NAME};
pub use types::{
    ActivityKey, ActivityKind, BlockFace, BlockPos, EntityId, EntityOrigin, ObjectKey, PlayerId,
};
