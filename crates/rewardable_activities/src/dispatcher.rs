//! # Activity Dispatcher
//!
//! Turns world events into rewards. For every event the dispatcher keeps the
//! ownership tags up to date and, for rewardable activities, runs the grant
//! pipeline:
//!
//! 1. **Ownership** - activities on player-caused objects earn nothing
//! 2. **Catalog** - activities without a configured reward earn nothing and
//!    do not count towards the limit
//! 3. **Chance** - the reward's probability roll
//! 4. **Limiter** - the per-player cap; a denial sends the limit message
//! 5. **Apply** - currency, console commands, then the player message
//!
//! The dispatcher is driven from the simulation thread and never blocks.

use crate::catalog::{ConfigRewardCatalog, RewardCatalog, RewardDefinition};
use crate::config::{OwnershipSettings, RewardLimiterSettings};
use crate::context::{EconomyProvider, ServerContext};
use crate::events::{Actor, WorldEvent};
use crate::limiter::{GrantDecision, LimiterPolicy, RewardLimiter};
use crate::ownership::OwnershipTagger;
use crate::text::{expand_placeholders, translate_color_codes};
use crate::types::{ActivityKey, ActivityKind, EntityOrigin, PlayerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Why an activity did not earn a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// The block or entity was placed, bred or spawned artificially
    OwnedObject,
    /// No reward is configured for the activity
    NotRewardable,
    /// The probability roll failed
    ChanceFailed,
    /// The player reached the reward limit for the current window
    LimitReached,
}

/// A reward that was handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardGrant {
    pub player: PlayerId,
    pub activity: ActivityKey,
    /// Currency actually deposited; zero when there was no provider or the
    /// deposit failed
    pub currency: f64,
    pub commands: usize,
    pub message_sent: bool,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rewarded(RewardGrant),
    Suppressed(SuppressReason),
    /// The event is not a rewardable activity
    Ignored,
}

impl Outcome {
    pub fn is_rewarded(&self) -> bool {
        matches!(self, Outcome::Rewarded(_))
    }
}

/// Running totals since the dispatcher was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub events: u64,
    pub rewarded: u64,
    pub suppressed: u64,
}

/// Routes world events through the ownership tagger and the reward limiter and
/// applies the configured rewards.
#[derive(Debug)]
pub struct ActivityDispatcher {
    tagger: OwnershipTagger,
    limiter: RewardLimiter,
    catalog: ConfigRewardCatalog,
    ownership: OwnershipSettings,
    context: Arc<dyn ServerContext>,
    economy: Option<Arc<dyn EconomyProvider>>,
    rng: StdRng,
    stats: DispatchStats,
}

impl ActivityDispatcher {
    /// Creates a dispatcher with an empty catalog and a disabled limiter.
    pub fn new(
        tagger: OwnershipTagger,
        limiter: RewardLimiter,
        context: Arc<dyn ServerContext>,
    ) -> Self {
        Self {
            tagger,
            limiter,
            catalog: ConfigRewardCatalog::new(),
            ownership: OwnershipSettings::default(),
            context,
            economy: None,
            rng: StdRng::from_entropy(),
            stats: DispatchStats::default(),
        }
    }

    /// Replaces the random source used for chance rolls.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn set_economy(&mut self, economy: Option<Arc<dyn EconomyProvider>>) {
        self.economy = economy;
    }

    pub fn economy(&self) -> Option<&Arc<dyn EconomyProvider>> {
        self.economy.as_ref()
    }

    pub fn set_catalog(&mut self, catalog: ConfigRewardCatalog) {
        self.catalog = catalog;
    }

    pub fn catalog(&self) -> &ConfigRewardCatalog {
        &self.catalog
    }

    pub fn set_ownership(&mut self, ownership: OwnershipSettings) {
        self.ownership = ownership;
    }

    pub fn ownership(&self) -> OwnershipSettings {
        self.ownership
    }

    /// Applies limiter settings; see [`RewardLimiter::configure`].
    pub fn configure_limiter(&mut self, settings: &RewardLimiterSettings) -> &LimiterPolicy {
        self.limiter.configure(
            settings.limit,
            &settings.cooldown,
            &settings.limit_reached_message,
            settings.enabled,
        )
    }

    pub fn tagger(&self) -> &OwnershipTagger {
        &self.tagger
    }

    pub fn limiter(&self) -> &RewardLimiter {
        &self.limiter
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Processes one world event observed at `now`.
    pub fn handle(&mut self, event: &WorldEvent, now: Instant) -> Outcome {
        self.stats.events += 1;
        let outcome = self.dispatch(event, now);
        match &outcome {
            Outcome::Rewarded(grant) => {
                self.stats.rewarded += 1;
                debug!(
                    "🎁 Rewarded {} for {} (currency: {:.2}, commands: {})",
                    grant.player, grant.activity, grant.currency, grant.commands
                );
            }
            Outcome::Suppressed(reason) => {
                self.stats.suppressed += 1;
                debug!("🚫 {} not rewarded: {:?}", event.name(), reason);
            }
            Outcome::Ignored => {}
        }
        outcome
    }

    fn dispatch(&mut self, event: &WorldEvent, now: Instant) -> Outcome {
        match event {
            WorldEvent::BlockPlace {
                player,
                block,
                material,
            } => {
                if self.ownership.block_place {
                    self.tagger.tag_block(*block);
                }
                self.reward(player, ActivityKind::BlockPlace, material, now)
            }
            WorldEvent::BlockBreak {
                player,
                block,
                material,
            } => {
                let placed_by_player = self.tagger.is_block_tagged(*block);
                self.tagger.untag_block(*block);
                if placed_by_player && self.ownership.block_break {
                    return Outcome::Suppressed(SuppressReason::OwnedObject);
                }
                self.reward(player, ActivityKind::BlockBreak, material, now)
            }
            WorldEvent::BlockExplode { source, blocks } => {
                self.tagger.untag_block(*source);
                self.tagger.untag_all(blocks.iter().copied());
                Outcome::Ignored
            }
            WorldEvent::PistonExtend {
                direction, blocks, ..
            } => {
                self.tagger.propagate_on_push(*direction, blocks);
                Outcome::Ignored
            }
            WorldEvent::PistonRetract {
                direction, blocks, ..
            } => {
                self.tagger.propagate_on_push(direction.opposite(), blocks);
                Outcome::Ignored
            }
            WorldEvent::EntityBreed {
                breeder,
                mother,
                father,
                offspring,
                entity_type,
            } => match breeder {
                Some(player) => {
                    self.tagger.propagate_on_breed(
                        *mother,
                        *father,
                        *offspring,
                        self.ownership.entity_breed,
                    );
                    self.reward(player, ActivityKind::EntityBreed, entity_type, now)
                }
                None => Outcome::Ignored,
            },
            WorldEvent::EntityKill {
                player,
                entity,
                entity_type,
            } => {
                let bred = self.ownership.entity_breed
                    && self.tagger.is_entity_tagged_as(*entity, EntityOrigin::Bred);
                let spawned = self.ownership.entity_spawner
                    && self.tagger.is_entity_tagged_as(*entity, EntityOrigin::Spawner);
                self.tagger.untag_entity(*entity);
                if bred || spawned {
                    return Outcome::Suppressed(SuppressReason::OwnedObject);
                }
                self.reward(player, ActivityKind::EntityKill, entity_type, now)
            }
            WorldEvent::EntityExplode { entity, blocks } => {
                self.tagger.untag_entity(*entity);
                self.tagger.untag_all(blocks.iter().copied());
                Outcome::Ignored
            }
            WorldEvent::SpawnerSpawn { entity, .. } => {
                if self.ownership.entity_spawner {
                    self.tagger.tag_entity(*entity, EntityOrigin::Spawner);
                }
                Outcome::Ignored
            }
            WorldEvent::ItemFish { player, item } => {
                self.reward(player, ActivityKind::ItemFish, item, now)
            }
            WorldEvent::PlayerJoin { player } => {
                self.limiter.forget_if_expired(player.id, now);
                Outcome::Ignored
            }
        }
    }

    fn reward(&mut self, player: &Actor, kind: ActivityKind, target: &str, now: Instant) -> Outcome {
        let activity = ActivityKey::new(kind, target);
        let Some(definition) = self.catalog.lookup(&activity).cloned() else {
            return Outcome::Suppressed(SuppressReason::NotRewardable);
        };

        if !self.roll(definition.chance) {
            return Outcome::Suppressed(SuppressReason::ChanceFailed);
        }

        if self.limiter.try_grant(player.id, now) == GrantDecision::Denied {
            let message = self.limiter.denial_message();
            if !message.is_empty() {
                self.context.send_message(player.id, message);
            }
            return Outcome::Suppressed(SuppressReason::LimitReached);
        }

        Outcome::Rewarded(self.apply(player, activity, &definition))
    }

    fn roll(&mut self, chance: f64) -> bool {
        if chance >= 1.0 {
            true
        } else if chance <= 0.0 {
            false
        } else {
            self.rng.gen::<f64>() < chance
        }
    }

    fn apply(&self, player: &Actor, activity: ActivityKey, definition: &RewardDefinition) -> RewardGrant {
        let mut deposited = 0.0;
        if definition.currency > 0.0 {
            match &self.economy {
                Some(economy) => match economy.deposit(player.id, definition.currency) {
                    Ok(()) => deposited = definition.currency,
                    Err(e) => warn!(
                        "⚠️ Could not deposit {:.2} to {} via {}: {}",
                        definition.currency,
                        player.name,
                        economy.name(),
                        e
                    ),
                },
                None => debug!(
                    "💰 No economy provider, skipping {:.2} currency for {}",
                    definition.currency, player.name
                ),
            }
        }

        let player_id = player.id.to_string();
        let amount = format!("{:.2}", deposited);
        let placeholders = [
            ("player", player.name.as_str()),
            ("player_id", player_id.as_str()),
            ("amount", amount.as_str()),
            ("target", activity.target.as_str()),
        ];

        for command in &definition.commands {
            self.context
                .dispatch_command(&expand_placeholders(command, &placeholders));
        }

        let message_sent = match &definition.message {
            Some(message) if !message.is_empty() => {
                let message = translate_color_codes(&expand_placeholders(message, &placeholders));
                self.context.send_message(player.id, &message);
                true
            }
            _ => false,
        };

        RewardGrant {
            player: player.id,
            activity,
            currency: deposited,
            commands: definition.commands.len(),
            message_sent,
        }
    }
}
