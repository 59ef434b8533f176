//! Per-player reward limiting over a rolling window.
//!
//! Each player gets at most `limit` rewards per `window`. The window starts
//! with the first reward a player receives and expires lazily: the first grant
//! attempted after it has run out opens a fresh window.
//!
//! ```text
//! NoRecord ──grant──▶ Active ──(now - start > window)──▶ Active (reset)
//!                       │ count < limit  → permit, count += 1
//!                       │ count >= limit → deny, record untouched
//! ```

mod duration;

pub use duration::{parse_duration, DurationParseError};

use crate::text::translate_color_codes;
use crate::types::PlayerId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Accounting entry for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRewardRecord {
    pub player_id: PlayerId,
    /// Rewards granted within the current window
    pub count: u32,
    /// When the current window began
    pub window_start: Instant,
}

impl PlayerRewardRecord {
    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }
}

/// Outcome of asking the limiter for one more reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantDecision {
    Permitted,
    Denied,
}

impl GrantDecision {
    pub fn is_permitted(self) -> bool {
        matches!(self, GrantDecision::Permitted)
    }
}

/// Active limiter policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimiterPolicy {
    pub enabled: bool,
    pub limit: u32,
    pub window: Duration,
    /// Denial message shown to players, colour codes already translated
    pub message: String,
}

impl LimiterPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            limit: 0,
            window: Duration::ZERO,
            message: String::new(),
        }
    }
}

impl Default for LimiterPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// In-memory map of player reward records.
///
/// Owned by the plugin for one server run and handed to the
/// [`RewardLimiter`] by `Arc`. Updates go through the per-key entry lock of
/// the underlying `DashMap`, so unrelated players never serialize on each
/// other.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: DashMap<PlayerId, PlayerRewardRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

/// Enforces "at most N rewards per player per rolling window" when enabled.
#[derive(Debug)]
pub struct RewardLimiter {
    store: Arc<RecordStore>,
    policy: LimiterPolicy,
    denied_count: AtomicU64,
}

impl RewardLimiter {
    /// Creates a disabled limiter operating on `store`.
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            policy: LimiterPolicy::disabled(),
            denied_count: AtomicU64::new(0),
        }
    }

    /// Replaces the active policy.
    ///
    /// A `limit` below 1, an unparseable `window` or a zero-length window
    /// disables the limiter instead of failing. Existing records are dropped so
    /// every player starts a fresh window under the new policy.
    pub fn configure(
        &mut self,
        limit: i64,
        window: &str,
        message: &str,
        enabled: bool,
    ) -> &LimiterPolicy {
        let parsed_window = parse_duration(window);
        let limit_value = u32::try_from(limit).ok().filter(|limit| *limit >= 1);

        self.store.records.clear();
        self.policy = match (limit_value, parsed_window) {
            (Some(limit), Ok(window)) if !window.is_zero() => LimiterPolicy {
                enabled,
                limit,
                window,
                message: translate_color_codes(message),
            },
            (limit_value, parsed_window) => {
                if enabled {
                    warn!(
                        "⚠️ Reward limiter was not properly configured (limit: {}, cooldown: '{}'{}). As such, it will be disabled.",
                        limit,
                        window,
                        match (&limit_value, &parsed_window) {
                            (_, Err(e)) => format!(", {e}"),
                            (None, _) => ", limit must be at least 1".to_string(),
                            _ => ", cooldown must be longer than zero".to_string(),
                        }
                    );
                }
                LimiterPolicy {
                    enabled: false,
                    limit: limit_value.unwrap_or(0),
                    window: parsed_window.unwrap_or(Duration::ZERO),
                    message: translate_color_codes(message),
                }
            }
        };
        &self.policy
    }

    pub fn policy(&self) -> &LimiterPolicy {
        &self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.policy.enabled
    }

    pub fn denial_message(&self) -> &str {
        &self.policy.message
    }

    /// Decides whether `player` may receive one more reward at `now`, and
    /// records the grant when permitted.
    ///
    /// A disabled limiter permits everything without keeping any record.
    pub fn try_grant(&self, player: PlayerId, now: Instant) -> GrantDecision {
        if !self.policy.enabled {
            return GrantDecision::Permitted;
        }

        let decision = match self.store.records.entry(player) {
            Entry::Vacant(entry) => {
                entry.insert(PlayerRewardRecord {
                    player_id: player,
                    count: 1,
                    window_start: now,
                });
                GrantDecision::Permitted
            }
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                if record.is_expired(now, self.policy.window) {
                    record.count = 1;
                    record.window_start = now;
                    GrantDecision::Permitted
                } else if record.count < self.policy.limit {
                    record.count += 1;
                    GrantDecision::Permitted
                } else {
                    GrantDecision::Denied
                }
            }
        };

        if decision == GrantDecision::Denied {
            self.denied_count.fetch_add(1, Ordering::Relaxed);
            debug!("⏳ Reward limit of {} reached for player {}", self.policy.limit, player);
        }
        decision
    }

    /// Copy of the player's current record, if any.
    pub fn record(&self, player: PlayerId) -> Option<PlayerRewardRecord> {
        self.store.records.get(&player).map(|record| *record)
    }

    /// Rewards the player may still receive in the current window.
    ///
    /// `None` when the limiter is disabled.
    pub fn remaining(&self, player: PlayerId, now: Instant) -> Option<u32> {
        if !self.policy.enabled {
            return None;
        }
        let remaining = match self.store.records.get(&player) {
            Some(record) if !record.is_expired(now, self.policy.window) => {
                self.policy.limit.saturating_sub(record.count)
            }
            _ => self.policy.limit,
        };
        Some(remaining)
    }

    /// Time until the player's current window runs out, if one is running.
    pub fn cooldown_remaining(&self, player: PlayerId, now: Instant) -> Option<Duration> {
        if !self.policy.enabled {
            return None;
        }
        let record = self.store.records.get(&player)?;
        let elapsed = now.saturating_duration_since(record.window_start);
        if elapsed > self.policy.window {
            None
        } else {
            Some(self.policy.window - elapsed)
        }
    }

    /// Drops the player's record if its window has expired.
    pub fn forget_if_expired(&self, player: PlayerId, now: Instant) -> bool {
        let window = self.policy.window;
        self.store
            .records
            .remove_if(&player, |_, record| record.is_expired(now, window))
            .is_some()
    }

    /// Drops every expired record and returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let window = self.policy.window;
        let before = self.store.records.len();
        self.store
            .records
            .retain(|_, record| !record.is_expired(now, window));
        before.saturating_sub(self.store.records.len())
    }

    /// Drops every record, keeping the current policy.
    pub fn clear(&self) {
        self.store.records.clear();
    }

    /// Number of players with a record.
    pub fn len(&self) -> usize {
        self.store.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.records.is_empty()
    }

    /// Total grant attempts denied since start.
    pub fn denied_count(&self) -> u64 {
        self.denied_count.load(Ordering::Relaxed)
    }
}
