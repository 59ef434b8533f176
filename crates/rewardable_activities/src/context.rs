//! # Host Capabilities
//!
//! The plugin reaches the server only through these traits. Implementations
//! are supplied by the host at enable time and are called synchronously from
//! the simulation thread, so they must return promptly and must not block.
//!
//! - [`ServerContext`] - console commands and player chat
//! - [`EconomyProvider`] - optional currency deposits; without one, currency
//!   rewards are skipped and every other reward still applies

use crate::types::PlayerId;
use std::fmt::Debug;

/// Server services the plugin needs to hand out rewards.
pub trait ServerContext: Send + Sync + Debug {
    /// Runs `command` as the server console.
    fn dispatch_command(&self, command: &str);

    /// Sends a chat message to a single player.
    fn send_message(&self, player: PlayerId, message: &str);
}

/// Errors reported by an economy provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EconomyError {
    #[error("Account not found for player {0}")]
    AccountNotFound(PlayerId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

/// A currency backend such as a server economy plugin.
pub trait EconomyProvider: Send + Sync + Debug {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Adds `amount` to the player's balance.
    fn deposit(&self, player: PlayerId, amount: f64) -> Result<(), EconomyError>;
}
