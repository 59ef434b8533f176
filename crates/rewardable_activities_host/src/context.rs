//! Console implementations of the plugin's host capabilities.
//!
//! - [`ConsoleContext`] logs dispatched commands and player messages
//! - [`LedgerEconomy`] keeps player balances in memory

use dashmap::DashMap;
use rewardable_activities::{EconomyError, EconomyProvider, PlayerId, ServerContext};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Server context that writes everything to the log.
#[derive(Debug, Default)]
pub struct ConsoleContext {
    commands: AtomicU64,
    messages: AtomicU64,
}

impl ConsoleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands_dispatched(&self) -> u64 {
        self.commands.load(Ordering::Relaxed)
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages.load(Ordering::Relaxed)
    }
}

impl ServerContext for ConsoleContext {
    fn dispatch_command(&self, command: &str) {
        self.commands.fetch_add(1, Ordering::Relaxed);
        info!("⌨️ Console command: /{}", command);
    }

    fn send_message(&self, player: PlayerId, message: &str) {
        self.messages.fetch_add(1, Ordering::Relaxed);
        info!("💬 To {}: {}", player, message);
    }
}

/// In-memory economy; accounts open on first deposit.
#[derive(Debug)]
pub struct LedgerEconomy {
    balances: DashMap<PlayerId, f64>,
    starting_balance: f64,
}

impl LedgerEconomy {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            balances: DashMap::new(),
            starting_balance,
        }
    }

    /// Current balance, or `None` when the player has no account.
    pub fn balance(&self, player: PlayerId) -> Option<f64> {
        self.balances.get(&player).map(|balance| *balance)
    }

    pub fn accounts(&self) -> usize {
        self.balances.len()
    }

    /// Sum of every account balance.
    pub fn total(&self) -> f64 {
        self.balances.iter().map(|entry| *entry.value()).sum()
    }
}

impl EconomyProvider for LedgerEconomy {
    fn name(&self) -> &str {
        "ledger"
    }

    fn deposit(&self, player: PlayerId, amount: f64) -> Result<(), EconomyError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(EconomyError::InvalidAmount(amount));
        }
        let mut balance = self
            .balances
            .entry(player)
            .or_insert(self.starting_balance);
        *balance += amount;
        info!("💰 Deposited {:.2} to {} (balance: {:.2})", amount, player, *balance);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_opens_accounts_with_starting_balance() {
        let ledger = LedgerEconomy::new(100.0);
        let player = PlayerId::new();

        assert_eq!(ledger.balance(player), None);
        ledger.deposit(player, 2.5).unwrap();
        ledger.deposit(player, 2.5).unwrap();

        assert_eq!(ledger.balance(player), Some(105.0));
        assert_eq!(ledger.accounts(), 1);
        assert_eq!(ledger.total(), 105.0);
    }

    #[test]
    fn test_ledger_rejects_invalid_amounts() {
        let ledger = LedgerEconomy::new(0.0);
        let player = PlayerId::new();

        assert_eq!(
            ledger.deposit(player, -1.0),
            Err(EconomyError::InvalidAmount(-1.0))
        );
        assert!(ledger.deposit(player, f64::NAN).is_err());
        assert_eq!(ledger.accounts(), 0);
    }

    #[test]
    fn test_console_context_counts() {
        let context = ConsoleContext::new();
        context.dispatch_command("say hello");
        context.send_message(PlayerId::new(), "§aHi");
        context.send_message(PlayerId::new(), "§aHi again");

        assert_eq!(context.commands_dispatched(), 1);
        assert_eq!(context.messages_sent(), 2);
    }
}
