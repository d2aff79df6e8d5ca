//! In-memory collaborators for tests, demos and the CLI.
//!
//! All state lives behind `Arc<RwLock<_>>` so clones share it. Nothing is
//! persisted.

use crate::{CreditDebit, CreditLedger, Notification, NotificationLevel, Notifier, SessionProvider};
use async_trait::async_trait;
use atelier_core::{CreditMetadata, NodeKind, SessionState};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Credit ledger holding a balance in memory.
///
/// Debits take the write lock for the whole check-and-subtract, so
/// concurrent debits never overdraw the balance.
///
/// # Example
/// ```no_run
/// use atelier_interface::{CreditLedger, InMemoryCreditLedger};
///
/// #[tokio::main]
/// async fn main() {
///     let ledger = InMemoryCreditLedger::new(10);
///     assert_eq!(ledger.available_credits().await, 10);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCreditLedger {
    balance: Arc<RwLock<u32>>,
    debits: Arc<RwLock<Vec<CreditDebit>>>,
    refuse_debits: Arc<RwLock<bool>>,
}

impl InMemoryCreditLedger {
    /// Creates a ledger with `balance` credits.
    pub fn new(balance: u32) -> Self {
        Self {
            balance: Arc::new(RwLock::new(balance)),
            debits: Arc::new(RwLock::new(Vec::new())),
            refuse_debits: Arc::new(RwLock::new(false)),
        }
    }

    /// Replaces the balance.
    pub async fn set_balance(&self, balance: u32) {
        *self.balance.write().await = balance;
    }

    /// Makes every later debit fail regardless of balance (for testing).
    pub async fn refuse_debits(&self, refuse: bool) {
        *self.refuse_debits.write().await = refuse;
    }

    /// Debits recorded so far.
    pub async fn debits(&self) -> Vec<CreditDebit> {
        self.debits.read().await.clone()
    }

    /// Number of debits recorded so far.
    pub async fn debit_count(&self) -> usize {
        self.debits.read().await.len()
    }
}

impl Default for InMemoryCreditLedger {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn available_credits(&self) -> u32 {
        *self.balance.read().await
    }

    #[tracing::instrument(skip(self, metadata))]
    async fn use_credits(&self, kind: NodeKind, amount: u32, metadata: &CreditMetadata) -> bool {
        if *self.refuse_debits.read().await {
            tracing::warn!("Debit refused by ledger");
            return false;
        }

        let mut balance = self.balance.write().await;
        if *balance < amount {
            tracing::warn!(available = *balance, "Insufficient credits for debit");
            return false;
        }
        *balance -= amount;

        self.debits
            .write()
            .await
            .push(CreditDebit::new(kind, amount, metadata.clone()));
        tracing::debug!(remaining = *balance, "Credits debited");
        true
    }
}

/// Session provider returning whatever state it was last given.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    state: Arc<RwLock<SessionState>>,
}

impl StaticSession {
    /// Creates a provider reporting `state`.
    pub fn new(state: SessionState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Replaces the reported state (sign-in, sign-out).
    pub async fn set(&self, state: SessionState) {
        *self.state.write().await = state;
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn current_session(&self) -> SessionState {
        self.state.read().await.clone()
    }
}

/// Notifier that writes notifications to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level() {
            NotificationLevel::Success => tracing::info!(
                title = %notification.title(),
                description = ?notification.description(),
                "Notification"
            ),
            NotificationLevel::Error => tracing::error!(
                title = %notification.title(),
                description = ?notification.description(),
                "Notification"
            ),
        }
    }
}

/// Notifier that keeps every notification it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        match self.received.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        match self.received.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
