use crate::domain::balance::BalanceRecord;
use crate::domain::participant::{Participant, Wallet, WalletId};
use crate::domain::payment::{NewPayment, Payment, PaymentId};
use crate::domain::ports::LedgerStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    participants: Vec<Participant>,
    wallets: Vec<Wallet>,
    payments: Vec<Payment>,
    balances: HashMap<WalletId, BalanceRecord>,
}

/// A thread-safe in-memory ledger store.
///
/// All four relations live behind one `Arc<RwLock<..>>`, so a payment and its
/// balance row are written under the same guard. Clones share the same data.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn seed(&self, participants: Vec<Participant>, wallets: Vec<Wallet>) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.participants.is_empty() {
            return Ok(false);
        }
        tables.participants = participants;
        tables.wallets = wallets;
        Ok(true)
    }

    async fn participants(&self) -> Result<Vec<Participant>> {
        Ok(self.tables.read().await.participants.clone())
    }

    async fn wallets(&self) -> Result<Vec<Wallet>> {
        Ok(self.tables.read().await.wallets.clone())
    }

    async fn balance(&self, wallet: WalletId) -> Result<Option<BalanceRecord>> {
        Ok(self.tables.read().await.balances.get(&wallet).copied())
    }

    async fn append_payment(&self, payment: NewPayment, balance: BalanceRecord) -> Result<Payment> {
        let mut tables = self.tables.write().await;
        let id = PaymentId(tables.payments.len() as u64 + 1);
        let payment = payment.with_id(id);
        tables.payments.push(payment.clone());
        tables.balances.insert(balance.wallet, balance);
        Ok(payment)
    }

    async fn payments(&self, wallet: Option<WalletId>) -> Result<Vec<Payment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .filter(|p| wallet.is_none_or(|w| p.wallet == w))
            .cloned()
            .collect())
    }
}
