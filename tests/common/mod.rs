#![allow(dead_code)]

use async_trait::async_trait;
use duo_ledger::application::ledger::Ledger;
use duo_ledger::config::{ParticipantConfig, WalletConfig};
use duo_ledger::domain::balance::BalanceRecord;
use duo_ledger::domain::participant::{Participant, Wallet, WalletId};
use duo_ledger::domain::payment::{NewPayment, Payment};
use duo_ledger::domain::ports::LedgerStore;
use duo_ledger::error::{LedgerError, Result};
use duo_ledger::infrastructure::in_memory::InMemoryLedgerStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const CONFIG_FIXTURE: &str = "tests/fixtures/config.json";
pub const PAYMENTS_FIXTURE: &str = "tests/fixtures/payments.csv";

pub fn users() -> Vec<ParticipantConfig> {
    vec![
        ParticipantConfig {
            name: "Julia".to_string(),
            chat_id: 1234,
        },
        ParticipantConfig {
            name: "Jack".to_string(),
            chat_id: 4321,
        },
    ]
}

pub fn wallets() -> Vec<WalletConfig> {
    vec![
        WalletConfig {
            currency: "Dollar".to_string(),
            symbol: "$".to_string(),
        },
        WalletConfig {
            currency: "Euro".to_string(),
            symbol: "€".to_string(),
        },
    ]
}

pub async fn in_memory_ledger() -> Ledger {
    Ledger::initialize(Box::new(InMemoryLedgerStore::new()), &users(), &wallets())
        .await
        .unwrap()
}

/// An in-memory store whose commits or reads can be made to fail on demand.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryLedgerStore,
    failing: Arc<AtomicBool>,
    break_reads_after_commit: Arc<AtomicBool>,
    reads_broken: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Once the next payment is committed, every balance and payment read fails.
    pub fn break_reads_after_commit(&self) {
        self.break_reads_after_commit.store(true, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryLedgerStore {
        &self.inner
    }

    fn check_reads(&self) -> Result<()> {
        if self.reads_broken.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence("read timeout".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for FlakyStore {
    async fn seed(&self, participants: Vec<Participant>, wallets: Vec<Wallet>) -> Result<bool> {
        self.inner.seed(participants, wallets).await
    }

    async fn participants(&self) -> Result<Vec<Participant>> {
        self.inner.participants().await
    }

    async fn wallets(&self) -> Result<Vec<Wallet>> {
        self.inner.wallets().await
    }

    async fn balance(&self, wallet: WalletId) -> Result<Option<BalanceRecord>> {
        self.check_reads()?;
        self.inner.balance(wallet).await
    }

    async fn append_payment(&self, payment: NewPayment, balance: BalanceRecord) -> Result<Payment> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence("disk unavailable".to_string()));
        }
        let payment = self.inner.append_payment(payment, balance).await?;
        if self.break_reads_after_commit.load(Ordering::SeqCst) {
            self.reads_broken.store(true, Ordering::SeqCst);
        }
        Ok(payment)
    }

    async fn payments(&self, wallet: Option<WalletId>) -> Result<Vec<Payment>> {
        self.check_reads()?;
        self.inner.payments(wallet).await
    }
}
