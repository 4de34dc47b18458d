use super::balance::BalanceRecord;
use super::participant::{Participant, Wallet, WalletId};
use super::payment::{NewPayment, Payment};
use crate::error::Result;
use async_trait::async_trait;

/// Durable storage of the four ledger relations.
///
/// Implementations must make `append_payment` atomic: the payment row and the
/// balance row become visible together or not at all. Serializing concurrent
/// writers is the caller's job.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Writes participants and wallets unless participant rows already exist.
    /// Returns `true` when this call seeded the store.
    async fn seed(&self, participants: Vec<Participant>, wallets: Vec<Wallet>) -> Result<bool>;
    async fn participants(&self) -> Result<Vec<Participant>>;
    async fn wallets(&self) -> Result<Vec<Wallet>>;
    async fn balance(&self, wallet: WalletId) -> Result<Option<BalanceRecord>>;
    /// Assigns the next payment id and commits the payment with the new balance.
    async fn append_payment(&self, payment: NewPayment, balance: BalanceRecord) -> Result<Payment>;
    /// Payments in insertion order, optionally restricted to one wallet.
    async fn payments(&self, wallet: Option<WalletId>) -> Result<Vec<Payment>>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
