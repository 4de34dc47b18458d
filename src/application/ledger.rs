use crate::config::{ParticipantConfig, WalletConfig, validate_participants, validate_wallets};
use crate::domain::balance::{BalanceRecord, Standing, apply_payment};
use crate::domain::money::Amount;
use crate::domain::participant::{Participant, ParticipantId, Wallet, WalletId};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::ports::LedgerStoreBox;
use crate::error::{LedgerError, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

/// The outstanding debt of a wallet: `debtor` owes `creditor` `amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletBalance {
    pub wallet: Wallet,
    pub creditor: Participant,
    pub debtor: Participant,
    pub amount: Decimal,
}

/// A committed payment together with the wallet balance it left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPayment {
    pub payment: Payment,
    /// `None` when the payment settled the wallet.
    pub balance: Option<WalletBalance>,
}

/// The shared-wallet ledger.
///
/// Owns the storage backend and the directory of participants and wallets
/// read back from it. Every `record_payment` runs under one async write lock,
/// so the read-modify-write of a balance row can never interleave with
/// another writer. Reads go straight to the store.
pub struct Ledger {
    store: LedgerStoreBox,
    participants: Vec<Participant>,
    wallets: Vec<Wallet>,
    write_lock: Mutex<()>,
}

impl Ledger {
    /// Validates the configuration, seeds an empty store and loads the
    /// directory.
    ///
    /// Seeding happens once: if the store already holds participants, nothing
    /// is written and the stored rows are used even when they differ from the
    /// configuration.
    pub async fn initialize(
        store: LedgerStoreBox,
        participants: &[ParticipantConfig],
        wallets: &[WalletConfig],
    ) -> Result<Self> {
        validate_participants(participants)?;
        validate_wallets(wallets)?;

        let wanted_participants: Vec<Participant> = participants
            .iter()
            .zip(1..)
            .map(|(p, id)| Participant {
                id: ParticipantId(id),
                name: p.name.clone(),
                chat_id: p.chat_id,
            })
            .collect();
        let wanted_wallets: Vec<Wallet> = wallets
            .iter()
            .zip(1..)
            .map(|(w, id)| Wallet {
                id: WalletId(id),
                currency_code: w.currency.clone(),
                display_symbol: w.symbol.clone(),
            })
            .collect();

        let seeded = store
            .seed(wanted_participants.clone(), wanted_wallets.clone())
            .await?;

        let participants = store.participants().await?;
        let wallets = store.wallets().await?;

        if seeded {
            tracing::info!(
                participants = participants.len(),
                wallets = wallets.len(),
                "seeded ledger store"
            );
        } else if participants != wanted_participants || wallets != wanted_wallets {
            tracing::warn!("stored participants or wallets differ from the configuration; keeping the stored ones");
        }

        if participants.len() != 2 {
            return Err(LedgerError::Config(format!(
                "store holds {} participants, expected 2",
                participants.len()
            )));
        }

        Ok(Self {
            store,
            participants,
            wallets,
            write_lock: Mutex::new(()),
        })
    }

    /// Appends a payment and moves the wallet balance accordingly.
    ///
    /// Both rows are committed together. On error nothing was written and the
    /// call may be repeated.
    pub async fn record_payment(
        &self,
        payer: &str,
        currency: &str,
        amount: Decimal,
        note: &str,
    ) -> Result<Payment> {
        let recorded = self
            .record_payment_with_balance(payer, currency, amount, note)
            .await?;
        Ok(recorded.payment)
    }

    /// Like [`Ledger::record_payment`], but also returns the balance the
    /// payment committed. The balance is the one computed under the write
    /// lock, so a concurrent writer can never leak into it, and nothing is
    /// read back from the store after the commit.
    pub async fn record_payment_with_balance(
        &self,
        payer: &str,
        currency: &str,
        amount: Decimal,
        note: &str,
    ) -> Result<RecordedPayment> {
        let payer = self.participant(payer)?;
        let wallet = self.wallet(currency)?;
        let amount = Amount::new(amount)?;

        let _guard = self.write_lock.lock().await;

        let current = self.store.balance(wallet.id).await?;
        let next = apply_payment(current.map(|b| b.standing()), payer.id, amount)?;
        let balance = self.wallet_balance(wallet, next)?;
        tracing::debug!(
            wallet = %wallet.currency_code,
            before = ?current,
            after = ?next,
            "balance transition"
        );

        let payment = NewPayment {
            payer: payer.id,
            wallet: wallet.id,
            amount,
            note: note.to_string(),
            timestamp: Utc::now(),
        };
        let payment = self
            .store
            .append_payment(payment, BalanceRecord::new(wallet.id, next))
            .await?;

        tracing::info!(
            id = %payment.id,
            payer = %payer.name,
            wallet = %wallet.currency_code,
            amount = %amount,
            "recorded payment"
        );
        Ok(RecordedPayment { payment, balance })
    }

    /// The outstanding debt of a wallet, or `None` when it is settled.
    ///
    /// A wallet nobody has paid into yet and one whose balance returned to
    /// zero are both settled.
    pub async fn get_balance(&self, currency: &str) -> Result<Option<WalletBalance>> {
        let wallet = self.wallet(currency)?;
        let Some(record) = self.store.balance(wallet.id).await? else {
            return Ok(None);
        };
        self.wallet_balance(wallet, record.standing())
    }

    fn wallet_balance(&self, wallet: &Wallet, standing: Standing) -> Result<Option<WalletBalance>> {
        if standing.is_settled() {
            return Ok(None);
        }
        let creditor = self.participant_by_id(standing.creditor)?;
        let debtor = self.other_participant(standing.creditor)?;
        Ok(Some(WalletBalance {
            wallet: wallet.clone(),
            creditor: creditor.clone(),
            debtor: debtor.clone(),
            amount: standing.amount,
        }))
    }

    /// Payment history, oldest first, optionally for a single wallet.
    pub async fn list_payments(&self, currency: Option<&str>) -> Result<Vec<Payment>> {
        let wallet = currency.map(|c| self.wallet(c)).transpose()?;
        self.store.payments(wallet.map(|w| w.id)).await
    }

    /// The `count` most recent payments across all wallets, oldest first.
    pub async fn last_payments(&self, count: usize) -> Result<Vec<Payment>> {
        let mut payments = self.store.payments(None).await?;
        let skip = payments.len().saturating_sub(count);
        Ok(payments.split_off(skip))
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn participant(&self, name: &str) -> Result<&Participant> {
        self.participants
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| LedgerError::UnknownParticipant(name.to_string()))
    }

    pub fn participant_by_id(&self, id: ParticipantId) -> Result<&Participant> {
        self.participants
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| LedgerError::UnknownParticipant(format!("#{id}")))
    }

    pub fn participant_by_chat_id(&self, chat_id: i64) -> Option<&Participant> {
        self.participants.iter().find(|p| p.chat_id == chat_id)
    }

    /// The participant on the other side of the ledger from `id`.
    pub fn other_participant(&self, id: ParticipantId) -> Result<&Participant> {
        self.participant_by_id(id)?;
        self.participants
            .iter()
            .find(|p| p.id != id)
            .ok_or_else(|| LedgerError::UnknownParticipant(format!("other than #{id}")))
    }

    pub fn wallet(&self, currency: &str) -> Result<&Wallet> {
        self.wallets
            .iter()
            .find(|w| w.currency_code == currency)
            .ok_or_else(|| LedgerError::UnknownWallet(currency.to_string()))
    }

    pub fn wallet_by_id(&self, id: WalletId) -> Result<&Wallet> {
        self.wallets
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| LedgerError::UnknownWallet(format!("#{id}")))
    }
}
