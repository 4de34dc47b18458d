use crate::domain::balance::BalanceRecord;
use crate::domain::participant::{Participant, Wallet, WalletId};
use crate::domain::payment::{NewPayment, Payment, PaymentId};
use crate::domain::ports::LedgerStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for participant rows, keyed by participant id.
pub const CF_PARTICIPANTS: &str = "participants";
/// Column Family for wallet rows, keyed by wallet id.
pub const CF_WALLETS: &str = "wallets";
/// Column Family for the payment log, keyed by payment id.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for balance rows, keyed by wallet id.
pub const CF_BALANCES: &str = "balances";

const COLUMN_FAMILIES: [&str; 4] = [CF_PARTICIPANTS, CF_WALLETS, CF_PAYMENTS, CF_BALANCES];

/// A persistent ledger store backed by RocksDB.
///
/// Each relation lives in its own Column Family. Keys are big-endian ids, so
/// iteration order equals id order, and values are JSON. A payment and its
/// balance row are committed with a single `WriteBatch`.
///
/// Appends must not run concurrently; `Ledger` holds its write lock around
/// every call. The payment id counter only moves once a batch is written.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbLedgerStore {
    db: Arc<DB>,
    next_payment_id: Arc<AtomicU64>,
}

impl RocksDbLedgerStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// When the directory did not exist before and opening fails, whatever was
    /// created is removed again so the next attempt starts from scratch.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        open_or_clean_up(path.as_ref(), Self::open_existing)
    }

    fn open_existing(path: &Path) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;
        let store = Self::from_db(db)?;
        tracing::info!(
            ?path,
            next_payment = store.next_payment_id.load(Ordering::SeqCst),
            "opened RocksDB ledger"
        );
        Ok(store)
    }

    /// Wraps an open database, resuming payment ids after the last stored one.
    fn from_db(db: DB) -> Result<Self> {
        let last_id = {
            let cf = db
                .cf_handle(CF_PAYMENTS)
                .ok_or_else(|| missing_cf(CF_PAYMENTS))?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    decode_u64(&key)?
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_payment_id: Arc::new(AtomicU64::new(last_id + 1)),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| missing_cf(name))
    }

    fn scan<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let cf = self.cf(name)?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            rows.push(decode(&value)?);
        }
        Ok(rows)
    }
}

fn open_or_clean_up<T>(path: &Path, open: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
    let existed = path.exists();
    match open(path) {
        Ok(store) => Ok(store),
        Err(err) => {
            if !existed && path.exists() {
                tracing::warn!(?path, "removing partially created database");
                std::fs::remove_dir_all(path)?;
            }
            Err(err)
        }
    }
}

fn missing_cf(name: &str) -> LedgerError {
    LedgerError::Persistence(format!("{name} column family not found"))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| LedgerError::Persistence(format!("Serialization error: {e}")))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::Persistence(format!("Deserialization error: {e}")))
}

fn decode_u64(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key
        .try_into()
        .map_err(|_| LedgerError::Persistence(format!("malformed payment key {key:?}")))?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl LedgerStore for RocksDbLedgerStore {
    async fn seed(&self, participants: Vec<Participant>, wallets: Vec<Wallet>) -> Result<bool> {
        let cf_participants = self.cf(CF_PARTICIPANTS)?;
        if self
            .db
            .iterator_cf(cf_participants, IteratorMode::Start)
            .next()
            .is_some()
        {
            return Ok(false);
        }

        let cf_wallets = self.cf(CF_WALLETS)?;
        let mut batch = WriteBatch::default();
        for participant in &participants {
            batch.put_cf(cf_participants, participant.id.0.to_be_bytes(), encode(participant)?);
        }
        for wallet in &wallets {
            batch.put_cf(cf_wallets, wallet.id.0.to_be_bytes(), encode(wallet)?);
        }
        self.db.write(batch)?;
        Ok(true)
    }

    async fn participants(&self) -> Result<Vec<Participant>> {
        self.scan(CF_PARTICIPANTS)
    }

    async fn wallets(&self) -> Result<Vec<Wallet>> {
        self.scan(CF_WALLETS)
    }

    async fn balance(&self, wallet: WalletId) -> Result<Option<BalanceRecord>> {
        let cf = self.cf(CF_BALANCES)?;
        match self.db.get_cf(cf, wallet.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn append_payment(&self, payment: NewPayment, balance: BalanceRecord) -> Result<Payment> {
        let cf_payments = self.cf(CF_PAYMENTS)?;
        let cf_balances = self.cf(CF_BALANCES)?;

        let id = PaymentId(self.next_payment_id.load(Ordering::SeqCst));
        let payment = payment.with_id(id);

        let mut batch = WriteBatch::default();
        batch.put_cf(cf_payments, id.0.to_be_bytes(), encode(&payment)?);
        batch.put_cf(cf_balances, balance.wallet.0.to_be_bytes(), encode(&balance)?);
        self.db.write(batch)?;
        self.next_payment_id.store(id.0 + 1, Ordering::SeqCst);

        Ok(payment)
    }

    async fn payments(&self, wallet: Option<WalletId>) -> Result<Vec<Payment>> {
        let payments: Vec<Payment> = self.scan(CF_PAYMENTS)?;
        Ok(payments
            .into_iter()
            .filter(|p| wallet.is_none_or(|w| p.wallet == w))
            .collect())
    }
}
