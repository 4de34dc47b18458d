use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Diagnostic, Debug)]
pub enum LedgerError {
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(duo_ledger::config),
        help("check the users and wallets sections of the configuration file")
    )]
    Config(String),

    #[error("Unknown participant: {0}")]
    #[diagnostic(code(duo_ledger::unknown_participant))]
    UnknownParticipant(String),

    #[error("Unknown wallet: {0}")]
    #[diagnostic(code(duo_ledger::unknown_wallet))]
    UnknownWallet(String),

    #[error("Invalid amount: {0}")]
    #[diagnostic(
        code(duo_ledger::invalid_amount),
        help("amounts are positive numbers with an optional two-digit fraction, e.g. 12 or 12.50")
    )]
    InvalidAmount(String),

    #[error("Persistence error: {0}")]
    #[diagnostic(code(duo_ledger::persistence), help("the operation can be retried"))]
    Persistence(String),

    #[error("Chat {0} is not allowed to use this ledger")]
    #[diagnostic(code(duo_ledger::unauthorized))]
    Unauthorized(i64),

    #[error("IO error: {0}")]
    #[diagnostic(code(duo_ledger::io))]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    #[diagnostic(code(duo_ledger::csv))]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(duo_ledger::json))]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    /// Whether repeating the failed call may succeed. Only storage failures
    /// qualify; every other variant is a caller or configuration mistake.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Persistence(_))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}
