//! Startup configuration: the two participants and the wallets they share.
//!
//! The file is JSON:
//!
//! ```json
//! {
//!   "token": "optional-chat-token",
//!   "wallets": [{"currency": "Dollar", "symbol": "$"}],
//!   "users": [{"name": "Julia", "chat_id": 1234}, {"name": "Jack", "chat_id": 4321}]
//! }
//! ```

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantConfig {
    pub name: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    pub currency: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Chat transport token. Unused by the ledger itself, forwarded to front ends.
    #[serde(default)]
    pub token: Option<String>,
    pub wallets: Vec<WalletConfig>,
    pub users: Vec<ParticipantConfig>,
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_json(&raw)?;
        tracing::info!(
            users = ?config.users.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
            wallets = ?config.currencies(),
            "loaded configuration from {}",
            path.display()
        );
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)
            .map_err(|e| LedgerError::Config(format!("malformed configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_participants(&self.users)?;
        validate_wallets(&self.wallets)?;

        if self.users[0].chat_id == self.users[1].chat_id {
            return Err(LedgerError::Config(
                "users must have different chat ids".to_string(),
            ));
        }
        if self.wallets.is_empty() {
            return Err(LedgerError::Config(
                "at least one wallet must be configured".to_string(),
            ));
        }
        Ok(())
    }

    pub fn currencies(&self) -> Vec<&str> {
        self.wallets.iter().map(|w| w.currency.as_str()).collect()
    }
}

/// Exactly two participants with distinct, non-blank names.
pub(crate) fn validate_participants(users: &[ParticipantConfig]) -> Result<()> {
    if users.len() != 2 {
        return Err(LedgerError::Config(format!(
            "number of configured users must be 2, while it is {}",
            users.len()
        )));
    }
    if users.iter().any(|u| u.name.trim().is_empty()) {
        return Err(LedgerError::Config("user names cannot be empty".to_string()));
    }
    if users[0].name == users[1].name {
        return Err(LedgerError::Config(format!(
            "user names cannot be the same ('{}')",
            users[0].name
        )));
    }
    Ok(())
}

pub(crate) fn validate_wallets(wallets: &[WalletConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for wallet in wallets {
        if wallet.currency.trim().is_empty() {
            return Err(LedgerError::Config(
                "wallet currency names cannot be empty".to_string(),
            ));
        }
        if !seen.insert(wallet.currency.as_str()) {
            return Err(LedgerError::Config(format!(
                "wallets must have unique currency names ('{}' is repeated)",
                wallet.currency
            )));
        }
    }
    Ok(())
}
