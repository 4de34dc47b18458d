use super::money::Amount;
use super::participant::{ParticipantId, WalletId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used whenever a payment timestamp is shown to a participant.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Note stored when the payer chose not to describe a payment.
pub const EMPTY_NOTE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaymentId(pub u64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payment that has been validated but not yet given an id by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub payer: ParticipantId,
    pub wallet: WalletId,
    pub amount: Amount,
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

impl NewPayment {
    pub fn with_id(self, id: PaymentId) -> Payment {
        Payment {
            id,
            payer: self.payer,
            wallet: self.wallet,
            amount: self.amount,
            note: self.note,
            timestamp: self.timestamp,
        }
    }
}

/// An entry of the append-only payment log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub payer: ParticipantId,
    pub wallet: WalletId,
    pub amount: Amount,
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

impl Payment {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
