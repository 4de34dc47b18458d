//! Net-debt bookkeeping for a single wallet.
//!
//! A wallet never carries two independent balances. It carries one non-negative
//! amount plus the participant it is owed to; the direction of the debt is
//! encoded by *who* the creditor is, never by a sign.

use super::money::Amount;
use super::participant::{ParticipantId, WalletId};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// "`creditor` is owed `amount` by the other participant".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub creditor: ParticipantId,
    pub amount: Decimal,
}

impl Standing {
    pub fn new(creditor: ParticipantId, amount: Decimal) -> Self {
        Self { creditor, amount }
    }

    /// A zero amount means nobody owes anything, whoever the creditor is.
    pub fn is_settled(&self) -> bool {
        self.amount.is_zero()
    }
}

/// The persisted balance row of a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub wallet: WalletId,
    pub creditor: ParticipantId,
    pub amount: Decimal,
}

impl BalanceRecord {
    pub fn new(wallet: WalletId, standing: Standing) -> Self {
        Self {
            wallet,
            creditor: standing.creditor,
            amount: standing.amount,
        }
    }

    pub fn standing(&self) -> Standing {
        Standing::new(self.creditor, self.amount)
    }
}

/// Computes the standing of a wallet after `payer` pays `amount` into it.
///
/// Paying while already being the creditor grows the debt. Paying as the
/// debtor reduces it, and once the payment exceeds the debt the remainder is
/// owed to the payer instead. Fails with `InvalidAmount` when the new debt
/// does not fit in a `Decimal`.
pub fn apply_payment(current: Option<Standing>, payer: ParticipantId, amount: Amount) -> Result<Standing> {
    let current = current.unwrap_or(Standing::new(payer, Decimal::ZERO));
    let paid = amount.value();

    if payer == current.creditor {
        let grown = current
            .amount
            .checked_add(paid)
            .ok_or_else(|| overflow(current.amount, paid))?;
        return Ok(Standing::new(current.creditor, grown));
    }

    let delta = current
        .amount
        .checked_sub(paid)
        .ok_or_else(|| overflow(current.amount, paid))?;
    if delta >= Decimal::ZERO {
        Ok(Standing::new(current.creditor, delta))
    } else {
        Ok(Standing::new(payer, -delta))
    }
}

fn overflow(balance: Decimal, paid: Decimal) -> LedgerError {
    LedgerError::InvalidAmount(format!(
        "paying {paid} on a balance of {balance} exceeds the largest representable amount"
    ))
}
