use crate::application::ledger::{Ledger, WalletBalance};
use crate::domain::money::{Amount, format_money};
use crate::domain::participant::{Participant, Wallet};
use crate::domain::payment::{EMPTY_NOTE, Payment};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Command a participant sends instead of a note.
pub const SKIP_COMMAND: &str = "/skip";

/// Message sent to the participant who did not record a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub chat_id: i64,
    pub text: String,
}

/// Outcome of a recorded payment, ready to be sent back through the chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub payment: Payment,
    /// New wallet status, shown to whoever recorded the payment.
    pub confirmation: String,
    pub notification: Notification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub payer: String,
    pub amount: String,
    pub currency: String,
    pub symbol: String,
    pub note: String,
    pub timestamp: String,
}

/// The exported payment history: `{"payments": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryExport {
    pub payments: Vec<HistoryEntry>,
}

impl HistoryExport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Text-in, text-out operations a chat front end calls.
#[derive(Clone)]
pub struct Desk {
    ledger: Arc<Ledger>,
}

impl Desk {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Resolves a chat id against the two configured participants.
    pub fn authorize(&self, chat_id: i64) -> Result<&Participant> {
        self.ledger
            .participant_by_chat_id(chat_id)
            .ok_or(LedgerError::Unauthorized(chat_id))
    }

    /// Records a payment from raw chat input.
    ///
    /// `amount_text` must look like `12` or `12.50`. A blank note or `/skip`
    /// is stored as `-`.
    pub async fn record_payment(
        &self,
        payer_name: &str,
        currency_code: &str,
        amount_text: &str,
        note: &str,
    ) -> Result<Receipt> {
        let amount = Amount::parse(amount_text)?;
        let note = normalize_note(note);
        let payer = self.ledger.participant(payer_name)?;
        let payee = self.ledger.other_participant(payer.id)?;
        let wallet = self.ledger.wallet(currency_code)?;

        let recorded = self
            .ledger
            .record_payment_with_balance(payer_name, currency_code, amount.value(), note)
            .await?;

        // Committed: everything below is formatting and cannot fail.
        let status = balance_text(recorded.balance.as_ref());
        let text = format!(
            "{}\nNew status:\n{}",
            payment_text(&recorded.payment, payer, wallet, false),
            status
        );

        Ok(Receipt {
            payment: recorded.payment,
            confirmation: status,
            notification: Notification {
                chat_id: payee.chat_id,
                text,
            },
        })
    }

    /// `"0"` when settled, otherwise one line per participant, creditor first.
    pub async fn balance(&self, currency_code: &str) -> Result<String> {
        let balance = self.ledger.get_balance(currency_code).await?;
        Ok(balance_text(balance.as_ref()))
    }

    pub async fn history(&self, currency_code: Option<&str>) -> Result<HistoryExport> {
        let payments = self.ledger.list_payments(currency_code).await?;
        let payments = payments
            .iter()
            .map(|payment| -> Result<HistoryEntry> {
                let payer = self.ledger.participant_by_id(payment.payer)?;
                let wallet = self.ledger.wallet_by_id(payment.wallet)?;
                Ok(HistoryEntry {
                    payer: payer.name.clone(),
                    amount: payment.amount.to_string(),
                    currency: wallet.currency_code.clone(),
                    symbol: wallet.display_symbol.clone(),
                    note: payment.note.clone(),
                    timestamp: payment.formatted_timestamp(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(HistoryExport { payments })
    }

    /// The most recent payments across all wallets, formatted for a chat message.
    pub async fn last_payments(&self, count: usize) -> Result<String> {
        let payments = self.ledger.last_payments(count).await?;
        if payments.is_empty() {
            return Ok("No payments registered".to_string());
        }
        let formatted = payments
            .iter()
            .map(|p| self.format_payment(p, true))
            .collect::<Result<Vec<_>>>()?;
        Ok(formatted.join("\n"))
    }

    pub fn format_payment(&self, payment: &Payment, with_date: bool) -> Result<String> {
        let payer = self.ledger.participant_by_id(payment.payer)?;
        let wallet = self.ledger.wallet_by_id(payment.wallet)?;
        Ok(payment_text(payment, payer, wallet, with_date))
    }
}

fn payment_text(payment: &Payment, payer: &Participant, wallet: &Wallet, with_date: bool) -> String {
    let mut text = format!(
        "Payer: {}\nAmount: {} {}\nWallet: {}\nNote: {}\n",
        payer.name, payment.amount, wallet.display_symbol, wallet.currency_code, payment.note
    );
    if with_date {
        text.push_str(&format!("Date: {}\n", payment.formatted_timestamp()));
    }
    text
}

fn balance_text(balance: Option<&WalletBalance>) -> String {
    let Some(balance) = balance else {
        return "0".to_string();
    };
    let symbol = &balance.wallet.display_symbol;
    format!(
        "{}: {} {symbol}\n{}: 0 {symbol}",
        balance.creditor.name,
        format_money(balance.amount),
        balance.debtor.name,
    )
}

pub(crate) fn normalize_note(note: &str) -> &str {
    let note = note.trim();
    if note.is_empty() || note == SKIP_COMMAND {
        EMPTY_NOTE
    } else {
        note
    }
}
