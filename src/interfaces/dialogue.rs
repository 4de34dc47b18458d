//! The multi-step "record a payment" conversation as a typed state machine.
//!
//! Each state carries exactly the fields collected so far. `advance` consumes
//! the dialogue and either continues with the next prompt, hands back a
//! finished [`PaymentDraft`], or reports that the participant cancelled.

use super::desk::{Desk, Receipt, normalize_note};
use crate::application::ledger::Ledger;
use crate::domain::money::Amount;
use crate::error::Result;

pub const CANCEL_COMMAND: &str = "/cancel";
const CANCELLED_TEXT: &str = "Ok, the process is canceled.";

const YES: &str = "Yes";
const NO: &str = "No";

/// A fully collected payment, not yet recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub currency: String,
    pub payer: String,
    pub amount: Amount,
    pub note: String,
}

impl PaymentDraft {
    pub async fn submit(&self, desk: &Desk) -> Result<Receipt> {
        desk.record_payment(&self.payer, &self.currency, &self.amount.to_string(), &self.note)
            .await
    }
}

/// What to show the participant next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    /// Keyboard choices; empty for free text.
    pub choices: Vec<String>,
}

impl Prompt {
    fn free(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    fn choose(text: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            text: text.into(),
            choices,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    ChooseWallet,
    ChoosePayer { currency: String },
    EnterAmount { currency: String, payer: String },
    EnterNote { currency: String, payer: String, amount: Amount },
    Confirm(PaymentDraft),
}

#[derive(Debug)]
pub enum Transition {
    Continue(PaymentDialogue, Prompt),
    Submit(PaymentDraft),
    Cancelled(Prompt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDialogue {
    state: State,
}

impl PaymentDialogue {
    pub fn start(ledger: &Ledger) -> (Self, Prompt) {
        (
            Self {
                state: State::ChooseWallet,
            },
            wallet_prompt(ledger),
        )
    }

    pub fn advance(self, ledger: &Ledger, input: &str) -> Transition {
        let input = input.trim();
        if input == CANCEL_COMMAND {
            return cancelled();
        }

        match self.state {
            State::ChooseWallet => match ledger.wallet(input) {
                Ok(wallet) => continue_with(
                    State::ChoosePayer {
                        currency: wallet.currency_code.clone(),
                    },
                    payer_prompt(ledger),
                ),
                Err(_) => continue_with(State::ChooseWallet, wallet_prompt(ledger)),
            },
            State::ChoosePayer { currency } => match ledger.participant(input) {
                Ok(payer) => {
                    let prompt = Prompt::free(format!("Ok.\nHow many {currency}s?"));
                    continue_with(
                        State::EnterAmount {
                            currency,
                            payer: payer.name.clone(),
                        },
                        prompt,
                    )
                }
                Err(_) => continue_with(State::ChoosePayer { currency }, payer_prompt(ledger)),
            },
            State::EnterAmount { currency, payer } => match Amount::parse(input) {
                Ok(amount) => continue_with(
                    State::EnterNote {
                        currency,
                        payer,
                        amount,
                    },
                    Prompt::free("Ok.\nDo you have a note for this payment? If not, enter /skip ."),
                ),
                Err(_) => {
                    let prompt = Prompt::free(format!(
                        "Please enter the amount as a number like 12 or 12.50.\nHow many {currency}s?"
                    ));
                    continue_with(State::EnterAmount { currency, payer }, prompt)
                }
            },
            State::EnterNote {
                currency,
                payer,
                amount,
            } => {
                let draft = PaymentDraft {
                    currency,
                    payer,
                    amount,
                    note: normalize_note(input).to_string(),
                };
                let prompt = confirm_prompt(ledger, &draft);
                continue_with(State::Confirm(draft), prompt)
            }
            State::Confirm(draft) => match input {
                YES => Transition::Submit(draft),
                NO => cancelled(),
                _ => {
                    let prompt = confirm_prompt(ledger, &draft);
                    continue_with(State::Confirm(draft), prompt)
                }
            },
        }
    }
}

fn continue_with(state: State, prompt: Prompt) -> Transition {
    Transition::Continue(PaymentDialogue { state }, prompt)
}

fn cancelled() -> Transition {
    Transition::Cancelled(Prompt::free(CANCELLED_TEXT))
}

fn wallet_prompt(ledger: &Ledger) -> Prompt {
    Prompt::choose(
        "Which wallet do you want to change?",
        ledger.wallets().iter().map(|w| w.currency_code.clone()).collect(),
    )
}

fn payer_prompt(ledger: &Ledger) -> Prompt {
    Prompt::choose(
        "Who did the payment?",
        ledger.participants().iter().map(|p| p.name.clone()).collect(),
    )
}

fn confirm_prompt(ledger: &Ledger, draft: &PaymentDraft) -> Prompt {
    let symbol = ledger
        .wallet(&draft.currency)
        .map(|w| w.display_symbol.as_str())
        .unwrap_or_default();
    Prompt::choose(
        format!(
            "Do you confirm the following payment?\nPayer: {}\nAmount: {} {}\nWallet: {}\nNote: {}\n",
            draft.payer, draft.amount, symbol, draft.currency, draft.note
        ),
        vec![YES.to_string(), NO.to_string()],
    )
}
