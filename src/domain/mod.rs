//! Ledger vocabulary: participants, wallets, payments, balances and the
//! storage port the application layer talks to.

pub mod balance;
pub mod money;
pub mod participant;
pub mod payment;
pub mod ports;
