//! Glue a chat front end (or the CLI) uses to talk to the ledger.

pub mod csv;
pub mod desk;
pub mod dialogue;
