//! Application layer orchestrating the ledger.
//!
//! `Ledger` validates references, serializes writers behind one async lock and
//! feeds each payment through the balance engine before committing it to the
//! storage port.

pub mod ledger;
