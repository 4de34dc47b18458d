use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::io::Read;

/// One payment as written in an import file: `payer, wallet, amount, note`.
///
/// The amount stays text so it goes through the same validation as chat input.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct PaymentRow {
    pub payer: String,
    pub wallet: String,
    pub amount: String,
    #[serde(default)]
    pub note: Option<String>,
}

/// Reads payments from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<PaymentRow>`.
/// It handles whitespace trimming and a missing trailing note column.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a new `PaymentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes payment rows.
    pub fn payments(self) -> impl Iterator<Item = Result<PaymentRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
