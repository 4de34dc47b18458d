use crate::error::Result;
use crate::interfaces::desk::HistoryExport;
use std::io::Write;

/// Writes an exported payment history as CSV, one payment per row.
pub struct HistoryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> HistoryWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_history(&mut self, history: &HistoryExport) -> Result<()> {
        if history.payments.is_empty() {
            self.writer
                .write_record(["payer", "amount", "currency", "symbol", "note", "timestamp"])?;
        }
        for entry in &history.payments {
            self.writer.serialize(entry)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
