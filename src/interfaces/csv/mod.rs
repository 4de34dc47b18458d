pub mod history_writer;
pub mod payment_reader;
