use clap::{Parser, Subcommand, ValueEnum};
use duo_ledger::application::ledger::Ledger;
use duo_ledger::config::Config;
use duo_ledger::domain::ports::LedgerStoreBox;
use duo_ledger::infrastructure::in_memory::InMemoryLedgerStore;
#[cfg(feature = "storage-rocksdb")]
use duo_ledger::infrastructure::rocksdb::RocksDbLedgerStore;
use duo_ledger::interfaces::csv::history_writer::HistoryWriter;
use duo_ledger::interfaces::csv::payment_reader::PaymentReader;
use duo_ledger::interfaces::desk::Desk;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with the two participants and their wallets
    #[arg(long, env = "DUO_LEDGER_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "DUO_LEDGER_DB_PATH")]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record every payment of a CSV file (payer, wallet, amount, note), then print all balances
    Import { input: PathBuf },
    /// Record a single payment
    Pay {
        #[arg(long)]
        payer: String,
        #[arg(long)]
        wallet: String,
        /// Amount such as 12 or 12.50
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Show who owes whom, for one wallet or all of them
    Balance { wallet: Option<String> },
    /// Export the payment history
    History {
        #[arg(long)]
        wallet: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the most recent payments across all wallets
    Last {
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let store = open_store(cli.db_path)?;
    let ledger = Ledger::initialize(store, &config.users, &config.wallets).await?;
    let desk = Desk::new(Arc::new(ledger));

    match cli.command {
        Command::Import { input } => {
            let file = File::open(input).into_diagnostic()?;
            for row in PaymentReader::new(file).payments() {
                match row {
                    Ok(row) => {
                        let note = row.note.as_deref().unwrap_or_default();
                        if let Err(e) = desk
                            .record_payment(&row.payer, &row.wallet, &row.amount, note)
                            .await
                        {
                            tracing::warn!("Error recording payment: {}", e);
                        }
                    }
                    Err(e) => tracing::warn!("Error reading payment: {}", e),
                }
            }
            print_all_balances(&desk).await?;
        }
        Command::Pay {
            payer,
            wallet,
            amount,
            note,
        } => {
            let receipt = desk.record_payment(&payer, &wallet, &amount, &note).await?;
            tracing::debug!(
                chat_id = receipt.notification.chat_id,
                text = %receipt.notification.text,
                "notification for the other participant"
            );
            println!("{}", receipt.confirmation);
        }
        Command::Balance { wallet: Some(wallet) } => {
            println!("{}", desk.balance(&wallet).await?);
        }
        Command::Balance { wallet: None } => print_all_balances(&desk).await?,
        Command::History {
            wallet,
            format,
            output,
        } => {
            let history = desk.history(wallet.as_deref()).await?;
            let sink: Box<dyn Write> = match output {
                Some(path) => Box::new(File::create(path).into_diagnostic()?),
                None => Box::new(io::stdout().lock()),
            };
            match format {
                Format::Json => {
                    let mut sink = sink;
                    writeln!(sink, "{}", history.to_json()?).into_diagnostic()?;
                }
                Format::Csv => HistoryWriter::new(sink).write_history(&history)?,
            }
        }
        Command::Last { count } => println!("{}", desk.last_payments(count).await?),
    }

    Ok(())
}

async fn print_all_balances(desk: &Desk) -> Result<()> {
    for wallet in desk.ledger().wallets() {
        println!("[{}]", wallet.currency_code);
        println!("{}", desk.balance(&wallet.currency_code).await?);
    }
    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    match db_path {
        Some(path) => Ok(Box::new(RocksDbLedgerStore::open(path)?)),
        None => Ok(Box::new(InMemoryLedgerStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(Box::new(InMemoryLedgerStore::new()))
}
