use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use selfcheckout::application::commands::CommandOutcome;
use selfcheckout::application::coordinator::TransactionCoordinator;
use selfcheckout::config::EngineConfig;
use selfcheckout::domain::item::Weight;
use selfcheckout::domain::ports::{ReceiptSinkBox, SnapshotStoreBox};
use selfcheckout::infrastructure::card::SimulatedGateway;
use selfcheckout::infrastructure::in_memory::InMemorySnapshotStore;
use selfcheckout::infrastructure::receipts::{JsonLinesReceiptSink, LogReceiptSink};
use selfcheckout::infrastructure::registry::StationRegistry;
#[cfg(feature = "storage-rocksdb")]
use selfcheckout::infrastructure::rocksdb::RocksDBStore;
use selfcheckout::interfaces::csv::command_reader::CommandReader;
use selfcheckout::interfaces::csv::station_reader::StationReader;
use selfcheckout::interfaces::csv::station_writer::StationWriter;
use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Station configuration CSV file
    stations: PathBuf,

    /// Command script CSV file. Reads commands from stdin when omitted.
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Allowed gap in kg between scale reading and ledger weight
    #[arg(long, default_value = "0.05")]
    weight_tolerance: Decimal,

    /// Card authorization timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    card_timeout_ms: u64,

    /// Share of simulated card payments that are approved (0.0 to 1.0)
    #[arg(long, default_value_t = 0.9)]
    card_approval_rate: f64,

    /// Seed for the simulated card gateway
    #[arg(long)]
    card_seed: Option<u64>,

    /// Write receipts as JSON lines to this file instead of logging them
    #[arg(long)]
    receipts: Option<PathBuf>,

    /// Path to persistent station snapshots (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_snapshot_store(db_path: Option<PathBuf>) -> Result<SnapshotStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemorySnapshotStore::new()))
        }
        None => Ok(Box::new(InMemorySnapshotStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = EngineConfig::default()
        .with_tolerance(Weight::new(cli.weight_tolerance).into_diagnostic()?)
        .with_card_timeout(Duration::from_millis(cli.card_timeout_ms));

    let snapshots = open_snapshot_store(cli.db_path)?;

    // A stored snapshot of the same id takes precedence over configuration
    // so in-flight transactions survive restarts.
    let stations = StationReader::new(File::open(&cli.stations).into_diagnostic()?).load();
    let registry = StationRegistry::restore(stations, snapshots.as_ref()).await;
    info!(stations = registry.len().await, "station registry loaded");

    let authorizer = SimulatedGateway::new(cli.card_approval_rate, cli.card_seed).into_diagnostic()?;
    let receipts: ReceiptSinkBox = match cli.receipts {
        Some(path) => Box::new(JsonLinesReceiptSink::new(BufWriter::new(
            File::create(path).into_diagnostic()?,
        ))),
        None => Box::new(LogReceiptSink),
    };

    let engine = TransactionCoordinator::new(registry, Box::new(authorizer), receipts, config);

    let source: Box<dyn Read> = match cli.commands {
        Some(path) => Box::new(File::open(path).into_diagnostic()?),
        None => Box::new(io::stdin()),
    };
    for command in CommandReader::new(source).commands() {
        match command {
            Ok(command) => match engine.execute(command).await {
                Ok(CommandOutcome::Station(view)) => {
                    info!(view = %serde_json::to_string(&view).into_diagnostic()?, "station view");
                }
                Ok(CommandOutcome::Alerts(views)) => {
                    info!(alerts = views.len(), "stations needing assistance");
                    for view in views {
                        info!(station_id = %view.id, state = %view.transaction_state, "alert");
                    }
                }
                Ok(outcome) => info!(?outcome, "command completed"),
                Err(e) => error!("Error processing command: {}", e),
            },
            Err(e) => error!("Error reading command: {}", e),
        }
    }

    let final_state = engine.registry().snapshot().await;
    for station in final_state {
        snapshots.store(station).await.into_diagnostic()?;
    }

    // Output final state
    let stdout = io::stdout();
    let mut writer = StationWriter::new(stdout.lock());
    writer
        .write_stations(engine.stations().await)
        .into_diagnostic()?;

    Ok(())
}
