#![allow(dead_code)]

use rust_decimal::Decimal;
use selfcheckout::application::coordinator::TransactionCoordinator;
use selfcheckout::config::EngineConfig;
use selfcheckout::domain::item::{LedgerItem, Price, Weight};
use selfcheckout::domain::station::{CashLevel, OperationalStatus, Station};
use selfcheckout::infrastructure::card::ScriptedAuthorizer;
use selfcheckout::infrastructure::receipts::InMemoryReceiptSink;
use selfcheckout::infrastructure::registry::StationRegistry;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub const STATION_HEADER: &str =
    "id,operational_status,transaction_state,needs_assistance,cash_level,total";

pub fn price(value: Decimal) -> Price {
    Price::new(value).unwrap()
}

pub fn kg(value: Decimal) -> Weight {
    Weight::new(value).unwrap()
}

pub fn item(name: &str, unit_price: Decimal, unit_weight: Decimal) -> LedgerItem {
    LedgerItem::new(name, price(unit_price), kg(unit_weight)).unwrap()
}

pub fn active(id: &str) -> Station {
    Station::new(id, OperationalStatus::Active, CashLevel::Normal)
}

pub fn engine(stations: Vec<Station>) -> (TransactionCoordinator, InMemoryReceiptSink) {
    engine_with(stations, ScriptedAuthorizer::approving())
}

pub fn engine_with(
    stations: Vec<Station>,
    authorizer: ScriptedAuthorizer,
) -> (TransactionCoordinator, InMemoryReceiptSink) {
    let sink = InMemoryReceiptSink::new();
    let coordinator = TransactionCoordinator::new(
        StationRegistry::from_stations(stations),
        Box::new(authorizer),
        Box::new(sink.clone()),
        EngineConfig::default(),
    );
    (coordinator, sink)
}

/// Writes a station table with the given `id,status,cash_level` rows.
pub fn station_file(rows: &[(&str, &str, &str)]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{}", STATION_HEADER)?;
    for (id, status, cash) in rows {
        writeln!(file, "{},{},Idle,false,{},0", id, status, cash)?;
    }
    Ok(file)
}

pub fn command_file(lines: &[&str]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(file)
}
