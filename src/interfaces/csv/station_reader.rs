use crate::domain::station::{CashLevel, OperationalStatus, Station, TransactionState};
use crate::error::{CheckoutError, Result};
use csv::StringRecord;
use std::io::Read;
use tracing::{debug, warn};

use super::STATION_HEADER;

/// Reads the station configuration table.
///
/// Records carry six fields (see [`STATION_HEADER`]). The assistance flag
/// and the total are derived values and are ignored on load. Blank records
/// are skipped silently; short or unparseable ones are reported.
pub struct StationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> StationReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily parses each non-blank record.
    pub fn stations(self) -> impl Iterator<Item = Result<Station>> {
        self.reader.into_records().filter_map(|record| match record {
            Ok(record) if record.iter().all(str::is_empty) => None,
            Ok(record) => Some(parse_station(&record)),
            Err(e) => Some(Err(CheckoutError::from(e))),
        })
    }

    /// Collects every valid station, logging and skipping the rest.
    pub fn load(self) -> Vec<Station> {
        self.stations()
            .filter_map(|result| match result {
                Ok(station) => Some(station),
                Err(e) => {
                    warn!(error = %e, "skipping station record");
                    None
                }
            })
            .collect()
    }
}

fn parse_station(record: &StringRecord) -> Result<Station> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    if record.len() < STATION_HEADER.len() {
        return Err(CheckoutError::Parse {
            line,
            reason: format!(
                "expected {} fields, found {}",
                STATION_HEADER.len(),
                record.len()
            ),
        });
    }

    let parse_err = |e: CheckoutError| CheckoutError::Parse {
        line,
        reason: e.to_string(),
    };

    let id = &record[0];
    if id.is_empty() {
        return Err(CheckoutError::Parse {
            line,
            reason: "station id is empty".to_string(),
        });
    }
    let status: OperationalStatus = record[1].parse().map_err(parse_err)?;
    let state: TransactionState = record[2].parse().map_err(parse_err)?;
    let cash_level: CashLevel = record[4].parse().map_err(parse_err)?;

    // The ledger is never part of the configuration, so a station always
    // starts without an open transaction.
    if state != TransactionState::Idle {
        warn!(station_id = %id, %state, "configured transaction state ignored, station starts Idle");
    }
    debug!(station_id = %id, %status, %cash_level, "station loaded");
    Ok(Station::new(id, status, cash_level))
}
