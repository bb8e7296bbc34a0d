use crate::application::coordinator::StationView;
use crate::error::{CheckoutError, Result};
use std::io::Write;

use super::STATION_HEADER;

/// Writes station state in the same six-field layout the reader accepts.
pub struct StationWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> StationWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_stations(&mut self, stations: impl IntoIterator<Item = StationView>) -> Result<()> {
        self.writer.write_record(STATION_HEADER)?;
        for station in stations {
            self.writer.write_record([
                station.id,
                station.operational_status.to_string(),
                station.transaction_state.to_string(),
                station.needs_assistance.to_string(),
                station.cash_level.to_string(),
                station.total.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| CheckoutError::Io(e.into_error()))
    }
}
