//! Flat-file adapters: station configuration in and out, command scripts in.

pub mod command_reader;
pub mod station_reader;
pub mod station_writer;

/// Column order shared by the station reader and writer.
pub const STATION_HEADER: [&str; 6] = [
    "id",
    "operational_status",
    "transaction_state",
    "needs_assistance",
    "cash_level",
    "total",
];
