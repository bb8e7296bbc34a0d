use crate::domain::item::Price;
use crate::domain::station::{OperationalStatus, TransactionState};
use std::fmt;
use thiserror::Error;

/// Why a card payment did not settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    /// The authorizer answered with a decline.
    Declined,
    /// The authorizer did not answer in time, or failed while answering.
    TimedOut,
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::Declined => write!(f, "declined"),
            DeclineReason::TimedOut => write!(f, "timed out"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Station not found: {0}")]
    StationNotFound(String),
    #[error("Station {station_id} is {status}, cannot start a transaction")]
    StationNotActive {
        station_id: String,
        status: OperationalStatus,
    },
    #[error("Target station {station_id} is {status}, cannot receive a transfer")]
    TargetNotActive {
        station_id: String,
        status: OperationalStatus,
    },
    #[error("Station {station_id} already has a transaction in state {state}")]
    TransactionAlreadyInProgress {
        station_id: String,
        state: TransactionState,
    },
    #[error("Station {station_id} is {state}, cannot {operation}")]
    InvalidState {
        station_id: String,
        state: TransactionState,
        operation: &'static str,
    },
    #[error("Insufficient funds at {station_id}: due {due}, tendered {tendered}")]
    InsufficientFunds {
        station_id: String,
        due: Price,
        tendered: Price,
    },
    #[error("Card payment at {station_id} {reason}")]
    CardDeclined {
        station_id: String,
        reason: DeclineReason,
    },
    #[error("Station {0} has no items to transfer")]
    SourceEmpty(String),
    #[error("Cannot transfer station {0} onto itself")]
    TransferToSelf(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Parse error on record {line}: {reason}")]
    Parse { line: u64, reason: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for CheckoutError {
    fn from(err: rocksdb::Error) -> Self {
        CheckoutError::Internal(Box::new(err))
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Internal(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
