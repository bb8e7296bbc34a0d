use super::item::{Ledger, LedgerItem, Price};
use super::payment::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of a settled transaction.
///
/// Built from the ledger as it stood just before it was cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub station_id: String,
    pub items: Vec<LedgerItem>,
    pub total: Price,
    pub method: String,
    pub change: Option<Price>,
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    pub fn from_ledger(
        station_id: &str,
        ledger: &Ledger,
        method: &PaymentMethod,
        change: Option<Price>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            station_id: station_id.to_string(),
            items: ledger.items().to_vec(),
            total: ledger.total(),
            method: method.name().to_string(),
            change,
            issued_at: Utc::now(),
        }
    }
}
