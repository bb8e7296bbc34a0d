use super::item::{Ledger, LedgerItem};
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a kiosk may start new transactions.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OperationalStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Where the kiosk's current transaction stands.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    #[default]
    Idle,
    InProgress,
    AgeVerification,
    WeightMismatch,
    PaymentError,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum CashLevel {
    Low,
    #[default]
    Normal,
}

impl TransactionState {
    /// Alert states block the customer until a supervisor acts.
    pub fn is_alert(self) -> bool {
        matches!(
            self,
            TransactionState::AgeVerification
                | TransactionState::WeightMismatch
                | TransactionState::PaymentError
        )
    }
}

// Accepts "InProgress", "in_progress", "in progress" and friends.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for OperationalStatus {
    type Err = CheckoutError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "active" => Ok(OperationalStatus::Active),
            "inactive" => Ok(OperationalStatus::Inactive),
            "maintenance" => Ok(OperationalStatus::Maintenance),
            _ => Err(CheckoutError::Validation(format!(
                "unknown operational status '{}'",
                s
            ))),
        }
    }
}

impl FromStr for TransactionState {
    type Err = CheckoutError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "idle" => Ok(TransactionState::Idle),
            "inprogress" => Ok(TransactionState::InProgress),
            "ageverification" => Ok(TransactionState::AgeVerification),
            "weightmismatch" => Ok(TransactionState::WeightMismatch),
            "paymenterror" => Ok(TransactionState::PaymentError),
            _ => Err(CheckoutError::Validation(format!(
                "unknown transaction state '{}'",
                s
            ))),
        }
    }
}

impl FromStr for CashLevel {
    type Err = CheckoutError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(CashLevel::Low),
            "normal" => Ok(CashLevel::Normal),
            _ => Err(CheckoutError::Validation(format!(
                "unknown cash level '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationalStatus::Active => "Active",
            OperationalStatus::Inactive => "Inactive",
            OperationalStatus::Maintenance => "Maintenance",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionState::Idle => "Idle",
            TransactionState::InProgress => "InProgress",
            TransactionState::AgeVerification => "AgeVerification",
            TransactionState::WeightMismatch => "WeightMismatch",
            TransactionState::PaymentError => "PaymentError",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashLevel::Low => f.write_str("Low"),
            CashLevel::Normal => f.write_str("Normal"),
        }
    }
}

/// One self-checkout kiosk and its in-flight transaction.
///
/// Fields are private so that only the coordinator, through the
/// crate-visible transition methods below, can move a station between
/// states. The assistance flag is not stored: it is derived from
/// `transaction_state` on every read.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Station {
    id: String,
    operational_status: OperationalStatus,
    transaction_state: TransactionState,
    cash_level: CashLevel,
    ledger: Ledger,
}

impl Station {
    /// A station with no transaction in flight.
    pub fn new(id: impl Into<String>, status: OperationalStatus, cash_level: CashLevel) -> Self {
        Self {
            id: id.into(),
            operational_status: status,
            transaction_state: TransactionState::Idle,
            cash_level,
            ledger: Ledger::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn operational_status(&self) -> OperationalStatus {
        self.operational_status
    }

    pub fn transaction_state(&self) -> TransactionState {
        self.transaction_state
    }

    pub fn cash_level(&self) -> CashLevel {
        self.cash_level
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn needs_assistance(&self) -> bool {
        self.transaction_state.is_alert()
    }

    /// Checks the ledger/state invariant: items exist only while a transaction does.
    pub fn is_consistent(&self) -> bool {
        self.ledger.is_empty() || self.transaction_state != TransactionState::Idle
    }

    /// Rejects a station that could not have been produced by the
    /// coordinator: a blank id, a blank item name, or items while `Idle`.
    ///
    /// Prices and weights are already checked when they are deserialized.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CheckoutError::Validation(
                "station id must not be empty".to_string(),
            ));
        }
        if self.ledger.items().iter().any(|item| item.name.trim().is_empty()) {
            return Err(CheckoutError::Validation(format!(
                "station {} has an item without a name",
                self.id
            )));
        }
        if !self.is_consistent() {
            return Err(CheckoutError::Validation(format!(
                "station {} is {} but holds {} items",
                self.id,
                self.transaction_state,
                self.ledger.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn set_operational_status(&mut self, status: OperationalStatus) {
        self.operational_status = status;
    }

    pub(crate) fn enter(&mut self, state: TransactionState) {
        self.transaction_state = state;
    }

    pub(crate) fn append(&mut self, item: LedgerItem) {
        self.ledger.push(item);
    }

    /// Returns the station to `Idle`, handing back whatever was on the ledger.
    pub(crate) fn clear_transaction(&mut self) -> Ledger {
        self.transaction_state = TransactionState::Idle;
        self.ledger.take()
    }

    /// Puts a transferred ledger on this station and opens a transaction for it.
    pub(crate) fn receive(&mut self, ledger: Ledger) {
        self.ledger = ledger;
        self.transaction_state = TransactionState::InProgress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::{Price, Weight};
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_status_strings() {
        assert_eq!(
            "Active".parse::<OperationalStatus>().unwrap(),
            OperationalStatus::Active
        );
        assert_eq!(
            " maintenance".trim().parse::<OperationalStatus>().unwrap(),
            OperationalStatus::Maintenance
        );
        assert_eq!(
            "AgeVerification".parse::<TransactionState>().unwrap(),
            TransactionState::AgeVerification
        );
        assert_eq!(
            "in_progress".parse::<TransactionState>().unwrap(),
            TransactionState::InProgress
        );
        assert_eq!("LOW".parse::<CashLevel>().unwrap(), CashLevel::Low);
        assert!("Broken".parse::<OperationalStatus>().is_err());
    }

    #[test]
    fn test_needs_assistance_follows_state() {
        let mut station = Station::new("S1", OperationalStatus::Active, CashLevel::Normal);
        assert!(!station.needs_assistance());

        for state in [
            TransactionState::AgeVerification,
            TransactionState::WeightMismatch,
            TransactionState::PaymentError,
        ] {
            station.enter(state);
            assert!(station.needs_assistance());
        }

        station.enter(TransactionState::InProgress);
        assert!(!station.needs_assistance());
    }

    #[test]
    fn test_clear_transaction_returns_ledger() {
        let mut station = Station::new("S1", OperationalStatus::Active, CashLevel::Normal);
        station.enter(TransactionState::InProgress);
        station.append(
            LedgerItem::new(
                "Milk",
                Price::new(dec!(3.99)).unwrap(),
                Weight::new(dec!(1.0)).unwrap(),
            )
            .unwrap(),
        );

        let ledger = station.clear_transaction();
        assert_eq!(ledger.len(), 1);
        assert!(station.ledger().is_empty());
        assert_eq!(station.transaction_state(), TransactionState::Idle);
        assert!(station.is_consistent());
    }

    #[test]
    fn test_validate_rejects_corrupt_stations() {
        let idle_with_items = r#"{"id":"S1","operational_status":"active","transaction_state":"idle","cash_level":"normal","ledger":{"items":[{"name":"Milk","unit_price":"3.99","unit_weight":"1.0"}]}}"#;
        let station: Station = serde_json::from_str(idle_with_items).unwrap();
        assert!(matches!(station.validate(), Err(CheckoutError::Validation(_))));

        let blank_name = r#"{"id":"S1","operational_status":"active","transaction_state":"in_progress","cash_level":"normal","ledger":{"items":[{"name":" ","unit_price":"3.99","unit_weight":"1.0"}]}}"#;
        let station: Station = serde_json::from_str(blank_name).unwrap();
        assert!(matches!(station.validate(), Err(CheckoutError::Validation(_))));

        let negative_price = r#"{"id":"S1","operational_status":"active","transaction_state":"in_progress","cash_level":"normal","ledger":{"items":[{"name":"Milk","unit_price":"-5.00","unit_weight":"-1"}]}}"#;
        assert!(serde_json::from_str::<Station>(negative_price).is_err());

        let fresh = Station::new("S2", OperationalStatus::Active, CashLevel::Normal);
        assert!(fresh.validate().is_ok());
    }

    #[test]
    fn test_station_serde_roundtrip_keeps_ledger() {
        let mut station = Station::new("S9", OperationalStatus::Maintenance, CashLevel::Low);
        station.receive(
            [LedgerItem::new("Tea", Price::new(dec!(2.10)).unwrap(), Weight::ZERO).unwrap()]
                .into_iter()
                .collect(),
        );

        let json = serde_json::to_string(&station).unwrap();
        assert!(json.contains("\"in_progress\""));
        let back: Station = serde_json::from_str(&json).unwrap();
        assert_eq!(back, station);
    }
}
