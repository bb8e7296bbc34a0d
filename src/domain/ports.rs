use super::item::Price;
use super::payment::CardOutcome;
use super::receipt::Receipt;
use super::station::Station;
use crate::error::Result;
use async_trait::async_trait;

/// Decides whether a card payment goes through.
///
/// Production wires a gateway here; tests use a fixed script.
#[async_trait]
pub trait CardAuthorizer: Send + Sync {
    async fn authorize(&self, amount: Price, card_ref: &str) -> Result<CardOutcome>;
}

/// Receives a receipt for every settled transaction.
#[async_trait]
pub trait ReceiptSink: Send + Sync {
    async fn emit(&self, receipt: Receipt) -> Result<()>;
}

/// Keeps station state across process restarts.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn store(&self, station: Station) -> Result<()>;
    async fn get(&self, station_id: &str) -> Result<Option<Station>>;
}

pub type CardAuthorizerBox = Box<dyn CardAuthorizer>;
pub type ReceiptSinkBox = Box<dyn ReceiptSink>;
pub type SnapshotStoreBox = Box<dyn SnapshotStore>;
