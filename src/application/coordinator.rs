use crate::config::EngineConfig;
use crate::domain::item::{LedgerItem, Price, Weight};
use crate::domain::payment::{CardOutcome, PaymentMethod, settle_cash};
use crate::domain::ports::{CardAuthorizerBox, ReceiptSinkBox};
use crate::domain::receipt::Receipt;
use crate::domain::station::{CashLevel, OperationalStatus, Station, TransactionState};
use crate::domain::weight::{self, WeightCheck};
use crate::error::{CheckoutError, DeclineReason, Result};
use crate::infrastructure::registry::StationRegistry;
use serde::Serialize;
use tracing::{error, info, warn};

/// Result of scanning one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub check: WeightCheck,
    pub item_count: usize,
    pub total: Price,
}

/// Whether a supervisor decision let the customer continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resumed,
    Blocked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub receipt: Receipt,
    pub change: Option<Price>,
    /// Set when the kiosk is running low on cash; informational only.
    pub cash_level_low: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub moved: usize,
    pub total: Price,
}

/// Read-only view of a station, as shown to staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationView {
    pub id: String,
    pub operational_status: OperationalStatus,
    pub transaction_state: TransactionState,
    pub needs_assistance: bool,
    pub cash_level: CashLevel,
    pub items: Vec<LedgerItem>,
    pub total: Price,
    pub total_weight: Weight,
}

impl From<&Station> for StationView {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id().to_string(),
            operational_status: station.operational_status(),
            transaction_state: station.transaction_state(),
            needs_assistance: station.needs_assistance(),
            cash_level: station.cash_level(),
            items: station.ledger().items().to_vec(),
            total: station.ledger().total(),
            total_weight: station.ledger().total_weight(),
        }
    }
}

/// Drives the per-station transaction state machine.
///
/// This is the only component that changes a `Station`. Every operation
/// holds the station's lock for its whole duration, so operations on one
/// kiosk are serialized while different kiosks proceed in parallel.
pub struct TransactionCoordinator {
    registry: StationRegistry,
    authorizer: CardAuthorizerBox,
    receipts: ReceiptSinkBox,
    config: EngineConfig,
}

fn invalid_state(station: &Station, operation: &'static str) -> CheckoutError {
    CheckoutError::InvalidState {
        station_id: station.id().to_string(),
        state: station.transaction_state(),
        operation,
    }
}

fn require_state(
    station: &Station,
    expected: TransactionState,
    operation: &'static str,
) -> Result<()> {
    if station.transaction_state() == expected {
        Ok(())
    } else {
        Err(invalid_state(station, operation))
    }
}

impl TransactionCoordinator {
    pub fn new(
        registry: StationRegistry,
        authorizer: CardAuthorizerBox,
        receipts: ReceiptSinkBox,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            authorizer,
            receipts,
            config,
        }
    }

    pub fn registry(&self) -> &StationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs `f` against one station while holding its lock.
    async fn with_station<T>(
        &self,
        station_id: &str,
        f: impl FnOnce(&mut Station) -> Result<T>,
    ) -> Result<T> {
        let handle = self.registry.find_by_id(station_id).await?;
        let mut station = handle.lock().await;
        let result = f(&mut station);
        debug_assert!(station.is_consistent());
        result
    }

    pub async fn start_transaction(&self, station_id: &str) -> Result<()> {
        self.with_station(station_id, |station| {
            if station.operational_status() != OperationalStatus::Active {
                return Err(CheckoutError::StationNotActive {
                    station_id: station.id().to_string(),
                    status: station.operational_status(),
                });
            }
            if station.transaction_state() != TransactionState::Idle {
                return Err(CheckoutError::TransactionAlreadyInProgress {
                    station_id: station.id().to_string(),
                    state: station.transaction_state(),
                });
            }
            station.enter(TransactionState::InProgress);
            info!(station_id = %station.id(), "transaction started");
            Ok(())
        })
        .await
    }

    /// Adds an item and checks the bagging-area scale.
    ///
    /// A failed weight check never drops the item: it is already in the
    /// bagging area, so it stays on the ledger and the station raises an alert.
    pub async fn scan_item(
        &self,
        station_id: &str,
        item: LedgerItem,
        scale_reading: Weight,
    ) -> Result<ScanOutcome> {
        let tolerance = self.config.weight_tolerance;
        self.with_station(station_id, |station| {
            require_state(station, TransactionState::InProgress, "scan an item")?;

            let name = item.name.clone();
            station.append(item);

            let expected = station.ledger().total_weight();
            let check = weight::verify(expected, scale_reading, tolerance);
            if check == WeightCheck::Mismatch {
                station.enter(TransactionState::WeightMismatch);
                warn!(
                    station_id = %station.id(),
                    item = %name,
                    %expected,
                    reading = %scale_reading,
                    "weight mismatch, assistance required"
                );
            } else {
                info!(station_id = %station.id(), item = %name, "item scanned");
            }

            Ok(ScanOutcome {
                check,
                item_count: station.ledger().len(),
                total: station.ledger().total(),
            })
        })
        .await
    }

    pub async fn flag_age_restricted(&self, station_id: &str) -> Result<()> {
        self.with_station(station_id, |station| {
            require_state(station, TransactionState::InProgress, "request an age check")?;
            station.enter(TransactionState::AgeVerification);
            warn!(station_id = %station.id(), "age verification required");
            Ok(())
        })
        .await
    }

    /// Records the attendant's age check. A refusal leaves the station blocked.
    pub async fn verify_age(&self, station_id: &str, approved: bool) -> Result<Resolution> {
        self.with_station(station_id, |station| {
            require_state(station, TransactionState::AgeVerification, "verify age")?;
            Ok(Self::resume_if(station, approved, "age check"))
        })
        .await
    }

    pub async fn resolve_weight_mismatch(
        &self,
        station_id: &str,
        approved: bool,
    ) -> Result<Resolution> {
        self.with_station(station_id, |station| {
            require_state(
                station,
                TransactionState::WeightMismatch,
                "resolve a weight mismatch",
            )?;
            Ok(Self::resume_if(station, approved, "weight mismatch"))
        })
        .await
    }

    fn resume_if(station: &mut Station, approved: bool, alert: &'static str) -> Resolution {
        if approved {
            station.enter(TransactionState::InProgress);
            info!(station_id = %station.id(), alert, "alert resolved");
            Resolution::Resumed
        } else {
            info!(station_id = %station.id(), alert, "alert not approved, station stays blocked");
            Resolution::Blocked
        }
    }

    /// Settles the current transaction.
    ///
    /// Cash short of the total leaves the transaction untouched. A declined
    /// card, an authorizer error or an authorization that outlives
    /// `card_timeout` all land the station in `PaymentError` with the
    /// ledger intact.
    pub async fn pay(&self, station_id: &str, method: PaymentMethod) -> Result<PaymentOutcome> {
        let handle = self.registry.find_by_id(station_id).await?;
        let mut station = handle.lock().await;
        require_state(&station, TransactionState::InProgress, "take payment")?;

        let due = station.ledger().total();
        let change = match &method {
            PaymentMethod::Cash { tendered } => {
                let settlement = settle_cash(due, *tendered);
                if !settlement.success {
                    info!(station_id = %station.id(), %due, %tendered, "cash tendered is short");
                    return Err(CheckoutError::InsufficientFunds {
                        station_id: station.id().to_string(),
                        due,
                        tendered: *tendered,
                    });
                }
                settlement.change
            }
            PaymentMethod::Card { card_ref } => {
                let answer = tokio::time::timeout(
                    self.config.card_timeout,
                    self.authorizer.authorize(due, card_ref),
                )
                .await;
                let reason = match answer {
                    Ok(Ok(CardOutcome::Approved)) => None,
                    Ok(Ok(CardOutcome::Declined)) => Some(DeclineReason::Declined),
                    Ok(Err(e)) => {
                        warn!(station_id = %station.id(), error = %e, "card authorizer failed");
                        Some(DeclineReason::TimedOut)
                    }
                    Err(_) => Some(DeclineReason::TimedOut),
                };
                if let Some(reason) = reason {
                    station.enter(TransactionState::PaymentError);
                    warn!(station_id = %station.id(), %due, %reason, "card payment failed, assistance required");
                    return Err(CheckoutError::CardDeclined {
                        station_id: station.id().to_string(),
                        reason,
                    });
                }
                None
            }
        };

        let cash_level_low = station.cash_level() == CashLevel::Low;
        let ledger = station.clear_transaction();
        let receipt = Receipt::from_ledger(station.id(), &ledger, &method, change);
        info!(
            station_id = %station.id(),
            total = %receipt.total,
            method = method.name(),
            "payment settled"
        );
        if cash_level_low {
            warn!(station_id = %station.id(), "cash level low at station");
        }
        drop(station);

        if let Err(e) = self.receipts.emit(receipt.clone()).await {
            error!(station_id, receipt_id = %receipt.id, error = %e, "failed to emit receipt");
        }

        Ok(PaymentOutcome {
            receipt,
            change,
            cash_level_low,
        })
    }

    pub async fn cancel(&self, station_id: &str) -> Result<()> {
        self.with_station(station_id, |station| {
            if station.transaction_state() == TransactionState::Idle {
                return Err(invalid_state(station, "cancel"));
            }
            let voided = station.clear_transaction();
            info!(station_id = %station.id(), items = voided.len(), "transaction cancelled");
            Ok(())
        })
        .await
    }

    /// Returns the station to `Active`/`Idle` from any state.
    pub async fn reset(&self, station_id: &str) -> Result<()> {
        self.with_station(station_id, |station| {
            let voided = station.clear_transaction();
            station.set_operational_status(OperationalStatus::Active);
            info!(station_id = %station.id(), items = voided.len(), "station reset");
            Ok(())
        })
        .await
    }

    /// Moves an in-flight ledger to another kiosk.
    ///
    /// Both station locks are taken in ascending id order so that two
    /// transfers running in opposite directions cannot deadlock.
    pub async fn transfer(&self, source_id: &str, target_id: &str) -> Result<TransferOutcome> {
        if source_id == target_id {
            return Err(CheckoutError::TransferToSelf(source_id.to_string()));
        }
        let source_handle = self.registry.find_by_id(source_id).await?;
        let target_handle = self.registry.find_by_id(target_id).await?;

        let (mut source, mut target) = if source_id < target_id {
            let source = source_handle.lock().await;
            let target = target_handle.lock().await;
            (source, target)
        } else {
            let target = target_handle.lock().await;
            let source = source_handle.lock().await;
            (source, target)
        };

        if target.operational_status() != OperationalStatus::Active {
            return Err(CheckoutError::TargetNotActive {
                station_id: target.id().to_string(),
                status: target.operational_status(),
            });
        }
        if source.ledger().is_empty() {
            return Err(CheckoutError::SourceEmpty(source.id().to_string()));
        }
        if target.transaction_state() != TransactionState::Idle {
            return Err(CheckoutError::TransactionAlreadyInProgress {
                station_id: target.id().to_string(),
                state: target.transaction_state(),
            });
        }

        let ledger = source.clear_transaction();
        let outcome = TransferOutcome {
            moved: ledger.len(),
            total: ledger.total(),
        };
        target.receive(ledger);
        info!(
            source = %source.id(),
            target = %target.id(),
            items = outcome.moved,
            total = %outcome.total,
            "transaction transferred"
        );
        Ok(outcome)
    }

    /// Supervisor clears a weight or payment alert without the normal resolution path.
    pub async fn override_error(&self, station_id: &str) -> Result<()> {
        self.with_station(station_id, |station| {
            match station.transaction_state() {
                TransactionState::WeightMismatch | TransactionState::PaymentError => {}
                _ => return Err(invalid_state(station, "override an error")),
            }
            let cleared = station.transaction_state();
            station.enter(TransactionState::InProgress);
            info!(station_id = %station.id(), %cleared, "alert overridden by supervisor");
            Ok(())
        })
        .await
    }

    /// Changes a station's operational status.
    ///
    /// A transaction already in flight is left to finish; only new starts
    /// are blocked.
    pub async fn set_operational_status(
        &self,
        station_id: &str,
        status: OperationalStatus,
    ) -> Result<()> {
        self.with_station(station_id, |station| {
            station.set_operational_status(status);
            info!(station_id = %station.id(), %status, "operational status changed");
            Ok(())
        })
        .await
    }

    pub async fn view_station(&self, station_id: &str) -> Result<StationView> {
        self.with_station(station_id, |station| Ok(StationView::from(&*station)))
            .await
    }

    /// Stations waiting on a supervisor, sorted by id.
    pub async fn view_alerts(&self) -> Vec<StationView> {
        self.stations()
            .await
            .into_iter()
            .filter(|view| view.needs_assistance)
            .collect()
    }

    /// Every station, sorted by id.
    pub async fn stations(&self) -> Vec<StationView> {
        self.registry
            .snapshot()
            .await
            .iter()
            .map(StationView::from)
            .collect()
    }
}
