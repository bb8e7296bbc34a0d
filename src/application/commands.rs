use super::coordinator::{
    PaymentOutcome, Resolution, ScanOutcome, StationView, TransactionCoordinator, TransferOutcome,
};
use crate::domain::item::{LedgerItem, Weight};
use crate::domain::payment::PaymentMethod;
use crate::domain::station::OperationalStatus;
use crate::error::Result;

/// An administrative command, one per coordinator operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start {
        station: String,
    },
    Scan {
        station: String,
        item: LedgerItem,
        scale_reading: Weight,
    },
    FlagAge {
        station: String,
    },
    VerifyAge {
        station: String,
        approved: bool,
    },
    ResolveWeight {
        station: String,
        approved: bool,
    },
    Pay {
        station: String,
        method: PaymentMethod,
    },
    Cancel {
        station: String,
    },
    Reset {
        station: String,
    },
    Transfer {
        source: String,
        target: String,
    },
    Override {
        station: String,
    },
    SetStatus {
        station: String,
        status: OperationalStatus,
    },
    View {
        station: String,
    },
    Alerts,
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    Scanned(ScanOutcome),
    Resolved(Resolution),
    Paid(Box<PaymentOutcome>),
    Transferred(TransferOutcome),
    Station(StationView),
    Alerts(Vec<StationView>),
}

impl TransactionCoordinator {
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome> {
        let outcome = match command {
            Command::Start { station } => {
                self.start_transaction(&station).await?;
                CommandOutcome::Done
            }
            Command::Scan {
                station,
                item,
                scale_reading,
            } => CommandOutcome::Scanned(self.scan_item(&station, item, scale_reading).await?),
            Command::FlagAge { station } => {
                self.flag_age_restricted(&station).await?;
                CommandOutcome::Done
            }
            Command::VerifyAge { station, approved } => {
                CommandOutcome::Resolved(self.verify_age(&station, approved).await?)
            }
            Command::ResolveWeight { station, approved } => {
                CommandOutcome::Resolved(self.resolve_weight_mismatch(&station, approved).await?)
            }
            Command::Pay { station, method } => {
                CommandOutcome::Paid(Box::new(self.pay(&station, method).await?))
            }
            Command::Cancel { station } => {
                self.cancel(&station).await?;
                CommandOutcome::Done
            }
            Command::Reset { station } => {
                self.reset(&station).await?;
                CommandOutcome::Done
            }
            Command::Transfer { source, target } => {
                CommandOutcome::Transferred(self.transfer(&source, &target).await?)
            }
            Command::Override { station } => {
                self.override_error(&station).await?;
                CommandOutcome::Done
            }
            Command::SetStatus { station, status } => {
                self.set_operational_status(&station, status).await?;
                CommandOutcome::Done
            }
            Command::View { station } => CommandOutcome::Station(self.view_station(&station).await?),
            Command::Alerts => CommandOutcome::Alerts(self.view_alerts().await),
        };
        Ok(outcome)
    }
}
