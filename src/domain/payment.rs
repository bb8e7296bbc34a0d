use super::item::Price;
use serde::{Deserialize, Serialize};

/// How the customer is paying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash { tendered: Price },
    Card { card_ref: String },
}

impl PaymentMethod {
    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash { .. } => "cash",
            PaymentMethod::Card { .. } => "card",
        }
    }
}

/// What a card authorizer answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardOutcome {
    Approved,
    Declined,
}

/// Result of a cash settlement. `change` is only present on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashSettlement {
    pub success: bool,
    pub change: Option<Price>,
}

/// Settles a cash payment. Succeeds iff `tendered >= due`.
pub fn settle_cash(due: Price, tendered: Price) -> CashSettlement {
    match tendered.checked_sub(due) {
        Some(change) => CashSettlement {
            success: true,
            change: Some(change),
        },
        None => CashSettlement {
            success: false,
            change: None,
        },
    }
}
