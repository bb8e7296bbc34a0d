use crate::domain::item::Weight;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Tunables for the transaction coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Largest allowed gap between the scale and the ledger weight.
    pub weight_tolerance: Weight,
    /// How long a card authorization may take before it counts as failed.
    pub card_timeout: Duration,
}

impl EngineConfig {
    pub const DEFAULT_CARD_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_WEIGHT_TOLERANCE: Weight = Weight::from_const(dec!(0.05));

    pub fn with_tolerance(mut self, tolerance: Weight) -> Self {
        self.weight_tolerance = tolerance;
        self
    }

    pub fn with_card_timeout(mut self, timeout: Duration) -> Self {
        self.card_timeout = timeout;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: Self::DEFAULT_WEIGHT_TOLERANCE,
            card_timeout: Self::DEFAULT_CARD_TIMEOUT,
        }
    }
}
