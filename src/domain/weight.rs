use super::item::Weight;

/// Outcome of comparing the bagging-area scale with the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightCheck {
    Match,
    Mismatch,
}

/// Compares a scale reading against the ledger's cumulative weight.
///
/// The reading matches when it lies within `tolerance` of the expected sum,
/// bounds included.
pub fn verify(ledger_weight: Weight, scale_reading: Weight, tolerance: Weight) -> WeightCheck {
    if scale_reading.abs_diff(ledger_weight) <= tolerance {
        WeightCheck::Match
    } else {
        WeightCheck::Mismatch
    }
}
