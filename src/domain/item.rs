use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A non-negative currency amount.
///
/// Wraps `rust_decimal::Decimal` so that totals and change are exact.
/// Deserialization goes through [`Price::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

/// A non-negative weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Weight(Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CheckoutError::Validation(format!(
                "price must not be negative, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Subtracts `rhs`, returning `None` when the result would be negative.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        if self.0 >= rhs.0 {
            Some(Self(self.0 - rhs.0))
        } else {
            None
        }
    }
}

impl Weight {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CheckoutError::Validation(format!(
                "weight must not be negative, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// For constants whose literal is known to be non-negative.
    pub(crate) const fn from_const(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Absolute difference between two weights.
    pub fn abs_diff(self, other: Self) -> Self {
        Self((self.0 - other.0).abs())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Weight {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl From<Weight> for Decimal {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kg", self.0)
    }
}

impl Add for Price {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Add for Weight {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// One scanned item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerItem {
    pub name: String,
    pub unit_price: Price,
    pub unit_weight: Weight,
}

impl LedgerItem {
    pub fn new(name: impl Into<String>, unit_price: Price, unit_weight: Weight) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CheckoutError::Validation(
                "item name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            unit_price,
            unit_weight,
        })
    }
}

/// The ordered list of items scanned into a station's current transaction.
///
/// Totals are always aggregated at read time; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ledger {
    items: Vec<LedgerItem>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: LedgerItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[LedgerItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.unit_price).sum()
    }

    pub fn total_weight(&self) -> Weight {
        self.items.iter().map(|item| item.unit_weight).sum()
    }

    /// Moves every item out, leaving this ledger empty.
    pub fn take(&mut self) -> Ledger {
        std::mem::take(self)
    }
}

impl FromIterator<LedgerItem> for Ledger {
    fn from_iter<T: IntoIterator<Item = LedgerItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(name: &str, price: Decimal, weight: Decimal) -> LedgerItem {
        LedgerItem::new(name, Price::new(price).unwrap(), Weight::new(weight).unwrap()).unwrap()
    }

    #[test]
    fn test_price_rejects_negative() {
        assert!(Price::new(dec!(0.0)).is_ok());
        assert!(matches!(
            Price::new(dec!(-0.01)),
            Err(CheckoutError::Validation(_))
        ));
        assert!(matches!(
            Weight::new(dec!(-1)),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_item_requires_name() {
        let result = LedgerItem::new("  ", Price::ZERO, Weight::ZERO);
        assert!(matches!(result, Err(CheckoutError::Validation(_))));
    }

    #[test]
    fn test_ledger_totals() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.total(), Price::ZERO);

        ledger.push(item("Milk", dec!(3.99), dec!(1.00)));
        ledger.push(item("Bread", dec!(2.50), dec!(0.50)));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total(), Price::new(dec!(6.49)).unwrap());
        assert_eq!(ledger.total_weight(), Weight::new(dec!(1.50)).unwrap());
    }

    #[test]
    fn test_ledger_take_preserves_order() {
        let mut ledger = Ledger::new();
        ledger.push(item("Eggs", dec!(4.00), dec!(0.6)));
        ledger.push(item("Butter", dec!(3.50), dec!(0.25)));

        let moved = ledger.take();
        assert!(ledger.is_empty());
        assert_eq!(moved.items()[0].name, "Eggs");
        assert_eq!(moved.items()[1].name, "Butter");
        assert_eq!(moved.total(), Price::new(dec!(7.50)).unwrap());
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-5.00\"").is_err());
        assert!(serde_json::from_str::<Weight>("\"-1\"").is_err());

        let price: Price = serde_json::from_str("\"3.99\"").unwrap();
        assert_eq!(price, Price::new(dec!(3.99)).unwrap());
    }

    #[test]
    fn test_price_checked_sub() {
        let ten = Price::new(dec!(10.00)).unwrap();
        let due = Price::new(dec!(6.49)).unwrap();
        assert_eq!(ten.checked_sub(due), Some(Price::new(dec!(3.51)).unwrap()));
        assert_eq!(due.checked_sub(ten), None);
    }
}
