use super::FruitKind;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// Field values that passed every bounds check and may be handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedHarvest {
    pub date: NaiveDate,
    pub fruit: FruitKind,
    pub amount: i32,
    /// Price per kg, scale normalized to 2.
    pub price: BigDecimal,
}
