use super::FruitKind;
use bigdecimal::BigDecimal;
use serde::Serialize;

/// Season aggregate for a single fruit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FruitTotals {
    pub fruit: FruitKind,
    pub harvests: i64,
    pub total_amount: i64,
    pub total_value: BigDecimal,
}
