use super::{FruitKind, HarvestId, OwnerId, ValidatedHarvest};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct HarvestEntry {
    pub id: HarvestId,
    pub owner: OwnerId,
    pub date: NaiveDate,
    pub fruit: FruitKind,
    pub amount: i32,
    pub price: BigDecimal,
}

impl HarvestEntry {
    pub fn from_fields(id: HarvestId, owner: OwnerId, fields: ValidatedHarvest) -> Self {
        Self {
            id,
            owner,
            date: fields.date,
            fruit: fields.fruit,
            amount: fields.amount,
            price: fields.price,
        }
    }

    /// Worth of the harvest, `price × amount`.
    pub fn value(&self) -> BigDecimal {
        &self.price * &BigDecimal::from(self.amount)
    }
}

impl fmt::Display for HarvestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.fruit, self.date)
    }
}

/// Wire representation of an entry, including the derived value.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestView {
    pub id: HarvestId,
    pub owner: OwnerId,
    pub date: NaiveDate,
    pub fruit: FruitKind,
    pub amount: i32,
    pub price: BigDecimal,
    pub value: BigDecimal,
    /// **Example:** `"Apple 2024-05-01"`
    pub label: String,
}

impl From<&HarvestEntry> for HarvestView {
    fn from(entry: &HarvestEntry) -> Self {
        Self {
            id: entry.id,
            owner: entry.owner,
            date: entry.date,
            fruit: entry.fruit,
            amount: entry.amount,
            price: entry.price.clone(),
            value: entry.value(),
            label: entry.to_string(),
        }
    }
}
