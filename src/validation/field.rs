use super::ErrorKind;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// The recognized fields of a harvest submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HarvestField {
    Date,
    Fruit,
    Amount,
    Price,
}

impl HarvestField {
    /// Validation order, which is also the order errors are reported in.
    pub const ALL: [HarvestField; 4] = [
        HarvestField::Date,
        HarvestField::Fruit,
        HarvestField::Amount,
        HarvestField::Price,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HarvestField::Date => "date",
            HarvestField::Fruit => "fruit",
            HarvestField::Amount => "amount",
            HarvestField::Price => "price",
        }
    }

    pub fn rule(&self) -> &'static FieldRule {
        match self {
            HarvestField::Date => &RULES[0],
            HarvestField::Fruit => &RULES[1],
            HarvestField::Amount => &RULES[2],
            HarvestField::Price => &RULES[3],
        }
    }
}

/// One row of the validation table: the accepted domain of a field and the
/// error kinds reported for a value that cannot be read, or is read but lies
/// outside that domain.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldRule {
    pub field: HarvestField,
    pub bounds: FieldBounds,
    pub malformed: ErrorKind,
    pub out_of_bounds: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBounds {
    Date(DateBounds),
    /// One of the [`FruitKind`](crate::domain::FruitKind) choices.
    Choice,
    Amount(AmountBounds),
    Price(PriceBounds),
}

/// Dates from January 1st of `earliest_year` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub earliest_year: i32,
}

impl DateBounds {
    pub fn earliest(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.earliest_year, 1, 1).unwrap_or(NaiveDate::MIN)
    }
}

/// Whole numbers in `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountBounds {
    pub min: i64,
    pub max: i64,
}

/// Decimals in `min..=max` written with at most `max_digits` digits, of which
/// at most `decimal_places` follow the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBounds {
    pub min_tenths: i64,
    pub max_tenths: i64,
    pub max_digits: u64,
    pub decimal_places: u64,
}

impl PriceBounds {
    /// `0.1`
    pub fn min(&self) -> BigDecimal {
        BigDecimal::new(self.min_tenths.into(), 1)
    }

    /// `50.0`
    pub fn max(&self) -> BigDecimal {
        BigDecimal::new(self.max_tenths.into(), 1)
    }

    pub fn whole_digits(&self) -> u64 {
        self.max_digits.saturating_sub(self.decimal_places)
    }
}

const RULES: [FieldRule; 4] = [
    FieldRule {
        field: HarvestField::Date,
        bounds: FieldBounds::Date(DateBounds {
            earliest_year: 1997,
        }),
        malformed: ErrorKind::DateTooEarly,
        out_of_bounds: ErrorKind::DateTooEarly,
    },
    FieldRule {
        field: HarvestField::Fruit,
        bounds: FieldBounds::Choice,
        malformed: ErrorKind::InvalidChoice,
        out_of_bounds: ErrorKind::InvalidChoice,
    },
    FieldRule {
        field: HarvestField::Amount,
        bounds: FieldBounds::Amount(AmountBounds { min: 10, max: 5000 }),
        malformed: ErrorKind::AmountOutOfBounds,
        out_of_bounds: ErrorKind::AmountOutOfBounds,
    },
    FieldRule {
        field: HarvestField::Price,
        bounds: FieldBounds::Price(PriceBounds {
            min_tenths: 1,
            max_tenths: 500,
            max_digits: 4,
            decimal_places: 2,
        }),
        malformed: ErrorKind::PriceMalformed,
        out_of_bounds: ErrorKind::PriceOutOfBounds,
    },
];

impl fmt::Display for HarvestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
