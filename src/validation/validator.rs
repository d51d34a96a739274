use super::field::{AmountBounds, DateBounds, FieldBounds, FieldRule, PriceBounds};
use super::{FieldError, FieldErrors, HarvestField};
use crate::domain::{FruitKind, HarvestForm, ValidatedHarvest};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Outcome of checking every field of a submission.
///
/// Fields that passed are kept even when others failed, so that callers can
/// still decide whether the composite key is usable.
#[derive(Debug, Clone, Default)]
pub struct FieldCheck {
    pub date: Option<NaiveDate>,
    pub fruit: Option<FruitKind>,
    pub amount: Option<i32>,
    pub price: Option<BigDecimal>,
    pub errors: FieldErrors,
}

impl FieldCheck {
    /// `(date, fruit)` when both fields are valid.
    pub fn composite_key(&self) -> Option<(NaiveDate, FruitKind)> {
        Some((self.date?, self.fruit?))
    }

    pub fn into_result(self) -> Result<ValidatedHarvest, FieldErrors> {
        match (self.date, self.fruit, self.amount, self.price) {
            (Some(date), Some(fruit), Some(amount), Some(price)) if self.errors.is_empty() => {
                Ok(ValidatedHarvest {
                    date,
                    fruit,
                    amount,
                    price,
                })
            }
            _ => Err(self.errors),
        }
    }
}

/// Validates every recognized field and reports all violations at once.
pub fn validate_fields(form: &HarvestForm) -> Result<ValidatedHarvest, FieldErrors> {
    check_fields(form).into_result()
}

pub fn check_fields(form: &HarvestForm) -> FieldCheck {
    let mut check = FieldCheck::default();

    for field in HarvestField::ALL {
        let rule = field.rule();
        let raw = match required(field, raw_value(form, field)) {
            Ok(raw) => raw,
            Err(errors) => {
                check.errors.extend(errors);
                continue;
            }
        };

        let outcome = match rule.bounds {
            FieldBounds::Date(bounds) => {
                parse_date(rule, bounds, raw).map(|d| check.date = Some(d))
            }
            FieldBounds::Choice => parse_fruit(rule, raw).map(|f| check.fruit = Some(f)),
            FieldBounds::Amount(bounds) => {
                parse_amount(rule, bounds, raw).map(|a| check.amount = Some(a))
            }
            FieldBounds::Price(bounds) => {
                parse_price(rule, bounds, raw).map(|p| check.price = Some(p))
            }
        };
        if let Err(errors) = outcome {
            check.errors.extend(errors);
        }
    }

    check
}

fn raw_value(form: &HarvestForm, field: HarvestField) -> Option<&str> {
    match field {
        HarvestField::Date => form.date.as_deref(),
        HarvestField::Fruit => form.fruit.as_deref(),
        HarvestField::Amount => form.amount.as_deref(),
        HarvestField::Price => form.price.as_deref(),
    }
}

fn required(field: HarvestField, raw: Option<&str>) -> Result<&str, FieldErrors> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FieldError::missing(field).into()),
    }
}

fn parse_date(rule: &FieldRule, bounds: DateBounds, raw: &str) -> Result<NaiveDate, FieldErrors> {
    let year = bounds.earliest_year;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        FieldError::new(
            rule.field,
            rule.malformed,
            format!("Harvest date has to be at least in year {year}"),
        )
    })?;

    if date < bounds.earliest() {
        return Err(FieldError::new(
            rule.field,
            rule.out_of_bounds,
            format!("Earliest accepted harvest year is {year}"),
        )
        .into());
    }
    Ok(date)
}

fn parse_fruit(rule: &FieldRule, raw: &str) -> Result<FruitKind, FieldErrors> {
    raw.parse::<FruitKind>().map_err(|_| {
        FieldError::new(
            rule.field,
            rule.malformed,
            format!("Select a valid choice. {raw} is not one of the available choices."),
        )
        .into()
    })
}

fn parse_amount(rule: &FieldRule, bounds: AmountBounds, raw: &str) -> Result<i32, FieldErrors> {
    let too_low = || {
        FieldError::new(
            rule.field,
            rule.out_of_bounds,
            format!("Ensure this value is greater than or equal to {}.", bounds.min),
        )
    };
    let too_high = || {
        FieldError::new(
            rule.field,
            rule.out_of_bounds,
            format!("Ensure this value is less than or equal to {}.", bounds.max),
        )
    };

    // "1000.0" is a whole number written with a fractional part.
    let digits = match raw.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        _ => raw,
    };

    let amount = digits.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => too_high(),
        IntErrorKind::NegOverflow => too_low(),
        _ => FieldError::new(rule.field, rule.malformed, "Enter a whole number."),
    })?;

    if amount < bounds.min {
        return Err(too_low().into());
    }
    if amount > bounds.max {
        return Err(too_high().into());
    }
    i32::try_from(amount).map_err(|_| too_high().into())
}

fn parse_price(
    rule: &FieldRule,
    bounds: PriceBounds,
    raw: &str,
) -> Result<BigDecimal, FieldErrors> {
    let price = BigDecimal::from_str(raw)
        .map_err(|_| FieldError::new(rule.field, rule.malformed, "Enter a number."))?;

    let mut errors = FieldErrors::default();
    if let Some(message) = precision_violation(bounds, &price) {
        errors.push(FieldError::new(rule.field, rule.malformed, message));
    }
    if price < bounds.min() {
        errors.push(FieldError::new(
            rule.field,
            rule.out_of_bounds,
            format!("Ensure this value is greater than or equal to {}.", bounds.min()),
        ));
    } else if price > bounds.max() {
        errors.push(FieldError::new(
            rule.field,
            rule.out_of_bounds,
            format!("Ensure this value is less than or equal to {}.", bounds.max()),
        ));
    }

    if errors.is_empty() {
        Ok(price.with_scale(bounds.decimal_places as i64))
    } else {
        Err(errors)
    }
}

/// Digit counting follows the written form: trailing zeros count, so `1.500`
/// has three decimal places.
fn precision_violation(bounds: PriceBounds, price: &BigDecimal) -> Option<String> {
    let (unscaled, scale) = price.as_bigint_and_exponent();
    let unscaled = unscaled.to_string();
    let significant = unscaled.trim_start_matches('-');
    let is_zero = significant == "0";
    let len = significant.len() as u64;

    let (digits, decimals) = if scale <= 0 {
        let digits = if is_zero { 0 } else { len + scale.unsigned_abs() };
        (digits, 0)
    } else if scale.unsigned_abs() > len {
        (scale.unsigned_abs(), scale.unsigned_abs())
    } else {
        (len, scale.unsigned_abs())
    };
    let whole_digits = digits - decimals;

    if digits > bounds.max_digits {
        Some(format!(
            "Ensure that there are no more than {} digits in total.",
            bounds.max_digits
        ))
    } else if decimals > bounds.decimal_places {
        Some(format!(
            "Ensure that there are no more than {} decimal places.",
            bounds.decimal_places
        ))
    } else if whole_digits > bounds.whole_digits() {
        Some(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            bounds.whole_digits()
        ))
    } else {
        None
    }
}
