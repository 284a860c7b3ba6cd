//! Inventory and sales operations. Every call takes the owning user's id
//! explicitly; nothing here reads request state.

pub mod categories;
pub mod dashboard;
pub mod items;
pub mod sales;
pub mod serial;
pub mod stock;
pub mod transactions;

#[cfg(test)]
pub(crate) mod test_support;

use rust_decimal::Decimal;

use crate::error::AppError;

pub const MAX_NAME_LEN: usize = 100;
/// Largest value of a `NUMERIC(10, 2)` unit price.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);
/// Largest value of a `NUMERIC(12, 2)` transaction amount.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Trims `value` and checks it is a non-empty name that fits the column.
pub(crate) fn validate_name(field: &'static str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(
            field,
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(value.to_string())
}

/// Money is non-negative, has at most two decimal places and fits `max`.
pub(crate) fn validate_money(field: &'static str, value: Decimal, max: Decimal) -> Result<Decimal, AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(field, "must not be negative"));
    }
    let value = value.normalize();
    if value.scale() > 2 {
        return Err(AppError::validation(field, "must have at most two decimal places"));
    }
    if value > max {
        return Err(AppError::validation(field, format!("must be at most {max}")));
    }
    Ok(value)
}

pub(crate) fn validate_count(field: &'static str, value: i32) -> Result<i32, AppError> {
    if value < 0 {
        return Err(AppError::validation(field, "must not be negative"));
    }
    Ok(value)
}

/// Blank optional text is stored as NULL.
pub(crate) fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
