//! Turns stock decreases made while editing an item into recorded sales.

use rust_decimal::Decimal;
use sqlx::PgExecutor;

use super::MAX_AMOUNT;
use crate::{
    error::{AppError, AppResult},
    models::{Item, SaleRecord, Transaction},
};

/// Units sold when stock moves from `original` to `new`, if it went down.
pub fn units_sold(original: i32, new: i32) -> Option<i64> {
    let difference = i64::from(original) - i64::from(new);
    (difference > 0).then_some(difference)
}

pub fn sale_amount(units: i64, price: Decimal) -> Decimal {
    Decimal::from(units) * price
}

/// The amount of a sale, rejected on `stock` when it does not fit a
/// transaction amount.
pub fn checked_sale_amount(units: i64, price: Decimal) -> AppResult<Decimal> {
    let amount = sale_amount(units, price);
    if amount > MAX_AMOUNT {
        return Err(AppError::validation(
            "stock",
            format!("sale of {units} units exceeds the largest recordable amount {MAX_AMOUNT}"),
        ));
    }
    Ok(amount)
}

/// Records the sale implied by lowering `original`'s stock to `new_stock`.
///
/// Must run on the same transaction that writes the new stock value, so the
/// sale and the stock change commit together.
pub async fn record_if_sold<'e, E>(
    executor: E,
    original: &Item,
    new_stock: i32,
) -> AppResult<Option<SaleRecord>>
where
    E: PgExecutor<'e>,
{
    let Some(units) = units_sold(original.stock, new_stock) else {
        return Ok(None);
    };
    let amount = checked_sale_amount(units, original.price)?;

    let transaction = sqlx::query_as::<_, Transaction>(
        "INSERT INTO transactions (item_id, amount) VALUES ($1, $2) RETURNING *",
    )
    .bind(original.id)
    .bind(amount)
    .fetch_one(executor)
    .await?;

    log::info!(
        "item {} sold {} units, recorded transaction {} for {}",
        original.id,
        units,
        transaction.id,
        transaction.amount
    );

    Ok(Some(SaleRecord {
        transaction_id: transaction.id,
        units_sold: units,
        amount: transaction.amount,
    }))
}
