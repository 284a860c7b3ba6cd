use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_money, MAX_AMOUNT};
use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{Transaction, TransactionDisplay},
};

pub const PAGE_SIZE: i64 = 10;

/// A sale entered by hand against one of the user's items.
#[derive(Debug, Deserialize)]
pub struct SaleInput {
    pub item_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TransactionPage {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub transactions: Vec<TransactionDisplay>,
}

pub async fn record_sale(db: &Database, user_id: Uuid, input: SaleInput) -> AppResult<Transaction> {
    let amount = validate_money("amount", input.amount, MAX_AMOUNT)?;

    // Inserting through the owner check keeps foreign item ids out.
    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (item_id, amount)
        SELECT id, $3 FROM items WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(input.item_id)
    .bind(user_id)
    .bind(amount)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::validation("item_id", "unknown item"))?;

    log::info!(
        "user {} recorded transaction {} for {}",
        user_id,
        transaction.id,
        transaction.amount
    );
    Ok(transaction)
}

/// Lists the user's sales, newest first. `page` is 1-based; values below 1
/// read as the first page.
pub async fn list_transactions(db: &Database, user_id: Uuid, page: i64) -> AppResult<TransactionPage> {
    let page = page.max(1);

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions t JOIN items i ON i.id = t.item_id WHERE i.user_id = $1",
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;

    let transactions = sqlx::query_as::<_, TransactionDisplay>(
        r#"
        SELECT t.id, t.item_id, i.name AS item_name, t.amount, t.created_at
        FROM transactions t
        JOIN items i ON i.id = t.item_id
        WHERE i.user_id = $1
        ORDER BY t.created_at DESC, t.id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(PAGE_SIZE)
    .bind((page - 1).saturating_mul(PAGE_SIZE))
    .fetch_all(db)
    .await?;

    Ok(TransactionPage {
        page,
        per_page: PAGE_SIZE,
        total,
        transactions,
    })
}
