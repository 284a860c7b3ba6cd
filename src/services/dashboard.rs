use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::items;
use crate::{database::Database, error::AppResult, models::inventory::ItemDisplay};

#[derive(Debug, Serialize)]
pub struct Metrics {
    pub total_items: i64,
    pub categories: i64,
    pub low_stock: i64,
    pub total_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub metrics: Metrics,
    pub low_stock_items: Vec<ItemDisplay>,
}

/// A read-only transaction whose statements all see the same snapshot.
async fn begin_snapshot(db: &Database) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = db.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Inventory overview for one user, read from a single snapshot.
pub async fn dashboard(db: &Database, user_id: Uuid, low_stock_threshold: i32) -> AppResult<Dashboard> {
    let mut tx = begin_snapshot(db).await?;

    let (total_items, total_value): (i64, Decimal) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(stock * price), 0) FROM items WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

    let low_stock_items: Vec<ItemDisplay> = items::low_stock_items(&mut *tx, user_id, low_stock_threshold)
        .await?
        .into_iter()
        .map(ItemDisplay::from)
        .collect();

    tx.commit().await?;

    Ok(Dashboard {
        metrics: Metrics {
            total_items,
            categories,
            low_stock: low_stock_items.len() as i64,
            total_value,
        },
        low_stock_items,
    })
}
