use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::{categories, normalize_text, serial, stock, validate_count, validate_money, validate_name, MAX_PRICE};
use crate::{
    database::Database,
    error::{is_unique_violation, AppError, AppResult},
    models::{Item, SaleRecord},
};

/// Attempts at inserting a new item before a serial collision is reported.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 3;

const ITEM_ORDER: &str = "ORDER BY sn IS NULL, length(sn), sn, created_at";

#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    pub stock: i32,
    pub price: Decimal,
    #[serde(default)]
    pub reorder_level: i32,
}

impl ItemInput {
    fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: validate_name("name", &self.name)?,
            category_id: self.category_id,
            description: normalize_text(self.description),
            stock: validate_count("stock", self.stock)?,
            price: validate_money("price", self.price, MAX_PRICE)?,
            reorder_level: validate_count("reorder_level", self.reorder_level)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ItemUpdate {
    pub item: Item,
    pub sale: Option<SaleRecord>,
}

/// Creates an item under the next free serial number of its owner.
pub async fn create_item(db: &Database, user_id: Uuid, input: ItemInput) -> AppResult<Item> {
    let input = input.validated()?;

    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        let mut tx = db.begin().await?;
        if let Some(category_id) = input.category_id {
            categories::ensure_owned(&mut *tx, user_id, category_id).await?;
        }
        serial::lock_sequence(&mut *tx, user_id).await?;
        let sn = serial::allocate_next_sn(&mut *tx, user_id).await?;

        match insert_item(&mut *tx, user_id, &sn, &input).await {
            Ok(item) => {
                tx.commit().await?;
                log::info!("user {} created item {} (SN {})", user_id, item.id, sn);
                return Ok(item);
            }
            Err(err) if is_unique_violation(&err) => {
                log::warn!(
                    "serial {} already taken for user {} (attempt {}/{})",
                    sn,
                    user_id,
                    attempt,
                    MAX_ALLOCATION_ATTEMPTS
                );
                tx.rollback().await?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Conflict)
}

async fn insert_item<'e, E>(executor: E, user_id: Uuid, sn: &str, input: &ItemInput) -> Result<Item, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (user_id, sn, name, category_id, description, stock, reorder_level, price)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(sn)
    .bind(&input.name)
    .bind(input.category_id)
    .bind(&input.description)
    .bind(input.stock)
    .bind(input.reorder_level)
    .bind(input.price)
    .fetch_one(executor)
    .await
}

/// Applies an edit. A lower stock records the difference as a sale in the
/// same transaction as the edit itself.
pub async fn update_item(db: &Database, user_id: Uuid, item_id: Uuid, input: ItemInput) -> AppResult<ItemUpdate> {
    let input = input.validated()?;

    let mut tx = db.begin().await?;
    if let Some(category_id) = input.category_id {
        categories::ensure_owned(&mut *tx, user_id, category_id).await?;
    }

    let original = sqlx::query_as::<_, Item>(
        "SELECT * FROM items WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound)?;

    let sale = stock::record_if_sold(&mut *tx, &original, input.stock).await?;

    let item = sqlx::query_as::<_, Item>(
        r#"
        UPDATE items
        SET name = $3, category_id = $4, description = $5, stock = $6,
            reorder_level = $7, price = $8, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .bind(&input.name)
    .bind(input.category_id)
    .bind(&input.description)
    .bind(input.stock)
    .bind(input.reorder_level)
    .bind(input.price)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!("user {} updated item {}", user_id, item_id);
    Ok(ItemUpdate { item, sale })
}

pub async fn get_item(db: &Database, user_id: Uuid, item_id: Uuid) -> AppResult<Item> {
    sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound)
}

/// Deletes the item. Its sales are kept but no longer belong to anyone.
pub async fn delete_item(db: &Database, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("user {} deleted item {}", user_id, item_id);
    Ok(())
}

pub async fn list_items(db: &Database, user_id: Uuid) -> AppResult<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(&format!("SELECT * FROM items WHERE user_id = $1 {ITEM_ORDER}"))
        .bind(user_id)
        .fetch_all(db)
        .await?;

    Ok(items)
}

pub async fn low_stock_items<'e, E>(executor: E, user_id: Uuid, threshold: i32) -> AppResult<Vec<Item>>
where
    E: PgExecutor<'e>,
{
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT * FROM items WHERE user_id = $1 AND stock < $2 {ITEM_ORDER}"
    ))
    .bind(user_id)
    .bind(threshold)
    .fetch_all(executor)
    .await?;

    Ok(items)
}
