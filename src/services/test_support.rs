use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::items::ItemInput;

pub async fn create_user(pool: &PgPool, email: &str) -> sqlx::Result<Uuid> {
    sqlx::query_scalar("INSERT INTO users (email, password_hash) VALUES ($1, 'x') RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub fn item_input(name: &str, stock: i32, price: Decimal) -> ItemInput {
    ItemInput {
        name: name.to_string(),
        category_id: None,
        description: None,
        stock,
        price,
        reorder_level: 0,
    }
}

/// Inserts an item directly, bypassing serial allocation.
pub async fn insert_item(pool: &PgPool, user_id: Uuid, sn: Option<&str>) -> sqlx::Result<Uuid> {
    sqlx::query_scalar("INSERT INTO items (user_id, sn, name, price) VALUES ($1, $2, 'Fixture', 1) RETURNING id")
        .bind(user_id)
        .bind(sn)
        .fetch_one(pool)
        .await
}

pub async fn insert_sale_at(
    pool: &PgPool,
    item_id: Uuid,
    amount: Decimal,
    at: DateTime<Utc>,
) -> sqlx::Result<Uuid> {
    sqlx::query_scalar("INSERT INTO transactions (item_id, amount, created_at) VALUES ($1, $2, $3) RETURNING id")
        .bind(item_id)
        .bind(amount)
        .bind(at)
        .fetch_one(pool)
        .await
}
