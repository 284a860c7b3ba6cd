use serde::Deserialize;
use sqlx::PgExecutor;
use uuid::Uuid;

use super::{normalize_text, validate_name};
use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::Category,
};

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_category(db: &Database, user_id: Uuid, input: CategoryInput) -> AppResult<Category> {
    let name = validate_name("name", &input.name)?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (user_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&name)
    .bind(normalize_text(input.description))
    .fetch_one(db)
    .await?;

    log::info!("user {} created category {}", user_id, category.id);
    Ok(category)
}

pub async fn list_categories(db: &Database, user_id: Uuid) -> AppResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE user_id = $1 ORDER BY name, created_at",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(categories)
}

/// Deletes the category; its items stay and lose their category.
pub async fn delete_category(db: &Database, user_id: Uuid, category_id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(category_id)
        .bind(user_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    log::info!("user {} deleted category {}", user_id, category_id);
    Ok(())
}

/// Rejects references to categories the user does not own.
///
/// Run it on the transaction that writes the reference: the row stays share
/// locked until that transaction ends, so the category cannot be deleted in
/// between.
pub async fn ensure_owned<'e, E>(executor: E, user_id: Uuid, category_id: Uuid) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE id = $1 AND user_id = $2 FOR SHARE")
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::validation("category_id", "unknown category"))
}
