use axum::{extract::State, http::StatusCode, Json};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    database::AppState,
    extract::{JsonBody, PathParam},
    error::AppResult,
    middleware::require_user,
    models::Category,
    services::categories::{self, CategoryInput},
};

pub async fn categories_list(State(state): State<AppState>, cookies: Cookies) -> AppResult<Json<Vec<Category>>> {
    let user = require_user(&cookies, &state).await?;
    Ok(Json(categories::list_categories(&state.db, user.id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    cookies: Cookies,
    JsonBody(form): JsonBody<CategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let user = require_user(&cookies, &state).await?;
    let category = categories::create_category(&state.db, user.id, form).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    cookies: Cookies,
    PathParam(category_id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    let user = require_user(&cookies, &state).await?;
    categories::delete_category(&state.db, user.id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
