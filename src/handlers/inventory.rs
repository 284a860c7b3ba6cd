use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    database::AppState,
    extract::{JsonBody, PathParam},
    error::AppResult,
    middleware::require_user,
    models::{inventory::ItemDisplay, Item},
    services::{
        items::{self, ItemInput, ItemUpdate},
        serial,
    },
};

#[derive(Serialize)]
pub struct NextSn {
    sn: String,
}

// Items ordered by serial number
pub async fn items_list(State(state): State<AppState>, cookies: Cookies) -> AppResult<Json<Vec<ItemDisplay>>> {
    let user = require_user(&cookies, &state).await?;
    let items = items::list_items(&state.db, user.id).await?;
    Ok(Json(items.into_iter().map(ItemDisplay::from).collect()))
}

pub async fn low_stock_list(State(state): State<AppState>, cookies: Cookies) -> AppResult<Json<Vec<ItemDisplay>>> {
    let user = require_user(&cookies, &state).await?;
    let items = items::low_stock_items(&state.db, user.id, state.config.low_stock_threshold).await?;
    Ok(Json(items.into_iter().map(ItemDisplay::from).collect()))
}

/// Serial the next created item would get. Creation may still hand out a
/// different one if another item is created first.
pub async fn next_sn(State(state): State<AppState>, cookies: Cookies) -> AppResult<Json<NextSn>> {
    let user = require_user(&cookies, &state).await?;
    let sn = serial::allocate_next_sn(&state.db, user.id).await?;
    Ok(Json(NextSn { sn }))
}

pub async fn create_item(
    State(state): State<AppState>,
    cookies: Cookies,
    JsonBody(form): JsonBody<ItemInput>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let user = require_user(&cookies, &state).await?;
    let item = items::create_item(&state.db, user.id, form).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn item_detail(
    State(state): State<AppState>,
    cookies: Cookies,
    PathParam(item_id): PathParam<Uuid>,
) -> AppResult<Json<ItemDisplay>> {
    let user = require_user(&cookies, &state).await?;
    let item = items::get_item(&state.db, user.id, item_id).await?;
    Ok(Json(item.into()))
}

pub async fn update_item(
    State(state): State<AppState>,
    cookies: Cookies,
    PathParam(item_id): PathParam<Uuid>,
    JsonBody(form): JsonBody<ItemInput>,
) -> AppResult<Json<ItemUpdate>> {
    let user = require_user(&cookies, &state).await?;
    let update = items::update_item(&state.db, user.id, item_id, form).await?;
    Ok(Json(update))
}

pub async fn delete_item(
    State(state): State<AppState>,
    cookies: Cookies,
    PathParam(item_id): PathParam<Uuid>,
) -> AppResult<StatusCode> {
    let user = require_user(&cookies, &state).await?;
    items::delete_item(&state.db, user.id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
