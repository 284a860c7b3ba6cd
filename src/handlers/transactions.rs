use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    database::AppState,
    extract::{JsonBody, QueryParams},
    error::AppResult,
    middleware::require_user,
    models::Transaction,
    services::transactions::{self, SaleInput, TransactionPage},
};

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<i64>,
}

pub async fn transaction_list(
    State(state): State<AppState>,
    cookies: Cookies,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<TransactionPage>> {
    let user = require_user(&cookies, &state).await?;
    let page = transactions::list_transactions(&state.db, user.id, query.page.unwrap_or(1)).await?;
    Ok(Json(page))
}

pub async fn record_transaction(
    State(state): State<AppState>,
    cookies: Cookies,
    JsonBody(form): JsonBody<SaleInput>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let user = require_user(&cookies, &state).await?;
    let transaction = transactions::record_sale(&state.db, user.id, form).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
