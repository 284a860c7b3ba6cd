use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    database::AppState,
    extract::QueryParams,
    error::AppResult,
    middleware::require_user,
    services::sales::{aggregate, Period, SalesSeries},
};

#[derive(Deserialize)]
pub struct SalesQuery {
    #[serde(default)]
    period: Period,
}

// Chart data for the dashboard; the caller must be signed in.
pub async fn sales_data(
    State(state): State<AppState>,
    cookies: Cookies,
    QueryParams(query): QueryParams<SalesQuery>,
) -> AppResult<Json<SalesSeries>> {
    let user = require_user(&cookies, &state).await?;
    let series = aggregate(&state.db, user.id, query.period, Utc::now()).await?;
    Ok(Json(series))
}
