use axum::{extract::State, Json};
use tower_cookies::Cookies;

use crate::{
    database::AppState,
    error::AppResult,
    middleware::require_user,
    services::dashboard::{self, Dashboard},
};

pub async fn dashboard(State(state): State<AppState>, cookies: Cookies) -> AppResult<Json<Dashboard>> {
    let user = require_user(&cookies, &state).await?;
    let overview = dashboard::dashboard(&state.db, user.id, state.config.low_stock_threshold).await?;
    Ok(Json(overview))
}
