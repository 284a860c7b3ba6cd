use serde::Serialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    database::AppState,
    error::{AppError, AppResult},
    models::User,
    utils::verify_token,
};

pub const AUTH_COOKIE: &str = "auth_token";

/// The authenticated caller. Handlers pass `id` to every service call.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Resolves the session cookie to an active user.
///
/// `Ok(None)` means there is no usable session. Store failures are errors,
/// never a missing session.
pub async fn get_current_user(cookies: &Cookies, state: &AppState) -> Result<Option<CurrentUser>, sqlx::Error> {
    let Some(token) = cookies.get(AUTH_COOKIE).map(|cookie| cookie.value().to_string()) else {
        return Ok(None);
    };

    let claims = match verify_token(&token, &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(err) => {
            log::debug!("rejected session token: {}", err);
            return Ok(None);
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(None);
    };

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active = true")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;

    Ok(user.map(CurrentUser::from))
}

pub async fn require_user(cookies: &Cookies, state: &AppState) -> AppResult<CurrentUser> {
    get_current_user(cookies, state)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::Unauthorized)
}
