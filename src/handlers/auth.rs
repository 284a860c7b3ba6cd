use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};

use crate::{
    database::AppState,
    extract::JsonBody,
    error::{is_unique_violation, AppError, AppResult},
    middleware::{CurrentUser, AUTH_COOKIE},
    models::{user::UserResponse, User},
    utils::{create_token, hash_password, verify_password},
};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_EMAIL_LEN: usize = 254;

#[derive(Deserialize)]
pub struct Credentials {
    email: String,
    password: String,
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    let well_formed = email.len() <= MAX_EMAIL_LEN
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(AppError::validation("email", "must be a valid email address"));
    }
    Ok(email)
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<Credentials>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let email = normalize_email(&form.email)?;
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    let password_hash = hash_password(form.password).await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::validation("email", "already registered")
        } else {
            AppError::from(err)
        }
    })?;

    log::info!("registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    JsonBody(form): JsonBody<Credentials>,
) -> AppResult<Json<CurrentUser>> {
    let email = form.email.trim().to_lowercase();
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND is_active = true")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(form.password, user.password_hash.clone()).await? {
        return Err(AppError::InvalidCredentials);
    }

    let ttl_hours = state.config.token_ttl_hours;
    let token = create_token(user.id, user.email.clone(), &state.config.jwt_secret, ttl_hours)?;

    let cookie = Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(ttl_hours))
        .build();
    cookies.add(cookie);

    log::info!("user {} logged in", user.id);
    Ok(Json(user.into()))
}

pub async fn logout(cookies: Cookies) -> StatusCode {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
    StatusCode::NO_CONTENT
}
