use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::repository::user as users;
use crate::utils::jwt::create_token;
use crate::utils::password::verify_password;
use crate::utils::validation::ValidationError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub is_staff: bool,
}

const MIN_PASSWORD_LEN: usize = 8;

/// Register a new (non-staff) account
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = payload.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(ValidationError::new("email", "Enter a valid email address.").into());
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("Ensure this field has at least {} characters.", MIN_PASSWORD_LEN),
        )
        .into());
    }

    if users::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let user = users::create(&state.db, &email, &payload.password, false).await?;
    tracing::info!(user_id = %user.id, "User registered");

    let token = create_token(
        user.id,
        &user.email,
        user.is_staff,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserInfo {
                id: user.id,
                email: user.email,
                is_staff: user.is_staff,
            },
        }),
    ))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = users::find_by_email(&state.db, &payload.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    let token = create_token(
        user.id,
        &user.email,
        user.is_staff,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: UserInfo {
            id: user.id,
            email: user.email,
            is_staff: user.is_staff,
        },
    }))
}
