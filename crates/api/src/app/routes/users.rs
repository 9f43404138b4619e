use std::sync::Arc;

use axum::{Json, extract::Extension, extract::rejection::JsonRejection, http::StatusCode};
use chrono::Utc;
use tracing::instrument;

use dreammap_auth::{hash_password, verify_password};
use dreammap_core::user::MAX_PASSWORD_BYTES;
use dreammap_core::{NewUser, UserProfile, validate_credentials};

use crate::app::dto::{CredentialsRequest, TokenResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[instrument(skip_all, fields(operation = "register"))]
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    const FAILED: &str = "Failed to create user";

    let Json(body) = body?;
    let email = validate_credentials(&body.email, &body.password)?;

    // Argon2 is CPU-bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&body.password))
        .await
        .map_err(|e| ApiError::internal("register", FAILED, e))?
        .map_err(|e| ApiError::internal("register", FAILED, e))?;

    let user = services
        .store
        .create_user(NewUser {
            email,
            password_hash,
        })
        .await
        .map_err(|e| ApiError::internal("register", FAILED, e))?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.profile())))
}

/// Any credential mismatch produces the same 401 body: unknown email, wrong
/// password, or input that could never have been registered.
#[instrument(skip_all, fields(operation = "login"))]
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    const FAILED: &str = "Failed to log in";

    let Json(body) = body?;
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("email and password are required"));
    }
    if body.password.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let user = services
        .store
        .find_user_by_email(email)
        .await
        .map_err(|e| ApiError::internal("login", FAILED, e))?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let stored_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&body.password, &stored_hash))
        .await
        .map_err(|e| ApiError::internal("login", FAILED, e))?;
    if !verified {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = services
        .tokens
        .issue(user.id, Utc::now())
        .map_err(|e| ApiError::internal("login", FAILED, e))?;

    Ok(Json(TokenResponse { token }))
}
