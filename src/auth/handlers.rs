use axum::{
    extract::{FromRef, State},
    Json,
};
use tracing::{info, instrument, warn};

use crate::auth::dto::{LoginRequest, TokenResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::users::dto::{is_valid_email, CreateUserRequest};
use crate::users::repo::User;
use crate::users::services;

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    payload.email = payload.email.trim().to_lowercase();
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("Invalid email".into()));
    }

    // Unknown email and wrong password collapse into the same failure.
    let user = User::find_active_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            AppError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password)? {
        warn!(user_id = user.id_user, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id_user, &user.email, user.role)?;

    info!(user_id = user.id_user, "user logged in");
    Ok(Json(TokenResponse { access_token }))
}

/// Registers through the user directory (uniqueness check + hashing), then
/// logs the fresh user in with the original plaintext password.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> AppResult<Json<TokenResponse>> {
    payload.validate()?;
    let plain_password = payload.password.clone();

    let user = services::create(&state.db, payload).await?;

    // Re-authenticate rather than trusting the write blindly.
    let stored = User::find_active_by_email(&state.db, &user.email)
        .await?
        .ok_or(AppError::RegistrationFailed)?;
    if !verify_password(&plain_password, &stored.password)? {
        return Err(AppError::RegistrationFailed);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(stored.id_user, &stored.email, stored.role)?;

    info!(user_id = stored.id_user, email = %stored.email, "user registered");
    Ok(Json(TokenResponse { access_token }))
}
