use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::users::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::users::services;

#[instrument(skip(state))]
pub async fn find_all(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = services::list(&state.db, &requester).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn find_by_id(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = services::find_by_id(&state.db, id, &requester)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(user.into()))
}

/// Public registration path: no bearer token required.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;
    let user = services::create(&state.db, payload).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;
    let user = services::update(&state.db, id, payload, &requester).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let affected = services::remove(&state.db, id, &requester).await?;
    Ok(Json(affected))
}
