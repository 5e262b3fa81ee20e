use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::AppResult;
use crate::projects::dto::{CreateProjectRequest, ProjectResponse, UpdateProjectRequest};
use crate::projects::services;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn find_all(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let projects = services::list(&state.db, &requester).await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn find_by_id(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ProjectResponse>> {
    let project = services::find_by_id(&state.db, id, &requester).await?;
    Ok(Json(project.into()))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    payload.validate()?;
    let project = services::create(&state.db, payload, &requester).await?;
    Ok(Json(project.into()))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProjectRequest>,
) -> AppResult<Json<ProjectResponse>> {
    payload.validate()?;
    let project = services::update(&state.db, id, payload, &requester).await?;
    Ok(Json(project.into()))
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
