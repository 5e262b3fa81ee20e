pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects/read/all", get(handlers::find_all))
        .route("/projects/read/:id", get(handlers::find_by_id))
        .route("/projects/create", post(handlers::create))
        .route("/projects/update/:id", put(handlers::update))
        .route("/projects/delete/:id", delete(handlers::remove))
}
