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
        .route("/users/read/all", get(handlers::find_all))
        .route("/users/read/:id", get(handlers::find_by_id))
        .route("/users/create", post(handlers::create))
        .route("/users/update/:id", put(handlers::update))
        .route("/users/delete/:id", delete(handlers::remove))
}
