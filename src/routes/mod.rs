// src/routes/mod.rs
pub mod ask;

use crate::state::SharedState;
use ask::{ask_handler, status_handler};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(status_handler))
        .route("/ask", post(ask_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
