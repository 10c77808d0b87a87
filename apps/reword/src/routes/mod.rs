pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::discord::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/interactions", post(handlers::handle_interaction))
        .with_state(state)
}
