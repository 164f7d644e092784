pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::profile::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(handlers::handle_home))
        .route("/quiz", get(handlers::handle_quiz_page))
        .route("/result", get(handlers::handle_result_page))
        // JSON API
        .route("/profile", post(handlers::handle_create_profile))
        .route("/submit_quiz", post(handlers::handle_submit_quiz))
        .route("/recommendations", get(handlers::handle_recommendations))
        .with_state(state)
}
