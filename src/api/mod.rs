//! HTTP API module
//!
//! Views drive the timer through these endpoints and follow it through the
//! `/events` stream.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/settings",
            get(get_settings_handler)
                .put(update_settings_handler)
                .post(update_settings_handler),
        )
        .route("/state", get(state_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/skip-to-break", post(skip_to_break_handler))
        .route("/timer/skip-to-work", post(skip_to_work_handler))
        .route("/break/end", post(end_break_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
