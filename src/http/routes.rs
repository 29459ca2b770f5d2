use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Capture inputs
        .route("/capture/snapshot", post(handlers::post_snapshot))
        .route("/capture/signal", post(handlers::post_signal))
        .route("/capture/status", get(handlers::get_capture_status))
        // Transcript envelope
        .route("/transcript", get(handlers::get_transcript))
        .route("/transcript/store", post(handlers::store_transcript))
        .route("/transcript/download", post(handlers::download_transcript))
        // Saved meetings
        .route("/meetings", get(handlers::list_meetings))
        .route(
            "/meetings/:meeting_id/download",
            post(handlers::download_meeting),
        )
        .route("/meetings/:meeting_id", delete(handlers::delete_meeting))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
