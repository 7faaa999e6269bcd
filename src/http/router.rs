//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Reader availability and offerings
        .route(
            "/readers/{reader_id}/time-slots",
            get(handlers::get_time_slots),
        )
        .route(
            "/readers/{reader_id}/availability",
            put(handlers::set_availability).get(handlers::list_availability),
        )
        .route(
            "/readers/{reader_id}/packages",
            get(handlers::list_packages),
        )
        // Booking lifecycle
        .route(
            "/readings",
            post(handlers::create_reading).get(handlers::list_readings),
        )
        .route("/readings/{reading_id}", get(handlers::get_reading))
        .route(
            "/readings/{reading_id}/confirm",
            post(handlers::confirm_reading),
        )
        .route(
            "/readings/{reading_id}/start",
            post(handlers::start_reading),
        )
        .route(
            "/readings/{reading_id}/complete",
            post(handlers::complete_reading),
        )
        .route(
            "/readings/{reading_id}/reschedule",
            post(handlers::reschedule_reading),
        )
        .route(
            "/readings/{reading_id}/cancel",
            post(handlers::cancel_reading),
        )
        // Instant reading requests
        .route(
            "/requests",
            post(handlers::create_request).get(handlers::list_requests),
        )
        .route(
            "/requests/{request_id}/respond",
            post(handlers::respond_to_request),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::external::{AutoApproveAuthorizer, StaticTokenProvider};
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(
            repo,
            Arc::new(StaticTokenProvider::new("tok_test")),
            Arc::new(AutoApproveAuthorizer),
        );
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
