//! automix-api library - HTTP surface for the AutoMix sequencing engine
//!
//! Exposes the autoplaylist request handler, a health endpoint, and an SSE
//! stream of generated plans for listeners such as visualizers.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use automix_core::events::EventBus;

pub mod api;

/// Application state shared across HTTP handlers
///
/// All engine state is per-request (immutable `MixConfig` values); the only
/// shared piece is the event bus used to broadcast finished plans.
#[derive(Clone)]
pub struct AppState {
    /// Event distribution bus for generated plans
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    /// Create new application state with the given event channel capacity
    pub fn new(event_capacity: usize) -> Self {
        Self {
            event_bus: Arc::new(EventBus::new(event_capacity)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/health", get(api::health))
        .route("/api/autoplaylist", post(api::generate_autoplaylist))
        .route("/api/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        // Visualizer frontends are served from other origins
        .layer(CorsLayer::permissive())
        .with_state(state)
}
