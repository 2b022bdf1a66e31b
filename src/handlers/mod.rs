pub mod appointment;
pub mod health;
pub mod leads;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::method_not_allowed;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/leads",
            post(leads::submit_lead).fallback(method_not_allowed),
        )
        .route(
            "/api/appointment",
            post(appointment::scheduling_webhook)
                .fallback(method_not_allowed)
                .layer(CatchPanicLayer::custom(appointment::panic_response)),
        )
        .with_state(state)
}
