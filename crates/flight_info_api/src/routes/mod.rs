//! API Routes Module
//!
//! - `flight_info`: the flight lookup endpoint
//! - `health`: liveness check

pub mod flight_info;
pub mod health;

use crate::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Build all API routes and return a configured Router
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/flight_info", get(flight_info::flight_info_handler))
        .route("/health", get(health::health_handler))
        .with_state(state)
}
