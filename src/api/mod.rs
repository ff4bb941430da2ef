//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Administrative endpoints are mounted under `/api/v1`; the scraper-facing
//! ingestion and verification surface lives at the root, where its paths
//! are part of the external contract.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::ingest::routes())
        .merge(handlers::accounts::public_routes())
        .merge(handlers::system::routes())
}
