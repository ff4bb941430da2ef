//! REST endpoint handlers organized by resource.

pub mod accounts;
pub mod ingest;
pub mod posts;
pub mod rates;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all administrative resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(rates::routes())
        .merge(posts::routes())
        .merge(accounts::admin_routes())
}
