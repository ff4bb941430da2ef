//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::TrackingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tracking service for all business logic.
    pub service: Arc<TrackingService>,
    /// Event bus for operator tooling.
    pub event_bus: EventBus,
}
