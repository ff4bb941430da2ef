//! Service layer: orchestration of stores, calculator, ledger, and events.

pub mod tracking_service;

pub use tracking_service::{
    IngestItem, IngestReport, RecomputeOutcome, SettlementSummary, TrackingService,
};
