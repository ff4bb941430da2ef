//! # clippay-gateway
//!
//! Metrics ingestion gateway and earnings-reconciliation engine for a
//! content-monetization platform.
//!
//! Creators enroll social-media posts for tracking; an external scraping
//! workflow pushes raw engagement counters over HTTP; this service attributes
//! each post to a payout rate (the standard per-1000-views rate or a named
//! bounty campaign), computes idempotent earnings from a floating view
//! baseline, and reconciles every tracked bounty post on a fixed interval in
//! the background.
//!
//! ## Architecture
//!
//! ```text
//! External scraper / admin front-end (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TrackingService (service/)
//!     ├── SweepWorker (sweep/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── PostStore + RateRegistry + AccountDirectory (domain/)
//!     ├── Earnings calculator (earnings/)
//!     │
//!     └── PostgreSQL payout ledger
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod earnings;
pub mod error;
pub mod persistence;
pub mod service;
pub mod sweep;
