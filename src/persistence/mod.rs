//! Persistence layer: PostgreSQL payout ledger.
//!
//! Runtime state lives in memory; the database's job is the append-only
//! record of what a settlement paid out. Settlement deletes tracked posts,
//! so the ledger row written beforehand is the only durable trace of the
//! payout.

pub mod models;
pub mod postgres;
