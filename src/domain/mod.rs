//! Domain layer: core types, stores, and the event system.
//!
//! This module contains the server-side domain model: the platform enum,
//! tracked-post identity and entity, payout rate definitions, the verified
//! social-account directory, the event bus for broadcasting state changes,
//! and the concurrent stores for posts and rates.

pub mod accounts;
pub mod event_bus;
pub mod platform;
pub mod post_event;
pub mod post_key;
pub mod post_store;
pub mod rate;
pub mod rate_registry;
pub mod tracked_post;

pub use accounts::{AccountDirectory, ActiveAccount, SocialAccount};
pub use event_bus::EventBus;
pub use platform::Platform;
pub use post_event::PostEvent;
pub use post_key::PostKey;
pub use post_store::PostStore;
pub use rate::{RateDefinition, RateKey, RateShape};
pub use rate_registry::RateRegistry;
pub use tracked_post::{EngagementCounters, TrackedPost};
