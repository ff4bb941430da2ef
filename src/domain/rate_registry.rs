//! Concurrent payout-rate storage.
//!
//! [`RateRegistry`] holds the standard rate and all named bounty rates in
//! one map keyed by normalized [`RateKey`]. Absence of a key means "no
//! payout": a post whose tag has no definition simply accrues nothing,
//! by design, rather than failing the sweep.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::rate::{RateDefinition, RateKey};

/// Central store for all payout rate definitions.
#[derive(Debug)]
pub struct RateRegistry {
    rates: RwLock<HashMap<RateKey, RateDefinition>>,
}

impl RateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rates: RwLock::new(HashMap::new()),
        }
    }

    /// Idempotent create-or-replace.
    ///
    /// The definition's key is already normalized by
    /// [`RateDefinition::new`], so differently-cased tags overwrite the
    /// same slot.
    pub async fn upsert(&self, def: RateDefinition) {
        let mut map = self.rates.write().await;
        map.insert(def.key.clone(), def);
    }

    /// Looks up a rate definition. `None` means "no payout".
    pub async fn get(&self, key: &RateKey) -> Option<RateDefinition> {
        let map = self.rates.read().await;
        map.get(key).cloned()
    }

    /// Deletes a rate definition, returning it if present.
    ///
    /// Deleting a rate still referenced by tracked posts is allowed; the
    /// reconciliation sweep treats the dangling tag as a miss from then on.
    pub async fn remove(&self, key: &RateKey) -> Option<RateDefinition> {
        let mut map = self.rates.write().await;
        map.remove(key)
    }

    /// Returns all definitions, unordered.
    pub async fn list(&self) -> Vec<RateDefinition> {
        let map = self.rates.read().await;
        map.values().cloned().collect()
    }

    /// Returns the number of definitions.
    pub async fn len(&self) -> usize {
        self.rates.read().await.len()
    }

    /// Returns `true` if no definitions exist.
    pub async fn is_empty(&self) -> bool {
        self.rates.read().await.is_empty()
    }
}

impl Default for RateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
