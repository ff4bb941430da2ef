//! Payout rate definitions.
//!
//! Two rate shapes coexist on the platform and are deliberately NOT
//! interchangeable: a *flat* bounty rate pays a fixed amount per block of
//! views gained over the post's enrollment baseline, while the
//! *proportional* standard rate pays per 1,000 absolute current views. Both
//! are carried by a single [`RateShape`] tagged union so the calculator
//! resolves the policy in exactly one place.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Normalized rate lookup key.
///
/// Bounty tags arrive from chat commands with arbitrary casing and
/// whitespace; normalization (case-fold plus trim) happens here, at
/// construction, so lookups from differently-cased tags always resolve to
/// the same definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateKey(String);

impl RateKey {
    /// Literal key under which the default per-1000-views rate is stored.
    pub const STANDARD: &'static str = "standard";

    /// Creates a normalized key from a raw tag.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Returns the key for the standard (non-bounty) rate.
    #[must_use]
    pub fn standard() -> Self {
        Self(Self::STANDARD.to_string())
    }

    /// Whether this key names the standard rate.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        self.0 == Self::STANDARD
    }

    /// The normalized key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payout policy variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RateShape {
    /// Pays `amount_usd` for every `per_views` views gained over the
    /// enrollment baseline.
    Flat {
        /// USD paid per block of gained views.
        amount_usd: Decimal,
        /// Size of the view block the amount applies to.
        per_views: u64,
    },
    /// Pays `amount_per_1000` per 1,000 **absolute** current views,
    /// independent of any baseline.
    Proportional {
        /// USD paid per 1,000 current views.
        amount_per_1000: Decimal,
    },
}

/// A payout rate: normalized key, policy shape, and last-update timestamp.
///
/// Read-only to the earnings calculator; created and overwritten by
/// administrator action. Definitions are validated once at creation so a
/// zero denominator can never reach the calculator through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDefinition {
    /// Normalized lookup key.
    pub key: RateKey,
    /// Payout policy.
    pub shape: RateShape,
    /// When the definition was last created or overwritten.
    pub updated_at: DateTime<Utc>,
}

impl RateDefinition {
    /// Builds a definition from a raw key and shape, validating the shape.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRate`] when the flat block size is
    /// zero or any amount is negative.
    pub fn new(raw_key: &str, shape: RateShape) -> Result<Self, GatewayError> {
        let key = RateKey::new(raw_key);
        if key.as_str().is_empty() {
            return Err(GatewayError::InvalidRate("rate key is empty".to_string()));
        }
        match &shape {
            RateShape::Flat {
                amount_usd,
                per_views,
            } => {
                if *per_views == 0 {
                    return Err(GatewayError::InvalidRate(
                        "per_views must be positive".to_string(),
                    ));
                }
                if amount_usd.is_sign_negative() {
                    return Err(GatewayError::InvalidRate(
                        "amount_usd must not be negative".to_string(),
                    ));
                }
            }
            RateShape::Proportional { amount_per_1000 } => {
                if amount_per_1000.is_sign_negative() {
                    return Err(GatewayError::InvalidRate(
                        "amount_per_1000 must not be negative".to_string(),
                    ));
                }
            }
        }
        Ok(Self {
            key,
            shape,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn key_normalizes_case_and_whitespace() {
        assert_eq!(RateKey::new("  Spring-Promo "), RateKey::new("spring-promo"));
    }

    #[test]
    fn standard_key_is_recognized() {
        assert!(RateKey::standard().is_standard());
        assert!(!RateKey::new("spring").is_standard());
    }

    #[test]
    fn zero_per_views_rejected_at_creation() {
        let result = RateDefinition::new(
            "spring",
            RateShape::Flat {
                amount_usd: dec!(5.00),
                per_views: 0,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn negative_amount_rejected_at_creation() {
        let result = RateDefinition::new(
            "standard",
            RateShape::Proportional {
                amount_per_1000: dec!(-0.60),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_key_rejected() {
        let result = RateDefinition::new(
            "   ",
            RateShape::Proportional {
                amount_per_1000: dec!(0.60),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn valid_flat_rate_accepted() {
        let Ok(def) = RateDefinition::new(
            "Spring",
            RateShape::Flat {
                amount_usd: dec!(5.00),
                per_views: 1000,
            },
        ) else {
            panic!("expected valid rate");
        };
        assert_eq!(def.key, RateKey::new("spring"));
    }

    #[test]
    fn shape_serializes_with_discriminant() {
        let shape = RateShape::Proportional {
            amount_per_1000: dec!(0.60),
        };
        let json = serde_json::to_string(&shape).unwrap_or_default();
        assert!(json.contains("\"shape\":\"proportional\""));
    }
}
