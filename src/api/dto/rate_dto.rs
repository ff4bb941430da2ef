//! Payout rate DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{RateDefinition, RateShape};
use crate::error::GatewayError;

/// Request body for `PUT /api/v1/rates`.
///
/// `shape` selects the policy: `"flat"` requires `amount_usd` and
/// `per_views`; `"proportional"` requires `amount_per_1000`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertRateRequest {
    /// Rate key: a bounty tag, or `standard` for the default rate.
    pub key: String,
    /// Policy discriminant: `flat` or `proportional`.
    pub shape: String,
    /// USD per block of gained views (flat only).
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub amount_usd: Option<Decimal>,
    /// Block size in views (flat only).
    #[serde(default)]
    pub per_views: Option<u64>,
    /// USD per 1,000 absolute views (proportional only).
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub amount_per_1000: Option<Decimal>,
}

impl UpsertRateRequest {
    /// Resolves the request into a [`RateShape`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the discriminant is
    /// unknown or a required field for the chosen shape is missing.
    pub fn shape(&self) -> Result<RateShape, GatewayError> {
        match self.shape.as_str() {
            "flat" => {
                let amount_usd = self.amount_usd.ok_or_else(|| {
                    GatewayError::InvalidRequest("flat rate requires amount_usd".to_string())
                })?;
                let per_views = self.per_views.ok_or_else(|| {
                    GatewayError::InvalidRequest("flat rate requires per_views".to_string())
                })?;
                Ok(RateShape::Flat {
                    amount_usd,
                    per_views,
                })
            }
            "proportional" => {
                let amount_per_1000 = self.amount_per_1000.ok_or_else(|| {
                    GatewayError::InvalidRequest(
                        "proportional rate requires amount_per_1000".to_string(),
                    )
                })?;
                Ok(RateShape::Proportional { amount_per_1000 })
            }
            other => Err(GatewayError::InvalidRequest(format!(
                "unknown rate shape: {other}"
            ))),
        }
    }
}

/// Response body for rate endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct RateResponse {
    /// Normalized rate key.
    pub key: String,
    /// Policy discriminant: `flat` or `proportional`.
    pub shape: String,
    /// USD per block of gained views (flat only).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub amount_usd: Option<Decimal>,
    /// Block size in views (flat only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_views: Option<u64>,
    /// USD per 1,000 absolute views (proportional only).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub amount_per_1000: Option<Decimal>,
    /// When the definition was last created or overwritten.
    pub updated_at: DateTime<Utc>,
}

impl From<RateDefinition> for RateResponse {
    fn from(def: RateDefinition) -> Self {
        let (shape, amount_usd, per_views, amount_per_1000) = match def.shape {
            RateShape::Flat {
                amount_usd,
                per_views,
            } => ("flat", Some(amount_usd), Some(per_views), None),
            RateShape::Proportional { amount_per_1000 } => {
                ("proportional", None, None, Some(amount_per_1000))
            }
        };
        Self {
            key: def.key.to_string(),
            shape: shape.to_string(),
            amount_usd,
            per_views,
            amount_per_1000,
            updated_at: def.updated_at,
        }
    }
}
