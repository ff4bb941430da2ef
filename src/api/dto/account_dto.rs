//! Social-account DTOs: registration, verification, scraper enumeration.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ActiveAccount;

/// Request body for `POST /api/v1/accounts`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterAccountRequest {
    /// Creator identifier.
    pub owner_id: String,
    /// Platform name.
    pub platform: String,
    /// Account username (a leading `@` is stripped).
    pub username: String,
}

/// Response body for `POST /api/v1/accounts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterAccountResponse {
    /// Creator identifier.
    pub owner_id: String,
    /// Platform name.
    pub platform: String,
    /// Normalized username.
    pub username: String,
    /// Code the creator must place in their bio.
    pub verification_code: String,
}

/// Request body for `POST /users/confirm-verification`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmVerificationRequest {
    /// Creator identifier.
    pub owner_id: String,
    /// Platform name.
    pub platform: String,
    /// Account username.
    pub username: String,
}

/// Query parameters for `GET /users/active`.
#[derive(Debug, Deserialize)]
pub struct ActiveAccountsParams {
    /// Platform to enumerate.
    pub platform: String,
}

/// One verified account in the scraper enumeration.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveAccountDto {
    /// Creator identifier.
    pub owner_id: String,
    /// Account username.
    pub username: String,
}

impl From<ActiveAccount> for ActiveAccountDto {
    fn from(account: ActiveAccount) -> Self {
        Self {
            owner_id: account.owner_id,
            username: account.username,
        }
    }
}

/// Response body for `GET /users/active`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveAccountsResponse {
    /// Platform that was enumerated.
    pub platform: String,
    /// Verified accounts on that platform.
    pub accounts: Vec<ActiveAccountDto>,
}
