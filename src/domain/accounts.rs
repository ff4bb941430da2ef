//! Verified social-account directory.
//!
//! The external verification workflow checks that a creator placed their
//! verification code in the linked account's bio, then pushes the result
//! back over HTTP. The directory only records the outcome; the check
//! itself happens outside this service. The scraper enumerates verified
//! accounts per platform to decide what to crawl.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::Platform;
use crate::error::GatewayError;

/// A creator's linked social-media account.
#[derive(Debug, Clone, Serialize)]
pub struct SocialAccount {
    /// Opaque stable creator identifier.
    pub owner_id: String,
    /// Platform the account lives on.
    pub platform: Platform,
    /// Account username (without a leading `@`).
    pub username: String,
    /// Code the creator must place in their bio to verify ownership.
    pub verification_code: String,
    /// Whether the external workflow confirmed the code.
    pub verified: bool,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Verification timestamp, when verified.
    pub verified_at: Option<DateTime<Utc>>,
}

/// A verified `(owner, username)` pair the scraper should crawl.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveAccount {
    /// Opaque stable creator identifier.
    pub owner_id: String,
    /// Account username.
    pub username: String,
}

type AccountKey = (String, Platform, String);

/// Concurrent registry of linked social accounts.
#[derive(Debug)]
pub struct AccountDirectory {
    accounts: RwLock<HashMap<AccountKey, SocialAccount>>,
}

impl AccountDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Registers an account, or refreshes the verification code of an
    /// existing unverified registration. Idempotent per
    /// `(owner, platform, username)`.
    ///
    /// Returns the stored account, including its verification code.
    pub async fn register(
        &self,
        owner_id: &str,
        platform: Platform,
        username: &str,
    ) -> SocialAccount {
        let username = username.trim_start_matches('@').to_string();
        let code = verification_code(owner_id, platform);
        let key = (owner_id.to_string(), platform, username.clone());

        let mut map = self.accounts.write().await;
        let account = map.entry(key).or_insert_with(|| SocialAccount {
            owner_id: owner_id.to_string(),
            platform,
            username,
            verification_code: code.clone(),
            verified: false,
            registered_at: Utc::now(),
            verified_at: None,
        });
        if !account.verified {
            account.verification_code = code;
        }
        account.clone()
    }

    /// Marks an account verified. Pushed by the external workflow once the
    /// code is found in the account's bio.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AccountNotFound`] when no matching
    /// registration exists.
    pub async fn confirm_verification(
        &self,
        owner_id: &str,
        platform: Platform,
        username: &str,
    ) -> Result<(), GatewayError> {
        let username = username.trim_start_matches('@');
        let key = (owner_id.to_string(), platform, username.to_string());
        let mut map = self.accounts.write().await;
        let account = map
            .get_mut(&key)
            .ok_or_else(|| GatewayError::AccountNotFound(owner_id.to_string()))?;
        if !account.verified {
            account.verified = true;
            account.verified_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Returns all verified accounts on a platform, unordered.
    pub async fn list_active(&self, platform: Platform) -> Vec<ActiveAccount> {
        let map = self.accounts.read().await;
        map.values()
            .filter(|a| a.platform == platform && a.verified)
            .map(|a| ActiveAccount {
                owner_id: a.owner_id.clone(),
                username: a.username.clone(),
            })
            .collect()
    }
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the bio verification code: `CLIP<owner><platform prefix>`.
fn verification_code(owner_id: &str, platform: Platform) -> String {
    format!("CLIP{}{}", owner_id, platform.code_prefix())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_strips_leading_at_and_builds_code() {
        let dir = AccountDirectory::new();
        let account = dir.register("creator-1", Platform::Tiktok, "@clipper").await;
        assert_eq!(account.username, "clipper");
        assert_eq!(account.verification_code, "CLIPcreator-1TIK");
        assert!(!account.verified);
    }

    #[tokio::test]
    async fn confirm_marks_verified_and_appears_active() {
        let dir = AccountDirectory::new();
        let _ = dir.register("creator-1", Platform::Youtube, "clipper").await;

        let result = dir
            .confirm_verification("creator-1", Platform::Youtube, "clipper")
            .await;
        assert!(result.is_ok());

        let active = dir.list_active(Platform::Youtube).await;
        assert_eq!(active.len(), 1);
        let Some(account) = active.first() else {
            panic!("expected active account");
        };
        assert_eq!(account.owner_id, "creator-1");
    }

    #[tokio::test]
    async fn confirm_unknown_account_fails() {
        let dir = AccountDirectory::new();
        let result = dir
            .confirm_verification("nobody", Platform::Youtube, "ghost")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unverified_accounts_are_not_active() {
        let dir = AccountDirectory::new();
        let _ = dir.register("creator-1", Platform::Instagram, "clipper").await;
        assert!(dir.list_active(Platform::Instagram).await.is_empty());
    }

    #[tokio::test]
    async fn active_list_is_scoped_by_platform() {
        let dir = AccountDirectory::new();
        let _ = dir.register("creator-1", Platform::Youtube, "clipper").await;
        let _ = dir
            .confirm_verification("creator-1", Platform::Youtube, "clipper")
            .await;

        assert!(dir.list_active(Platform::Tiktok).await.is_empty());
        assert_eq!(dir.list_active(Platform::Youtube).await.len(), 1);
    }
}
