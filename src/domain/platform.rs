//! Supported social-media platforms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Social-media platform a tracked post belongs to.
///
/// Part of the tracked-post key: the same URL may in principle exist on
/// more than one platform, so every store operation is scoped by platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// YouTube (regular videos and Shorts).
    Youtube,
    /// TikTok.
    Tiktok,
    /// Instagram (Reels).
    Instagram,
}

impl Platform {
    /// All supported platforms, used when iterating every partition.
    pub const ALL: [Self; 3] = [Self::Youtube, Self::Tiktok, Self::Instagram];

    /// Canonical lowercase name used in URLs, queries, and storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Instagram => "instagram",
        }
    }

    /// Three-letter uppercase prefix embedded in verification codes.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Youtube => "YOU",
            Self::Tiktok => "TIK",
            Self::Instagram => "INS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" => Ok(Self::Youtube),
            "tiktok" => Ok(Self::Tiktok),
            "instagram" => Ok(Self::Instagram),
            other => Err(GatewayError::InvalidPlatform(other.to_string())),
        }
    }
}
