//! Type-safe tracked-post identifier.
//!
//! [`PostKey`] is the `(platform, url)` pair that uniquely identifies a
//! tracked post. The URL is the upsert conflict target within its platform
//! partition, so the key trims surrounding whitespace on construction to
//! keep lookups stable against sloppy input.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Platform;

/// Unique identifier for a tracked post: platform plus post URL.
///
/// Used as the dictionary key in [`super::PostStore`] and as the event
/// discriminator in [`super::PostEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostKey {
    /// Platform partition the post lives in.
    pub platform: Platform,
    /// Post URL, unique within its platform partition.
    pub url: String,
}

impl PostKey {
    /// Creates a new key, trimming surrounding whitespace from the URL.
    #[must_use]
    pub fn new(platform: Platform, url: &str) -> Self {
        Self {
            platform,
            url: url.trim().to_string(),
        }
    }
}

impl fmt::Display for PostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.url)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn trims_url_whitespace() {
        let key = PostKey::new(Platform::Youtube, "  https://youtube.com/watch?v=abc  ");
        assert_eq!(key.url, "https://youtube.com/watch?v=abc");
    }

    #[test]
    fn same_url_different_platform_is_distinct() {
        let a = PostKey::new(Platform::Youtube, "https://example.com/v/1");
        let b = PostKey::new(Platform::Tiktok, "https://example.com/v/1");
        assert_ne!(a, b);
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let key = PostKey::new(Platform::Instagram, "https://instagram.com/reel/x");
        let mut map = HashMap::new();
        map.insert(key.clone(), "test");
        assert_eq!(map.get(&key), Some(&"test"));
    }
}
