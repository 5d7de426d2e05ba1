//! Normalized post types produced by the platform extractors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Author attribution for a scraped post.
///
/// `name` always carries a value; extractors fall back to "Unknown Author"
/// when no author container matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub name: String,
    pub username: Option<String>,
    pub profile_url: Option<String>,
    pub avatar_url: Option<String>,
}

impl PostAuthor {
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            name: "Unknown Author".to_string(),
            username: None,
            profile_url: None,
            avatar_url: None,
        }
    }
}

/// Engagement counters. Extraction failures and genuinely-zero counts are
/// both stored as `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub claps: u64,
    pub views: u64,
    pub comments: u64,
    pub shares: u64,
}

/// A single scraped post, independent of storage.
///
/// `post_id` is derived deterministically from the normalized `url`;
/// the pair is the dedup key against the content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedPost {
    pub post_id: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: PostAuthor,
    pub platform: Platform,
    pub url: String,
    /// Publication time; set to the fetch time when the page does not expose one.
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub metrics: EngagementMetrics,
    pub featured_image: Option<String>,
    pub reading_time_minutes: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_author_has_placeholder_name_only() {
        let author = PostAuthor::unknown();
        assert_eq!(author.name, "Unknown Author");
        assert!(author.username.is_none());
        assert!(author.profile_url.is_none());
        assert!(author.avatar_url.is_none());
    }

    #[test]
    fn metrics_default_to_zero() {
        let metrics = EngagementMetrics::default();
        assert_eq!(metrics.claps, 0);
        assert_eq!(metrics.views, 0);
        assert_eq!(metrics.comments, 0);
        assert_eq!(metrics.shares, 0);
    }
}
