//! Publishing platforms the ingestion pipeline knows how to scrape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A supported third-party publishing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Medium,
    Mirror,
    Paragraph,
}

/// All platforms, in the order a batch run visits them for one company.
pub const ALL_PLATFORMS: [Platform; 3] = [Platform::Medium, Platform::Mirror, Platform::Paragraph];

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Medium => "medium",
            Platform::Mirror => "mirror",
            Platform::Paragraph => "paragraph",
        }
    }

    /// Base URL relative profile links are resolved against.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Platform::Medium => "https://medium.com",
            Platform::Mirror => "https://mirror.xyz",
            Platform::Paragraph => "https://paragraph.xyz",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "medium" => Ok(Platform::Medium),
            "mirror" => Ok(Platform::Mirror),
            "paragraph" => Ok(Platform::Paragraph),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_str() {
        for platform in ALL_PLATFORMS {
            assert_eq!(Platform::from_str(platform.as_str()).unwrap(), platform);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(Platform::from_str("Medium").unwrap(), Platform::Medium);
        assert_eq!(Platform::from_str("MIRROR").unwrap(), Platform::Mirror);
    }

    #[test]
    fn rejects_unknown_platform() {
        let err = Platform::from_str("substack").unwrap_err();
        assert!(err.to_string().contains("substack"));
    }
}
