//! Monitored-company configuration loaded from `companies.yaml`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::ConfigError;

/// One monitored company and its per-platform profile links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub name: String,
    pub medium_url: Option<String>,
    pub mirror_url: Option<String>,
    pub paragraph_url: Option<String>,
    pub notes: Option<String>,
}

impl CompanyConfig {
    /// Generate a URL-safe slug from the company name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// The configured profile link for a platform, if any.
    #[must_use]
    pub fn link_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Medium => self.medium_url.as_deref(),
            Platform::Mirror => self.mirror_url.as_deref(),
            Platform::Paragraph => self.paragraph_url.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompaniesFile {
    pub companies: Vec<CompanyConfig>,
}

/// Load and validate the companies configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_companies(path: &Path) -> Result<CompaniesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CompaniesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let companies_file: CompaniesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CompaniesFileParse)?;

    validate_companies(&companies_file)?;

    Ok(companies_file)
}

fn validate_companies(companies_file: &CompaniesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for company in &companies_file.companies {
        if company.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "company name must be non-empty".to_string(),
            ));
        }

        let lower_name = company.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate company name: '{}'",
                company.name
            )));
        }

        let slug = company.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate company slug: '{}' (from company '{}')",
                slug, company.name
            )));
        }

        for (label, link) in [
            ("medium_url", &company.medium_url),
            ("mirror_url", &company.mirror_url),
            ("paragraph_url", &company.paragraph_url),
        ] {
            if let Some(link) = link {
                if !link.starts_with("http://") && !link.starts_with("https://") {
                    return Err(ConfigError::Validation(format!(
                        "company '{}' has invalid {label} '{link}'; must be an http(s) URL",
                        company.name
                    )));
                }
            }
        }
    }

    Ok(())
}
