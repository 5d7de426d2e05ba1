use thiserror::Error;

pub mod app_config;
pub mod companies;
pub mod config;
pub mod platform;
pub mod post;

pub use app_config::{AppConfig, Environment};
pub use companies::{load_companies, CompaniesFile, CompanyConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::{Platform, ALL_PLATFORMS};
pub use post::{EngagementMetrics, NormalizedPost, PostAuthor};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read companies file at {path}: {source}")]
    CompaniesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse companies file: {0}")]
    CompaniesFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
