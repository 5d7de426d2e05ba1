//! Scraping primitives: fetch client, URL normalization, post identity,
//! and per-platform HTML extractors.

pub mod error;
pub mod extract;
pub mod fetch;
pub mod identity;
pub mod normalize;

pub use error::ScrapeError;
pub use extract::{extract_posts, ContainerChain, PlatformRules, MIN_CONTENT_LEN};
pub use fetch::FetchClient;
pub use identity::derive_post_id;
pub use normalize::{normalize_url, resolve_and_normalize};
