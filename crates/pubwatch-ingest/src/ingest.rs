//! Single-company ingestion: fetch, extract, dedup, persist.

use std::time::Duration;

use pubwatch_core::{AppConfig, NormalizedPost, Platform};
use pubwatch_scraper::{extract_posts, FetchClient};

use crate::error::IngestError;
use crate::store::{Company, CompanyDirectory, ContentStore, StoreError, StoredRecord};

/// Tunables the orchestrators read from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub max_posts: usize,
    pub min_content_len: usize,
    pub inter_company_delay: Duration,
}

impl IngestOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_posts: config.max_posts_per_platform,
            min_content_len: config.min_content_len,
            inter_company_delay: Duration::from_millis(config.inter_company_delay_ms),
        }
    }
}

/// Drives one scrape: company lookup, page fetch, extraction, and the
/// exists-check / insert dedup loop.
///
/// Generic over the directory and store so batch semantics are testable
/// without Postgres.
pub struct Ingestor<D, S> {
    directory: D,
    store: S,
    fetch: FetchClient,
    options: IngestOptions,
}

impl<D, S> Ingestor<D, S>
where
    D: CompanyDirectory,
    S: ContentStore,
{
    pub fn new(directory: D, store: S, fetch: FetchClient, options: IngestOptions) -> Self {
        Self {
            directory,
            store,
            fetch,
            options,
        }
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    pub(crate) fn directory(&self) -> &D {
        &self.directory
    }

    /// Scrapes one platform for one company and persists the new posts.
    ///
    /// Returns only the records inserted by this call; posts that were
    /// already stored are skipped silently. `max_posts` overrides the
    /// configured per-platform cap when given.
    ///
    /// # Errors
    ///
    /// - [`IngestError::CompanyNotFound`] — no active company with that name.
    /// - [`IngestError::MissingPlatformLink`] — company has no link for the platform.
    /// - [`IngestError::Fetch`] — the profile page could not be fetched.
    /// - [`IngestError::Directory`] — the company lookup itself failed.
    pub async fn scrape_platform(
        &self,
        company_name: &str,
        platform: Platform,
        max_posts: Option<usize>,
    ) -> Result<Vec<StoredRecord>, IngestError> {
        let company = self
            .directory
            .find_by_name(company_name)
            .await
            .map_err(IngestError::Directory)?
            .ok_or_else(|| IngestError::CompanyNotFound(company_name.to_string()))?;

        let profile_url = company
            .link_for(platform)
            .ok_or_else(|| IngestError::MissingPlatformLink {
                company: company.name.clone(),
                platform,
            })?
            .to_string();

        let cap = max_posts.unwrap_or(self.options.max_posts);

        tracing::info!(
            company = %company.slug,
            platform = %platform,
            url = %profile_url,
            "scraping platform profile"
        );

        let html = self.fetch.fetch_html(&profile_url).await?;
        let posts = extract_posts(platform, &html, &profile_url, cap);

        tracing::debug!(
            company = %company.slug,
            platform = %platform,
            extracted = posts.len(),
            "extraction complete"
        );

        Ok(self.persist_posts(&company, posts).await)
    }

    /// The dedup loop: content gate, exists check, insert. Per-post failures
    /// are logged and do not abort the remaining posts.
    async fn persist_posts(&self, company: &Company, posts: Vec<NormalizedPost>) -> Vec<StoredRecord> {
        let mut inserted = Vec::new();

        for post in posts {
            // The extractors apply a fixed floor; re-apply the configured one
            // so a stricter runtime setting holds at the persistence boundary.
            if post.content.chars().count() < self.options.min_content_len {
                tracing::debug!(url = %post.url, "content below minimum length, skipping");
                continue;
            }

            match self.store.exists(&post.post_id, &post.url).await {
                Ok(true) => {
                    tracing::debug!(url = %post.url, "post already stored, skipping");
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    // Without a trustworthy answer, inserting risks double
                    // writes on backends with no unique backstop. Skip.
                    tracing::warn!(url = %post.url, error = %e, "existence check failed, skipping persist");
                    continue;
                }
            }

            match self.store.insert(&company.name, &post).await {
                Ok(record) => inserted.push(record),
                Err(StoreError::Duplicate { post_id }) => {
                    // A concurrent writer won the race; the post is stored.
                    tracing::debug!(post_id = %post_id, "duplicate insert, already stored");
                }
                Err(e) => {
                    tracing::warn!(url = %post.url, error = %e, "insert failed, continuing");
                }
            }
        }

        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{fetch_client, MemDirectory, MemStore, mem_company, serve_profile};
    use pubwatch_core::Platform;

    const MEDIUM_HTML: &str = r#"
      <article data-testid="post-preview">
        <h2>Scaling The Indexer</h2>
        <a href="https://medium.com/acme/scaling-the-indexer?utm_source=profile"></a>
        <p>How we rebuilt the ingestion path to keep up with chain growth.</p>
      </article>
      <article data-testid="post-preview">
        <h2>Postmortem: February Outage</h2>
        <a href="https://medium.com/acme/postmortem-february-outage"></a>
        <p>A full timeline of the outage and the fixes now in place.</p>
      </article>
    "#;

    #[tokio::test]
    async fn second_pass_over_identical_html_inserts_nothing() {
        let server = serve_profile("/acme", MEDIUM_HTML).await;
        let directory = MemDirectory::new(vec![mem_company(
            "Acme Labs",
            Some(format!("{}/acme", server.uri())),
        )]);
        let store = MemStore::default();
        let ingestor = Ingestor::new(directory, store.clone(), fetch_client(), test_options());

        let first = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap();
        assert_eq!(first.len(), 2);

        let second = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap();
        assert!(second.is_empty(), "re-ingesting identical HTML must be a no-op");
        assert_eq!(store.record_count(), 2);
    }

    #[tokio::test]
    async fn unknown_company_is_a_typed_error() {
        let directory = MemDirectory::new(vec![]);
        let ingestor = Ingestor::new(directory, MemStore::default(), fetch_client(), test_options());

        let err = ingestor
            .scrape_platform("Ghost Co", Platform::Medium, None)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::CompanyNotFound(name) if name == "Ghost Co"));
    }

    #[tokio::test]
    async fn missing_platform_link_is_a_typed_error() {
        let directory = MemDirectory::new(vec![mem_company("Acme Labs", None)]);
        let ingestor = Ingestor::new(directory, MemStore::default(), fetch_client(), test_options());

        let err = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingPlatformLink {
                platform: Platform::Medium,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn stored_url_blocks_insert_even_with_different_post_id() {
        let server = serve_profile("/acme", MEDIUM_HTML).await;
        let directory = MemDirectory::new(vec![mem_company(
            "Acme Labs",
            Some(format!("{}/acme", server.uri())),
        )]);
        let store = MemStore::default();
        // Pre-store the first post's URL under an unrelated post_id.
        store.prestore_url(
            "completely-different-id",
            "https://medium.com/acme/scaling-the-indexer",
        );

        let ingestor = Ingestor::new(directory, store.clone(), fetch_client(), test_options());
        let inserted = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap();

        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].title, "Postmortem: February Outage");
    }

    #[tokio::test]
    async fn failed_existence_check_skips_persist() {
        let server = serve_profile("/acme", MEDIUM_HTML).await;
        let directory = MemDirectory::new(vec![mem_company(
            "Acme Labs",
            Some(format!("{}/acme", server.uri())),
        )]);
        let store = MemStore::default();
        store.fail_exists(true);

        let ingestor = Ingestor::new(directory, store.clone(), fetch_client(), test_options());
        let inserted = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap();

        assert!(inserted.is_empty());
        assert_eq!(store.record_count(), 0, "nothing may be written blind");
    }

    #[tokio::test]
    async fn duplicate_insert_race_is_benign() {
        let server = serve_profile("/acme", MEDIUM_HTML).await;
        let directory = MemDirectory::new(vec![mem_company(
            "Acme Labs",
            Some(format!("{}/acme", server.uri())),
        )]);
        let store = MemStore::default();
        // exists() answers false but insert() reports a duplicate, as when a
        // concurrent writer lands between the two calls.
        store.duplicate_on_insert(true);

        let ingestor = Ingestor::new(directory, store.clone(), fetch_client(), test_options());
        let inserted = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap();

        assert!(inserted.is_empty(), "raced posts are not reported as new");
    }

    #[tokio::test]
    async fn configured_content_floor_holds_at_persistence() {
        let html = r#"
          <article data-testid="post-preview">
            <h2>Terse Update</h2>
            <a href="https://medium.com/acme/terse-update"></a>
            <p>Eleven chars!</p>
          </article>
        "#;
        let server = serve_profile("/acme", html).await;
        let directory = MemDirectory::new(vec![mem_company(
            "Acme Labs",
            Some(format!("{}/acme", server.uri())),
        )]);

        let mut options = test_options();
        options.min_content_len = 50;
        let ingestor = Ingestor::new(directory, MemStore::default(), fetch_client(), options);

        let inserted = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap();
        assert!(inserted.is_empty(), "13-char body fails a 50-char floor");
    }

    #[tokio::test]
    async fn fetch_failure_propagates_to_caller() {
        let directory = MemDirectory::new(vec![mem_company(
            "Acme Labs",
            Some("http://127.0.0.1:9/acme".to_string()),
        )]);
        let ingestor = Ingestor::new(directory, MemStore::default(), fetch_client(), test_options());

        let err = ingestor
            .scrape_platform("Acme Labs", Platform::Medium, None)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Fetch(_)));
    }

    fn test_options() -> IngestOptions {
        IngestOptions {
            max_posts: 10,
            min_content_len: 10,
            inter_company_delay: Duration::from_millis(0),
        }
    }
}
