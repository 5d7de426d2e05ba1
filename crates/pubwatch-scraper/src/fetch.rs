//! Outbound HTML fetching.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScrapeError;

/// HTTP client for profile-page fetches.
///
/// Sends a browser-like `User-Agent` (the target platforms block default
/// library agents) and enforces a total request timeout so one unresponsive
/// site cannot stall a batch run. There is no retry at this layer; callers
/// decide whether a failed fetch skips the platform or surfaces to the
/// requester.
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    /// Creates a `FetchClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches a page and returns its body as a string.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScrapeError::Http`] — network failure, timeout, or body read failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_html_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/@acme"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = FetchClient::new(5, "test-agent/1.0").unwrap();
        let body = client
            .fetch_html(&format!("{}/@acme", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua"))
            .and(wiremock::matchers::header("user-agent", "test-agent/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = FetchClient::new(5, "test-agent/1.0").unwrap();
        client
            .fetch_html(&format!("{}/ua", server.uri()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = FetchClient::new(5, "test-agent/1.0").unwrap();
        let err = client
            .fetch_html(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::UnexpectedStatus { status: 404, .. }
        ));
    }
}
