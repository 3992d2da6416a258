use std::time::Duration;

use fuelmap_core::Table;
use reqwest::{Client, Url};

use crate::error::FeedError;
use crate::retry::retry_with_backoff;
use crate::table::{parse_table, TableFormat};

/// HTTP client for the ministry CSV exports.
///
/// Every request is bounded by the configured timeout. 404 and other non-2xx
/// responses become typed errors; transient failures (timeouts, connection
/// errors, 5xx, 429) are retried with exponential back-off.
pub struct FeedClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay for exponential back-off: `backoff_base_ms * 2^(attempt - 1)`.
    backoff_base_ms: u64,
}

impl FeedClient {
    /// Creates a `FeedClient` with the given timeout, `User-Agent`, and retry policy.
    ///
    /// Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Downloads a feed and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`FeedError::InvalidUrl`] if `url` does not parse (not retried).
    /// - [`FeedError::NotFound`] on HTTP 404 (not retried).
    /// - [`FeedError::UnexpectedStatus`] on any other non-2xx status, after
    ///   retries for 5xx and 429.
    /// - [`FeedError::Http`] on network or TLS failure after all retries.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FeedError> {
        let parsed = Url::parse(url).map_err(|e| FeedError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let parsed = parsed.clone();
            async move {
                let response = self.client.get(parsed.clone()).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(FeedError::NotFound {
                        url: parsed.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(FeedError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: parsed.to_string(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Downloads a feed and parses it into a [`Table`].
    ///
    /// `description` names the feed in logs and errors (e.g. `"stations"`).
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_text`] or
    /// [`crate::table::parse_table`].
    pub async fn fetch_table(
        &self,
        url: &str,
        description: &str,
        format: &TableFormat,
    ) -> Result<Table, FeedError> {
        tracing::info!(url, description, "downloading feed");
        let text = self.fetch_text(url).await?;
        tracing::debug!(description, bytes = text.len(), "feed downloaded");
        parse_table(&text, format, description)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
