//! Rate-limited, retrying JSON-over-HTTP client.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::backoff::Backoff;
use crate::domain::ExchangeId;
use crate::error::{ConfigError, Error, FetchError, Result};
use crate::infrastructure::config::exchange::{BackoffConfig, ExchangeConfig};

/// Maps a non-success status and response body to a fetch error.
///
/// Adapters use this to recognise exchange-specific error payloads, such
/// as an "invalid symbol" code hidden behind a generic 400.
pub type ErrorClassifier = fn(u16, &str) -> FetchError;

/// HTTP transport shared by the requests of one adapter.
pub struct RestTransport {
    exchange: ExchangeId,
    client: Client,
    base_url: Url,
    limiter: Arc<DefaultDirectRateLimiter>,
    timeout: Duration,
    max_retries: u32,
    backoff: BackoffConfig,
    classify: ErrorClassifier,
}

impl RestTransport {
    /// Build a transport from an exchange's configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error for an unparsable base URL or a zero request
    /// rate, and an HTTP error if the client cannot be built.
    pub fn new(config: &ExchangeConfig, classify: ErrorClassifier) -> Result<Self> {
        let base_url = Url::parse(config.api_url()).map_err(|e| ConfigError::InvalidValue {
            field: "api_url",
            reason: e.to_string(),
        })?;
        let per_second =
            NonZeroU32::new(config.requests_per_second()).ok_or(ConfigError::InvalidValue {
                field: "requests_per_second",
                reason: "must be at least 1".into(),
            })?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("cryptogap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            exchange: config.exchange_id(),
            client,
            base_url,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
            timeout: config.request_timeout(),
            max_retries: config.max_retries,
            backoff: config.backoff.clone(),
            classify,
        })
    }

    pub fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    /// GET `path` with `query` and decode the JSON body, retrying transient
    /// failures up to the configured number of times.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, FetchError> {
        let mut backoff = Backoff::new(self.backoff.clone());
        loop {
            match self.get_once(path, query).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && backoff.attempts() < self.max_retries => {
                    let delay = backoff.next_delay();
                    warn!(
                        exchange = %self.exchange,
                        path,
                        error = %err,
                        attempt = backoff.attempts(),
                        delay_ms = delay.as_millis() as u64,
                        "Transient fetch error, retrying"
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, FetchError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        // Excess calls queue here instead of being dropped.
        self.limiter.until_ready().await;

        debug!(exchange = %self.exchange, url = %url, "GET");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err((self.classify)(status.as_u16(), &text));
        }

        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::from(err)
        }
    }
}
