//! Rate-limited HTTP client for vendor storefronts.

use std::time::Duration;

use reqwest::{Client, Method, Url};

use crate::error::ScraperError;
use crate::rate_limit::DomainRateLimiter;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json,text/html;q=0.9,*/*;q=0.8";

/// HTTP GET/HEAD wrapper shared by every vendor strategy.
///
/// Requests to the same host are spaced by the configured delay. There are no
/// retries: callers treat any failure as "skip this candidate". The `fetch_*`
/// and [`FetchClient::is_alive`] helpers collapse errors to `None`/`false`
/// after logging; the `get_*` methods return them for callers that care.
pub struct FetchClient {
    client: Client,
    limiter: DomainRateLimiter,
}

impl FetchClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        rate_limit_delay: Duration,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            limiter: DomainRateLimiter::new(rate_limit_delay),
        })
    }

    /// # Errors
    ///
    /// See [`FetchClient::new`].
    pub fn from_config(config: &frc_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.fetch_timeout(),
            &config.user_agent,
            config.rate_limit_delay(),
        )
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        accept: &str,
    ) -> Result<reqwest::Response, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        self.limiter.acquire(&rate_limit_key(&parsed)).await;

        let response = self
            .client
            .request(method, parsed)
            .header(reqwest::header::ACCEPT, accept)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        Ok(response)
    }

    /// GET `url` and return the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] when `url` does not parse.
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx status after redirects.
    /// - [`ScraperError::Http`] for network, timeout or body errors.
    pub async fn get_text(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.send(Method::GET, url, ACCEPT_HTML).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// As [`FetchClient::get_text`], plus [`ScraperError::Deserialize`] when
    /// the body is not JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, ScraperError> {
        let response = self.send(Method::GET, url, ACCEPT_JSON).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: url.to_owned(),
            source: e,
        })
    }

    /// HEAD `url`; `true` when the final status is below 400.
    ///
    /// # Errors
    ///
    /// [`ScraperError::InvalidUrl`] or [`ScraperError::Http`].
    pub async fn head_ok(&self, url: &str) -> Result<bool, ScraperError> {
        let response = self.send(Method::HEAD, url, ACCEPT_HTML).await?;
        Ok(response.status().as_u16() < 400)
    }

    /// Page body, or `None` after logging the failure.
    pub async fn fetch_page(&self, url: &str) -> Option<String> {
        match self.get_text(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url, error = %e, "page fetch failed");
                None
            }
        }
    }

    /// JSON body, or `None` after logging the failure.
    pub async fn fetch_json(&self, url: &str) -> Option<serde_json::Value> {
        match self.get_json(url).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(url, error = %e, "json fetch failed");
                None
            }
        }
    }

    /// Liveness probe; every failure counts as dead.
    pub async fn is_alive(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        match self.head_ok(url).await {
            Ok(alive) => alive,
            Err(e) => {
                tracing::debug!(url, error = %e, "liveness check failed");
                false
            }
        }
    }
}

/// Host plus explicit port, so local test servers on one host stay separate.
fn rate_limit_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
