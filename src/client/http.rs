// LOC service HTTP client.
// One GET per repository/branch key, validated and written through to the cache.

use std::sync::Arc;

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, info, warn};

use crate::breakdown::LocBreakdown;
use crate::cache::LocCache;
use crate::config::Config;
use crate::error::{GhlocError, Result};
use crate::locator::CacheKey;

/// Client for the remote LOC service, sharing the process-wide cache.
pub struct LocClient {
    client: Client,
    base_url: String,
    cache: Arc<LocCache>,
}

impl LocClient {
    /// Create a client for `config.service_url` that writes into `cache`.
    pub fn new(config: &Config, cache: Arc<LocCache>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| GhlocError::Config(format!("invalid user_agent: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(GhlocError::Http)?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    pub fn cache(&self) -> &LocCache {
        &self.cache
    }

    /// Request URL for a key: `<service_url>/<key>`.
    pub fn url_for(&self, key: &CacheKey) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Fetch a fresh breakdown and store it in the cache before returning it.
    pub async fn fetch(&self, key: &CacheKey) -> Result<LocBreakdown> {
        let url = self.url_for(key);
        info!(%url, "Fetching LOC breakdown");

        let response = self.client.get(&url).send().await?;
        let response = self.check_response(response)?;
        let body = response.text().await?;
        let breakdown = LocBreakdown::from_service_json(&body)?;

        self.cache.put(key, &breakdown).await?;
        debug!(%key, total = breakdown.total_lines, "LOC breakdown fetched");
        Ok(breakdown)
    }

    /// Serve from the cache when fresh, otherwise fetch.
    pub async fn get_or_fetch(&self, key: &CacheKey) -> Result<LocBreakdown> {
        if let Some(entry) = self.cache.get(key).await {
            return Ok(entry.breakdown);
        }
        self.fetch(key).await
    }

    /// Check response status and convert failures.
    fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown status");
        warn!(url = %response.url(), status = status.as_u16(), "LOC service error");
        Err(GhlocError::Remote {
            status: status.as_u16(),
            reason: reason.to_string(),
        })
    }
}
