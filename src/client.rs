//! Caching API client for the save editor backend
//!
//! This is the single facade every feature layer goes through: it resolves the
//! backend base URL, dispatches requests through the `FetchAdapter`, and
//! memoizes GET responses for a fixed window. POST and DELETE always go to the
//! network and never touch the cache.
//!
//! Concurrent GETs for the same key are not coalesced: each triggers its own
//! request, and whichever completes last wins the cache slot. Callers that
//! need single-flight semantics must await one call before issuing the next.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::baseurl::{BaseUrlError, BaseUrlResolver};
use crate::cache::{ResponseCache, DEFAULT_TTL};
use crate::transport::{FetchAdapter, HttpMethod, HttpRequest, TransportError};

/// Errors that can occur when calling the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status; the body is not parsed
    #[error("API Error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// The request could not be executed at the transport level
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend base URL could not be resolved
    #[error(transparent)]
    BaseUrl(#[from] BaseUrlError),

    /// The response body is not the JSON the caller expected
    #[error("failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint did not combine with the base URL into a valid URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Per-request options for GET calls
///
/// Query parameters and headers live in sorted maps so that logically
/// identical option sets always serialize to the same cache key, regardless of
/// the order callers insert them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestOptions {
    /// Query parameters appended to the endpoint
    pub query: BTreeMap<String, String>,
    /// Extra request headers
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a query parameter
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a request header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

/// API client with transparent caching for read operations
///
/// Each instance owns its cache, so tests and embedders construct isolated
/// clients instead of sharing process-wide state. Payloads are opaque JSON;
/// responses deserialize into whatever type the caller asks for.
pub struct ApiClient {
    adapter: FetchAdapter,
    resolver: Arc<dyn BaseUrlResolver>,
    cache: ResponseCache,
}

impl ApiClient {
    /// Client with the default adapter and the standard 5 minute cache window
    pub fn new(resolver: Arc<dyn BaseUrlResolver>) -> Self {
        Self {
            adapter: FetchAdapter::new(),
            resolver,
            cache: ResponseCache::new(DEFAULT_TTL),
        }
    }

    /// Replaces the transport adapter
    pub fn with_adapter(mut self, adapter: FetchAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    /// Overrides the cache freshness window
    ///
    /// The replacement cache starts empty.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = ResponseCache::new(ttl);
        self
    }

    /// GET with transparent response caching
    ///
    /// A fresh cache entry short-circuits without a network call, so callers
    /// may observe data up to the freshness window old. On a miss the request
    /// goes out, a non-success status fails with `ApiError::Http`, and a
    /// successful JSON body is cached before being returned. Failed requests
    /// never write the cache.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError> {
        let key = cache_key(endpoint, options)?;
        if let Some(cached) = self.cache.get(&key) {
            debug!(endpoint, "cache hit");
            return Ok(serde_json::from_value(cached)?);
        }
        debug!(endpoint, "cache miss");

        let base_url = self.resolver.resolve().await?;
        let url = build_url(&base_url, endpoint, options)?;
        let headers: Vec<(String, String)> = options
            .map(|opts| {
                opts.headers
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let response = self
            .adapter
            .execute(HttpRequest {
                method: HttpMethod::Get,
                url,
                headers,
                body: None,
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let value: Value = serde_json::from_str(&response.body)?;
        self.cache.insert(key, value.clone());
        Ok(serde_json::from_value(value)?)
    }

    /// POST with an optional JSON body; never reads or writes the cache
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        self.write_request(HttpMethod::Post, endpoint, body).await
    }

    /// DELETE with an optional JSON body; never reads or writes the cache
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        self.write_request(HttpMethod::Delete, endpoint, body).await
    }

    /// Unconditionally empties the whole cache
    ///
    /// There is no scoped invalidation; a mutation that must not serve stale
    /// reads afterwards calls this, or relies on the freshness window.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Builds an absolute URL from the last resolved base URL, without a
    /// lookup
    ///
    /// For non-fetch uses such as portrait image sources. Returns `None` when
    /// no base URL has been resolved yet.
    pub fn resource_url(&self, endpoint: &str) -> Option<String> {
        self.resolver
            .last_known()
            .map(|base| format!("{base}{endpoint}"))
    }

    async fn write_request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let base_url = self.resolver.resolve().await?;
        let url = build_url(&base_url, endpoint, None)?;

        let mut headers = Vec::new();
        let body = match body {
            Some(value) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(value)?)
            }
            None => None,
        };

        let response = self
            .adapter
            .execute(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Deterministic cache key from the endpoint and a canonical serialization of
/// the options
fn cache_key(endpoint: &str, options: Option<&RequestOptions>) -> Result<String, ApiError> {
    Ok(format!("{endpoint}|{}", serde_json::to_string(&options)?))
}

/// Joins the base URL and endpoint, appending query parameters when present
fn build_url(
    base_url: &str,
    endpoint: &str,
    options: Option<&RequestOptions>,
) -> Result<String, ApiError> {
    let joined = format!("{}{endpoint}", base_url.trim_end_matches('/'));
    let mut url =
        reqwest::Url::parse(&joined).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;

    if let Some(options) = options {
        if !options.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &options.query {
                pairs.append_pair(name, value);
            }
        }
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_insertion_order_independent() {
        let a = RequestOptions::new().query("class", "bard").query("level", "3");
        let b = RequestOptions::new().query("level", "3").query("class", "bard");

        assert_eq!(
            cache_key("/gamedata/feats", Some(&a)).unwrap(),
            cache_key("/gamedata/feats", Some(&b)).unwrap()
        );
    }

    #[test]
    fn test_cache_key_differs_when_options_differ() {
        let a = RequestOptions::new().query("level", "3");
        let b = RequestOptions::new().query("level", "4");

        assert_ne!(
            cache_key("/gamedata/feats", Some(&a)).unwrap(),
            cache_key("/gamedata/feats", Some(&b)).unwrap()
        );
    }

    #[test]
    fn test_cache_key_distinguishes_no_options_from_empty_options() {
        let empty = RequestOptions::new();

        assert_ne!(
            cache_key("/gamedata/feats", None).unwrap(),
            cache_key("/gamedata/feats", Some(&empty)).unwrap()
        );
    }

    #[test]
    fn test_cache_key_differs_across_endpoints() {
        assert_ne!(
            cache_key("/characters/1/state", None).unwrap(),
            cache_key("/characters/2/state", None).unwrap()
        );
    }

    #[test]
    fn test_build_url_joins_base_and_endpoint() {
        let url = build_url("http://127.0.0.1:4780", "/characters/42/state", None).unwrap();
        assert_eq!(url, "http://127.0.0.1:4780/characters/42/state");
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let url = build_url("http://127.0.0.1:4780/", "/gamedata/feats", None).unwrap();
        assert_eq!(url, "http://127.0.0.1:4780/gamedata/feats");
    }

    #[test]
    fn test_build_url_appends_query_parameters() {
        let options = RequestOptions::new().query("class", "bard").query("level", "3");
        let url = build_url("http://127.0.0.1:4780", "/gamedata/feats", Some(&options)).unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:4780/gamedata/feats?class=bard&level=3"
        );
    }

    #[test]
    fn test_build_url_rejects_invalid_base() {
        let result = build_url("not a url", "/characters/1/state", None);
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_http_error_message_carries_status() {
        let err = ApiError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "API Error: 404 Not Found");
    }
}
