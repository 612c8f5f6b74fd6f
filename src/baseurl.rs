//! Backend base URL resolution
//!
//! The desktop shell starts the backend on a variable local port, so the base
//! URL is resolved through an asynchronous lookup rather than hardcoded.
//! Resolvers also remember the last URL they handed out, for components that
//! need to build a plain URL string (e.g. an image source) without awaiting a
//! lookup.

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::transport::{FetchAdapter, HttpMethod, HttpRequest};

/// Errors that can occur while resolving the backend base URL
#[derive(Debug, Error)]
pub enum BaseUrlError {
    /// No candidate port answered the health endpoint
    #[error("no backend found on any candidate port")]
    BackendNotFound,
}

/// Source of the backend's current base URL
#[async_trait]
pub trait BaseUrlResolver: Send + Sync {
    /// Resolves the backend's current base URL
    async fn resolve(&self) -> Result<String, BaseUrlError>;

    /// Last URL successfully resolved, without performing a lookup
    fn last_known(&self) -> Option<String>;
}

/// Resolver for a backend at a fixed, known-ahead-of-time address
#[derive(Debug, Clone)]
pub struct StaticBaseUrl {
    base_url: String,
}

impl StaticBaseUrl {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BaseUrlResolver for StaticBaseUrl {
    async fn resolve(&self) -> Result<String, BaseUrlError> {
        Ok(self.base_url.clone())
    }

    fn last_known(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}

/// Probes candidate local ports until one answers the health endpoint
///
/// The first port whose health endpoint returns a success status becomes the
/// base URL and is remembered for subsequent lookups. Ports that refuse the
/// connection or answer with a failure status are skipped.
pub struct PortProbeResolver {
    adapter: FetchAdapter,
    host: String,
    ports: Vec<u16>,
    health_path: String,
    last_known: Mutex<Option<String>>,
}

impl PortProbeResolver {
    /// Creates a resolver probing `ports` on localhost with a `/health` check
    pub fn new(adapter: FetchAdapter, ports: Vec<u16>) -> Self {
        Self {
            adapter,
            host: "http://127.0.0.1".to_string(),
            ports,
            health_path: "/health".to_string(),
            last_known: Mutex::new(None),
        }
    }

    /// Overrides the host prefix, scheme included
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.trim_end_matches('/').to_string();
        self
    }

    /// Overrides the path used for the health check
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.health_path = path.to_string();
        self
    }
}

#[async_trait]
impl BaseUrlResolver for PortProbeResolver {
    async fn resolve(&self) -> Result<String, BaseUrlError> {
        if let Some(url) = self.last_known.lock().clone() {
            return Ok(url);
        }

        for port in &self.ports {
            let base = format!("{}:{port}", self.host);
            let request = HttpRequest {
                method: HttpMethod::Get,
                url: format!("{base}{}", self.health_path),
                headers: Vec::new(),
                body: None,
            };

            match self.adapter.execute(request).await {
                Ok(response) if response.is_success() => {
                    debug!(%base, "backend found");
                    *self.last_known.lock() = Some(base.clone());
                    return Ok(base);
                }
                Ok(_) | Err(_) => continue,
            }
        }

        Err(BaseUrlError::BackendNotFound)
    }

    fn last_known(&self) -> Option<String> {
        self.last_known.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_base_url_resolves_to_fixed_address() {
        let resolver = StaticBaseUrl::new("http://127.0.0.1:4780");
        assert_eq!(resolver.resolve().await.unwrap(), "http://127.0.0.1:4780");
    }

    #[tokio::test]
    async fn test_static_base_url_trims_trailing_slash() {
        let resolver = StaticBaseUrl::new("http://127.0.0.1:4780/");
        assert_eq!(resolver.resolve().await.unwrap(), "http://127.0.0.1:4780");
    }

    #[test]
    fn test_static_base_url_last_known_is_always_set() {
        let resolver = StaticBaseUrl::new("http://127.0.0.1:4780");
        assert_eq!(
            resolver.last_known(),
            Some("http://127.0.0.1:4780".to_string())
        );
    }

    #[test]
    fn test_port_probe_last_known_starts_empty() {
        let resolver = PortProbeResolver::new(FetchAdapter::new(), vec![4780]);
        assert!(resolver.last_known().is_none());
    }

    #[tokio::test]
    async fn test_port_probe_with_no_candidates_fails() {
        let resolver = PortProbeResolver::new(FetchAdapter::new(), Vec::new());
        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, BaseUrlError::BackendNotFound));
    }
}
