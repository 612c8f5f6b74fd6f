//! Environment-aware HTTP transport
//!
//! The desktop shell can expose a native HTTP capability that reaches the
//! backend without browser-style cross-origin restrictions. When that
//! capability loads, requests go through it; in every other environment they
//! fall back to a standard `reqwest` client. Callers never branch on the
//! environment themselves.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// HTTP method for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// An HTTP request described as plain data
///
/// Built by the API client and executed by whichever transport the adapter
/// selected, so the observable result is uniform across transports.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method
    pub method: HttpMethod,
    /// Absolute request URL
    pub url: String,
    /// Request headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Request body, if any
    pub body: Option<String>,
}

/// An HTTP response described as plain data
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Numeric status code
    pub status: u16,
    /// Canonical reason phrase for the status, e.g. "Not Found"
    pub status_text: String,
    /// Response headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    /// Whether the status code is in the 2xx success range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors that can occur while executing a request
#[derive(Debug, Error)]
pub enum TransportError {
    /// Neither a native capability nor a standard client exists
    #[error("no HTTP transport available in this environment")]
    Unavailable,

    /// The native capability was present but failed to load
    #[error("native HTTP capability failed to load: {0}")]
    CapabilityLoad(String),

    /// The native capability reported a request failure
    #[error("native HTTP request failed: {0}")]
    Native(String),

    /// The standard client reported a request failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A native HTTP capability provided by the desktop shell runtime
#[async_trait]
pub trait NativeHttp: Send + Sync {
    /// Execute the request and return the response, network errors unchanged
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Loader for the optionally-present native capability
///
/// Loading may fail (capability not present, load error); a failed load is a
/// normal handled condition, not an error surfaced to callers.
pub trait NativeHttpLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn NativeHttp>, TransportError>;
}

/// Dispatches requests through the native capability when one loaded,
/// otherwise through a standard `reqwest` client.
///
/// The environment is probed once at construction rather than on every call;
/// it does not change within a process lifetime.
#[derive(Clone)]
pub struct FetchAdapter {
    native: Option<Arc<dyn NativeHttp>>,
    standard: Option<Client>,
}

impl FetchAdapter {
    /// Adapter backed by the standard client only
    pub fn new() -> Self {
        Self {
            native: None,
            standard: Some(Client::new()),
        }
    }

    /// Probes for a native HTTP capability, keeping the standard client as
    /// the fallback when loading fails or no loader is present
    pub fn detect(loader: Option<&dyn NativeHttpLoader>) -> Self {
        let native = loader.and_then(|loader| match loader.load() {
            Ok(capability) => {
                debug!("using native HTTP capability");
                Some(capability)
            }
            Err(err) => {
                debug!("native HTTP capability unavailable: {err}");
                None
            }
        });

        Self {
            native,
            standard: Some(Client::new()),
        }
    }

    /// Adapter backed by a caller-supplied standard client
    pub fn with_client(client: Client) -> Self {
        Self {
            native: None,
            standard: Some(client),
        }
    }

    /// Adapter with no transport at all, as seen in hosts that are neither
    /// a desktop shell nor a browser
    pub fn unavailable() -> Self {
        Self {
            native: None,
            standard: None,
        }
    }

    /// Executes the request through the selected transport
    ///
    /// # Returns
    /// * `Ok(HttpResponse)` regardless of which transport served it
    /// * `Err(TransportError::Unavailable)` when no transport exists
    /// * any other `TransportError` unchanged from the transport that raised it
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(native) = &self.native {
            return native.execute(request).await;
        }
        match &self.standard {
            Some(client) => standard_execute(client, request).await,
            None => Err(TransportError::Unavailable),
        }
    }
}

impl Default for FetchAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes a request with the standard `reqwest` client
async fn standard_execute(
    client: &Client,
    request: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    let mut builder = match request.method {
        HttpMethod::Get => client.get(&request.url),
        HttpMethod::Post => client.post(&request.url),
        HttpMethod::Delete => client.delete(&request.url),
    };

    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.text().await?;

    Ok(HttpResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or("").to_string(),
        headers,
        body,
    })
}
