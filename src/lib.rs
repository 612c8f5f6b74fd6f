//! SaveForge API Core
//!
//! The API-access layer of the SaveForge save-game editor. The editor's UI
//! talks to a local backend over REST; everything here exists to make those
//! calls uniform and cheap:
//!
//! - [`transport`] selects an HTTP transport for the current environment: the
//!   desktop shell's native capability when it loads, a standard client
//!   otherwise.
//! - [`baseurl`] resolves the backend's base URL, which varies because the
//!   shell starts the backend on a free local port.
//! - [`cache`] memoizes GET responses for a fixed freshness window.
//! - [`client`] ties the three together behind `get`/`post`/`delete`.
//! - [`routes`] holds the backend's REST paths and a facade mirroring the
//!   editor's feature surface.
//!
//! This crate performs no retries, no request coalescing, and no game-rule
//! computation; failures propagate to the caller unchanged.

pub mod baseurl;
pub mod cache;
pub mod client;
pub mod routes;
pub mod transport;

pub use baseurl::{BaseUrlError, BaseUrlResolver, PortProbeResolver, StaticBaseUrl};
pub use client::{ApiClient, ApiError, RequestOptions};
pub use routes::SaveEditorApi;
pub use transport::{FetchAdapter, NativeHttp, NativeHttpLoader, TransportError};
