//! Fetching: direct transport and the rendering proxy client
//!
//! Pages reach the orchestrator through exactly one shape, `PageSource`,
//! whether they came off the local mirror or over the network. The network
//! side splits into the rendering proxy client (pages, because JavaScript
//! must be executed before the final HTML exists) and the direct transport
//! (redirect probes, media streams, and page fetches when rendering is
//! disabled).

mod render;
mod transport;

pub use render::RenderClient;
pub use transport::{download_into, fetch_page, resolve_redirect};

use crate::config::FetchConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Where a page body came from
///
/// The orchestrator consumes both variants uniformly: a cached body skips
/// the storage write (it is already on disk) but goes through the same
/// extraction pipeline as a freshly rendered one.
#[derive(Debug)]
pub enum PageSource {
    /// Body read from the local mirror, no network involved
    Cached(String),

    /// Body fetched over the network
    Rendered { body: String, status: u16 },
}

impl PageSource {
    pub fn body(&self) -> &str {
        match self {
            Self::Cached(body) => body,
            Self::Rendered { body, .. } => body,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

/// Builds the HTTP client shared by every fetch in the run
///
/// Redirects are followed (capped at 10 hops) — the redirect probe relies on
/// it — and responses are transparently decompressed. The configured request
/// timeout bounds every direct request; the render client overrides it per
/// request with its own larger budget.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("mirrorpress/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}
