//! Client for a Splash-compatible JavaScript rendering proxy
//!
//! The proxy executes a page's JavaScript and returns the settled HTML. Its
//! `render.html` endpoint takes the target URL plus wait/resource/overall
//! timeout budgets as query parameters. A non-200 answer means "page not
//! available" and is never retried.

use crate::config::RenderConfig;
use crate::fetch::transport::classify_transport_error;
use crate::MirrorError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Extra client-side slack on top of the proxy's own overall timeout
const RENDER_TIMEOUT_MARGIN_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct RenderClient {
    client: Client,
    config: RenderConfig,
    scope_hint: String,
}

impl RenderClient {
    /// Creates a render client sharing the run's HTTP client
    ///
    /// `allowed_domains` becomes the proxy's scope hint when strict-domain
    /// mode is configured.
    pub fn new(client: Client, config: RenderConfig, allowed_domains: &[String]) -> Self {
        let scope_hint = allowed_domains.join(",");
        Self {
            client,
            config,
            scope_hint,
        }
    }

    /// Fetches the rendered HTML for `url` through the proxy
    pub async fn fetch(&self, url: &Url) -> Result<String, MirrorError> {
        let mut params: Vec<(&str, String)> = vec![
            ("url", url.to_string()),
            ("wait", self.config.wait.to_string()),
            ("html5_media", "1".to_string()),
            ("html", "1".to_string()),
            ("resource_timeout", self.config.resource_timeout.to_string()),
            ("timeout", self.config.timeout.to_string()),
        ];
        if self.config.strict_domains && !self.scope_hint.is_empty() {
            params.push(("allowed_domains", self.scope_hint.clone()));
        }

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .timeout(Duration::from_secs(
                self.config.timeout + RENDER_TIMEOUT_MARGIN_SECS,
            ))
            .send()
            .await
            .map_err(|e| classify_transport_error(url.as_str(), e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(MirrorError::RenderUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_transport_error(url.as_str(), e))
    }
}
