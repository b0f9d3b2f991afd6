use serde::Deserialize;

/// Main configuration structure for mirrorpress
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

/// Crawl scope and traversal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// URLs the crawl starts from
    #[serde(rename = "start-urls")]
    pub start_urls: Vec<String>,

    /// A URL is eligible only if it contains one of these strings.
    /// Containment, not exact host match: "example.com" also admits
    /// subdomains and path-embedded mirrors (and, knowingly, unrelated
    /// URLs that happen to contain the string).
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// A URL containing any of these strings is excluded even when allowed
    #[serde(rename = "blocked-substrings", default)]
    pub blocked_substrings: Vec<String>,

    /// Number of concurrent page workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Maximum link depth from the start URLs. Absent means unlimited.
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,
}

/// Rendering proxy configuration (Splash-compatible render.html endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Fetch pages through the rendering proxy instead of plain GET
    #[serde(default)]
    pub enabled: bool,

    /// render.html endpoint of the proxy
    #[serde(default = "default_render_endpoint")]
    pub endpoint: String,

    /// Seconds the proxy waits for the page to settle after load
    #[serde(default = "default_render_wait")]
    pub wait: f64,

    /// Per-resource timeout budget passed to the proxy, in seconds
    #[serde(rename = "resource-timeout", default = "default_resource_timeout")]
    pub resource_timeout: u64,

    /// Overall render timeout budget passed to the proxy, in seconds
    #[serde(default = "default_render_timeout")]
    pub timeout: u64,

    /// Pass the allowed-domain list to the proxy as a scope hint
    #[serde(rename = "strict-domains", default)]
    pub strict_domains: bool,
}

/// Direct transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Timeout for direct GET/HEAD requests, in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the site copy is reconstructed under
    #[serde(rename = "mirror-root")]
    pub mirror_root: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_render_endpoint(),
            wait: default_render_wait(),
            resource_timeout: default_resource_timeout(),
            timeout: default_render_timeout(),
            strict_domains: false,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_workers() -> u32 {
    4
}

fn default_render_endpoint() -> String {
    "http://localhost:8050/render.html".to_string()
}

fn default_render_wait() -> f64 {
    0.25
}

fn default_resource_timeout() -> u64 {
    2
}

fn default_render_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    12
}
