//! Mirrorpress: a website-to-disk mirroring crawler
//!
//! This crate implements a crawler that copies a website into a local
//! directory tree: pages are fetched (optionally through a JavaScript
//! rendering proxy), discovered references are canonicalized and filtered
//! against a domain scope, media assets are streamed to disk, and in-scope
//! links are followed until the frontier is exhausted. Content already on
//! disk is never fetched again, so re-runs are incremental.

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod frontier;
pub mod resource;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for mirrorpress operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Render proxy returned HTTP {status} for {url}")]
    RenderUnavailable { url: String, status: u16 },

    #[error("HTTP {status} for {url}")]
    FetchStatus { url: String, status: u16 },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Empty reference")]
    EmptyReference,

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for mirrorpress operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::frontier::Frontier;
pub use crate::resource::{classify, Resource, ResourceKind};
pub use crate::storage::MirrorStore;
pub use crate::url::{canonicalize, clean, decompose, is_in_scope, UrlParts};
