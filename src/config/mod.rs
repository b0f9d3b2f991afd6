//! Configuration loading for mirrorpress
//!
//! The configuration is a TOML file describing the crawl scope (start URLs,
//! allowed domains, blocked substrings), the rendering proxy, direct
//! transport timeouts, and the mirror root directory. It is loaded and
//! validated once and treated as immutable for the whole run.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, CrawlConfig, FetchConfig, OutputConfig, RenderConfig};
pub use validation::validate;
