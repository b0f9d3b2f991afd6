//! Crawler module: page processing and crawl coordination
//!
//! This module contains the crawl engine proper:
//! - Raw reference extraction from page bodies
//! - Media asset downloading
//! - Progress accounting
//! - The per-URL state machine and the worker pool driving it

mod coordinator;
mod extract;
mod media;
mod progress;

pub use coordinator::{Coordinator, CrawlReport, PageOutcome};
pub use extract::{extract_raw_references, REFERENCE_ATTRIBUTES};
pub use media::download_media;
pub use progress::Progress;

use crate::config::Config;
use crate::Result;

/// Runs a complete mirror crawl
///
/// Seeds the frontier from the configuration, drains it with the worker
/// pool, and returns the closing report. Cancellation wiring (Ctrl-C) is the
/// caller's concern via [`Coordinator::cancel_flag`].
pub async fn crawl(config: Config) -> Result<CrawlReport> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
