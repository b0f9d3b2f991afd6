//! Crawl coordination: the per-URL state machine and the worker pool
//!
//! The coordinator seeds the frontier with the configured start URLs, then
//! runs a bounded pool of worker tasks. Each worker takes one URL through
//! the same sequence: serve from the local mirror or fetch, store the body,
//! extract and canonicalize references, filter them against the scope, split
//! media from links, stream the media, and admit new links back into the
//! frontier. A failure of any kind is confined to its URL; the crawl only
//! ends when the frontier runs dry or a cancellation is requested.

use crate::config::Config;
use crate::crawler::extract::extract_raw_references;
use crate::crawler::media::download_media;
use crate::crawler::progress::Progress;
use crate::fetch::{build_http_client, fetch_page, resolve_redirect, PageSource, RenderClient};
use crate::frontier::{Frontier, QueuedPage};
use crate::resource::{classify, Resource};
use crate::storage::{remove_empty_dirs, remove_temp_files, MirrorStore};
use crate::url::{canonicalize, clean, decompose, is_in_scope};
use crate::{MirrorError, Result};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// How processing one URL ended
///
/// Failures are values, not exceptions: tests and the closing report can
/// tell a fetch problem from a storage problem without parsing log output.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// Fetched over the network and stored
    Mirrored,

    /// Served from the local mirror without network I/O
    FromCache,

    /// The fetch failed (bad status, timeout, transport error); the URL is
    /// done for this run and will be retried naturally by the next run's
    /// cache-miss path
    FetchFailed { reason: String },

    /// The page body could not be stored; its references were still followed
    StorageFailed { reason: String },
}

/// Tallies for the closing report
#[derive(Debug, Default, Clone)]
pub struct CrawlReport {
    pub mirrored: usize,
    pub from_cache: usize,
    pub fetch_failed: usize,
    pub storage_failed: usize,
    pub unexpected: usize,
    pub discovered: usize,
    pub processed: usize,
}

impl CrawlReport {
    fn record(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Mirrored => self.mirrored += 1,
            PageOutcome::FromCache => self.from_cache += 1,
            PageOutcome::FetchFailed { .. } => self.fetch_failed += 1,
            PageOutcome::StorageFailed { .. } => self.storage_failed += 1,
        }
    }
}

/// State shared by every worker in the pool
struct CrawlContext {
    config: Config,
    store: MirrorStore,
    frontier: Frontier,
    client: Client,
    render: Option<RenderClient>,
    progress: Progress,
}

/// Main crawl coordinator
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
    cancelled: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator: opens the mirror root, sweeps stale staging
    /// files from a previous run, builds the HTTP client, and seeds the
    /// frontier with the start URLs.
    pub fn new(config: Config) -> Result<Self> {
        let store = MirrorStore::open(&config.output.mirror_root)?;

        let swept = remove_temp_files(store.root())?;
        if swept > 0 {
            tracing::info!("Removed {} temporary files from a previous run", swept);
        }

        let client = build_http_client(&config.fetch)?;
        let render = config.render.enabled.then(|| {
            RenderClient::new(
                client.clone(),
                config.render.clone(),
                &config.crawl.allowed_domains,
            )
        });

        let frontier = Frontier::new();
        for start_url in &config.crawl.start_urls {
            let url = clean(start_url)?;
            frontier.try_enqueue(&url, 0);
        }

        Ok(Self {
            ctx: Arc::new(CrawlContext {
                config,
                store,
                frontier,
                client,
                render,
                progress: Progress::new(),
            }),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag that stops the crawl between URLs when set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Runs the crawl until the frontier is exhausted or cancellation
    pub async fn run(&mut self) -> Result<CrawlReport> {
        let workers = self.ctx.config.crawl.workers as usize;
        tracing::info!(
            "Starting crawl: {} start URL(s), {} worker(s), mirror root {}",
            self.ctx.config.crawl.start_urls.len(),
            workers,
            self.ctx.store.root().display()
        );

        let mut tasks: JoinSet<(Url, PageOutcome)> = JoinSet::new();
        let mut report = CrawlReport::default();

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                tracing::info!("Cancellation requested, stopping between URLs");
                tasks.shutdown().await;
                break;
            }

            // Keep the pool full while work is queued
            while tasks.len() < workers {
                match self.ctx.frontier.next() {
                    Some(page) => {
                        let ctx = Arc::clone(&self.ctx);
                        tasks.spawn(async move {
                            let url = page.url.clone();
                            let outcome = process_page(ctx, page).await;
                            (url, outcome)
                        });
                    }
                    None => break,
                }
            }

            if tasks.is_empty() {
                // Nothing queued and nothing in flight: the crawl is done
                break;
            }

            match tasks.join_next().await {
                Some(Ok((url, outcome))) => {
                    match &outcome {
                        PageOutcome::FetchFailed { reason } => {
                            tracing::warn!("Fetch failed for '{}': {}", url, reason);
                        }
                        PageOutcome::StorageFailed { reason } => {
                            tracing::warn!("Storage failed for '{}': {}", url, reason);
                        }
                        _ => {}
                    }
                    report.record(&outcome);
                }
                Some(Err(join_error)) => {
                    // A worker panic is confined to its URL
                    tracing::error!("Unexpected failure processing a page: {}", join_error);
                    report.unexpected += 1;
                }
                None => {}
            }
        }

        self.sweep();

        report.discovered = self.ctx.frontier.discovered();
        report.processed = self.ctx.frontier.processed();
        self.ctx
            .progress
            .finish(report.processed, report.discovered);

        Ok(report)
    }

    /// End-of-run housekeeping: stray temps first, then emptied directories
    fn sweep(&self) {
        match remove_temp_files(self.ctx.store.root()) {
            Ok(n) if n > 0 => tracing::info!("Removed {} temporary files", n),
            Ok(_) => {}
            Err(e) => tracing::warn!("Temp file sweep failed: {}", e),
        }
        match remove_empty_dirs(self.ctx.store.root()) {
            Ok(n) if n > 0 => tracing::info!("Removed {} empty folders", n),
            Ok(_) => {}
            Err(e) => tracing::warn!("Empty folder sweep failed: {}", e),
        }
    }
}

/// Takes one URL through resolve → fetch/cache → store → parse → follow
async fn process_page(ctx: Arc<CrawlContext>, page: QueuedPage) -> PageOutcome {
    let processed = ctx.frontier.note_processed();
    ctx.progress
        .page(processed, ctx.frontier.discovered(), page.url.as_str());

    let parts = decompose(&page.url);
    let page_path = ctx.store.page_path(&parts);

    // A complete local mirror file replaces the fetch entirely
    let source = if page_path.is_file() {
        match tokio::fs::read_to_string(&page_path).await {
            Ok(body) => {
                tracing::debug!("Local copy of {} being used", page.url);
                PageSource::Cached(body)
            }
            Err(e) => {
                return PageOutcome::StorageFailed {
                    reason: e.to_string(),
                }
            }
        }
    } else {
        match fetch_page_source(&ctx, &page.url).await {
            Ok(source) => {
                if let PageSource::Rendered { status, .. } = &source {
                    tracing::debug!("Fetched {} (HTTP {})", page.url, status);
                }
                source
            }
            Err(e) => {
                return PageOutcome::FetchFailed {
                    reason: e.to_string(),
                }
            }
        }
    };

    // Persist a freshly fetched body; references are followed even if this
    // write fails, so one unwritable path cannot hide a subtree
    let mut storage_failure = None;
    if let PageSource::Rendered { body, .. } = &source {
        let stored = ctx
            .store
            .ensure_directories(&parts.full_path)
            .and_then(|_| ctx.store.write_if_absent(&page_path, body));
        if let Err(e) = stored {
            storage_failure = Some(e.to_string());
        }
    }

    // Canonicalize and scope-filter everything the page references
    let mut candidates = Vec::new();
    for raw in extract_raw_references(source.body()) {
        match canonicalize(&page.url, &raw) {
            Ok(url) => {
                if is_in_scope(
                    url.as_str(),
                    &ctx.config.crawl.allowed_domains,
                    &ctx.config.crawl.blocked_substrings,
                ) {
                    candidates.push(Resource::new(raw, url));
                } else {
                    tracing::debug!("Out of scope: {}", url);
                }
            }
            Err(e) => tracing::debug!("Dropping reference '{}': {}", raw, e),
        }
    }

    let (media, links) = classify(candidates);

    for resource in &media {
        match download_media(&ctx.client, &ctx.store, &parts, resource).await {
            Ok(true) => tracing::debug!("Downloaded {}", resource.url),
            Ok(false) => tracing::debug!("Local copy of {} being used", resource.url),
            Err(e) => tracing::warn!("Failed to download '{}': {}", resource.url, e),
        }
    }

    for resource in &links {
        admit_link(&ctx, resource, page.depth).await;
    }

    if let Some(reason) = storage_failure {
        PageOutcome::StorageFailed { reason }
    } else if source.is_cached() {
        PageOutcome::FromCache
    } else {
        PageOutcome::Mirrored
    }
}

/// Fetches a page body over the network, through the render proxy when one
/// is configured
async fn fetch_page_source(ctx: &CrawlContext, url: &Url) -> Result<PageSource> {
    if let Some(render) = &ctx.render {
        let body = render.fetch(url).await?;
        Ok(PageSource::Rendered { body, status: 200 })
    } else {
        let (status, body) = fetch_page(&ctx.client, url.as_str()).await?;
        match body {
            Some(body) => Ok(PageSource::Rendered { body, status }),
            None => Err(MirrorError::FetchStatus {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// Admits a link resource into the frontier
///
/// Already-mirrored targets are scheduled directly — a `stat` replaces the
/// network round-trip. Everything else is admitted to the seen set and then
/// probed for redirects; what the chain resolves to is what gets scheduled,
/// so a redirecting URL and its target never both occupy the frontier. A
/// probe failure leaves the URL admitted-but-unscheduled: it will not be
/// retried this run, and a later run picks it up through the cache-miss
/// path.
async fn admit_link(ctx: &CrawlContext, resource: &Resource, parent_depth: u32) {
    let depth = parent_depth + 1;
    if let Some(max_depth) = ctx.config.crawl.max_depth {
        if depth > max_depth {
            tracing::debug!("Depth limit {} reached, not following {}", max_depth, resource.url);
            return;
        }
    }

    let target = &resource.url;

    if ctx.store.page_path(&decompose(target)).is_file() {
        ctx.frontier.try_enqueue(target, depth);
        return;
    }

    if !ctx.frontier.mark_seen(target) {
        return;
    }

    let final_url = match resolve_redirect(&ctx.client, target.as_str()).await {
        Ok(final_url) => final_url,
        Err(e) => {
            tracing::warn!("Redirect probe failed for '{}': {}", target, e);
            return;
        }
    };

    let final_url = match clean(&final_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Dropping redirect target '{}': {}", final_url, e);
            return;
        }
    };

    if final_url == *target {
        ctx.frontier.schedule(target.clone(), depth);
        return;
    }

    if !is_in_scope(
        final_url.as_str(),
        &ctx.config.crawl.allowed_domains,
        &ctx.config.crawl.blocked_substrings,
    ) {
        tracing::debug!("Redirect target out of scope: {} -> {}", target, final_url);
        return;
    }

    if ctx.frontier.mark_seen(&final_url) {
        ctx.frontier.schedule(final_url, depth);
    }
}
