//! Crawl frontier and dedup tracking
//!
//! One `Frontier` exists per run. It owns the only de-duplication gate in
//! the system: `mark_seen` is an atomic test-and-set on the seen set, and a
//! URL may be scheduled for fetch only after being admitted through it. The
//! seen set never shrinks during a run and is not persisted — re-runs are
//! incremental because of the filesystem, not because of frontier memory.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

/// A page waiting to be processed
#[derive(Debug, Clone)]
pub struct QueuedPage {
    /// Canonical URL of the page
    pub url: Url,

    /// Link hops from the start URLs
    pub depth: u32,
}

/// Shared crawl state: seen set, work queue, progress counters
///
/// All operations are safe under concurrent workers; the counters are
/// monotonic for the lifetime of the run.
#[derive(Debug, Default)]
pub struct Frontier {
    seen: Mutex<HashSet<String>>,
    queue: Mutex<VecDeque<QueuedPage>>,
    discovered: AtomicUsize,
    processed: AtomicUsize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits the start URLs and schedules them at depth 0
    pub fn seed<'a>(&self, start_urls: impl IntoIterator<Item = &'a Url>) {
        for url in start_urls {
            self.try_enqueue(url, 0);
        }
    }

    /// Admits a URL into the seen set
    ///
    /// Returns true (and counts the URL as discovered) iff it was not
    /// already present. This is the sole dedup gate: two workers racing on
    /// the same URL get exactly one admission between them.
    pub fn mark_seen(&self, url: &Url) -> bool {
        let admitted = self
            .seen
            .lock()
            .expect("frontier seen set poisoned")
            .insert(url.as_str().to_string());
        if admitted {
            self.discovered.fetch_add(1, Ordering::Relaxed);
        }
        admitted
    }

    /// Admits a URL and, when new, schedules it for processing
    pub fn try_enqueue(&self, url: &Url, depth: u32) -> bool {
        if !self.mark_seen(url) {
            return false;
        }
        self.schedule(url.clone(), depth);
        true
    }

    /// Schedules an already-admitted URL
    ///
    /// Used when admission and scheduling diverge: the redirect probe admits
    /// the pre-redirect form but schedules the resolved target.
    pub fn schedule(&self, url: Url, depth: u32) {
        self.queue
            .lock()
            .expect("frontier queue poisoned")
            .push_back(QueuedPage { url, depth });
    }

    /// Pulls the next page to process
    pub fn next(&self) -> Option<QueuedPage> {
        self.queue
            .lock()
            .expect("frontier queue poisoned")
            .pop_front()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().expect("frontier queue poisoned").len()
    }

    /// Total URLs admitted so far (monotonic, ≥ number of start URLs)
    pub fn discovered(&self) -> usize {
        self.discovered.load(Ordering::Relaxed)
    }

    /// Total pages pulled for processing so far (monotonic)
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    /// Counts one processed page, returning the new total
    pub fn note_processed(&self) -> usize {
        self.processed.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_try_enqueue_admits_once() {
        let frontier = Frontier::new();
        let u = url("http://example.com/page");

        assert!(frontier.try_enqueue(&u, 0));
        assert!(!frontier.try_enqueue(&u, 0));
        assert_eq!(frontier.discovered(), 1);
        assert_eq!(frontier.queue_len(), 1);
    }

    #[test]
    fn test_discovered_counts_admissions() {
        let frontier = Frontier::new();
        let urls = [
            url("http://example.com/a"),
            url("http://example.com/b"),
            url("http://example.com/a"),
            url("http://example.com/c"),
        ];

        let admitted = urls.iter().filter(|u| frontier.try_enqueue(u, 0)).count();
        assert_eq!(admitted, 3);
        assert_eq!(frontier.discovered(), 3);
    }

    #[test]
    fn test_mark_seen_without_scheduling() {
        let frontier = Frontier::new();
        let u = url("http://example.com/redirecting");

        assert!(frontier.mark_seen(&u));
        assert_eq!(frontier.discovered(), 1);
        assert_eq!(frontier.queue_len(), 0);

        // The admitted form cannot be scheduled through the gate again
        assert!(!frontier.try_enqueue(&u, 0));
    }

    #[test]
    fn test_queue_is_fifo() {
        let frontier = Frontier::new();
        frontier.try_enqueue(&url("http://example.com/1"), 0);
        frontier.try_enqueue(&url("http://example.com/2"), 1);

        assert_eq!(frontier.next().unwrap().url.as_str(), "http://example.com/1");
        let second = frontier.next().unwrap();
        assert_eq!(second.url.as_str(), "http://example.com/2");
        assert_eq!(second.depth, 1);
        assert!(frontier.next().is_none());
    }

    #[test]
    fn test_seed_counts_start_urls() {
        let frontier = Frontier::new();
        let starts = [url("http://example.com/"), url("http://example.org/")];
        frontier.seed(starts.iter());

        assert_eq!(frontier.discovered(), 2);
        assert_eq!(frontier.queue_len(), 2);
    }

    #[test]
    fn test_concurrent_admission_is_exclusive() {
        let frontier = Arc::new(Frontier::new());
        let u = url("http://example.com/contested");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let frontier = Arc::clone(&frontier);
            let u = u.clone();
            handles.push(std::thread::spawn(move || frontier.try_enqueue(&u, 0)));
        }

        let admissions = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|admitted| *admitted)
            .count();

        assert_eq!(admissions, 1);
        assert_eq!(frontier.discovered(), 1);
        assert_eq!(frontier.queue_len(), 1);
    }
}
