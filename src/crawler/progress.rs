//! Progress accounting over the frontier's counters
//!
//! Display is deliberately thin: one line per page with the running
//! processed/discovered counts and the URL being worked, plus a closing
//! summary with the overall rate.

use std::time::Instant;

#[derive(Debug)]
pub struct Progress {
    started: Instant,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Logs the start of one page's processing
    pub fn page(&self, processed: usize, discovered: usize, current_url: &str) {
        tracing::info!("[{}/{}] {}", processed, discovered, current_url);
    }

    /// Logs the closing summary for the run
    pub fn finish(&self, processed: usize, discovered: usize) {
        let elapsed = self.started.elapsed();
        let rate = processed as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        tracing::info!(
            "Processed {} of {} discovered URLs in {:.1?} ({:.2} pages/sec)",
            processed,
            discovered,
            elapsed,
            rate
        );
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
