use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{Instrument, info_span};

const REPORT_EVERY: Duration = Duration::from_secs(60);

/// Upstream traffic counters. The report loop logs the traffic of each window.
#[derive(Debug)]
pub struct RequestMetrics {
    name: &'static str,
    count: AtomicU64,
    failures: AtomicU64,
    reported_count: AtomicU64,
    reported_failures: AtomicU64,
}

/// Traffic seen between two reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub requests: u64,
    pub failures: u64,
}

impl Window {
    /// Share of failed requests in percent, 0 for an idle window.
    pub fn failure_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.failures as f64 * 100.0 / self.requests as f64
        }
    }
}

impl RequestMetrics {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            count: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            reported_count: AtomicU64::new(0),
            reported_failures: AtomicU64::new(0),
        })
    }

    pub fn inc(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Traffic since the previous call, then starts a new window.
    pub fn take_window(&self) -> Window {
        let total = self.total();
        let failures = self.failures();
        Window {
            requests: total.saturating_sub(self.reported_count.swap(total, Ordering::Relaxed)),
            failures: failures
                .saturating_sub(self.reported_failures.swap(failures, Ordering::Relaxed)),
        }
    }

    pub async fn log_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(REPORT_EVERY);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let window = self.take_window();
            if window.requests == 0 {
                continue;
            }

            let span = info_span!("📊 ", client = self.name);
            async {
                tracing::info!(
                    requests = window.requests,
                    failures = window.failures,
                    total = self.total(),
                    "{} req/min, {:.1}% failed",
                    window.requests,
                    window.failure_rate()
                );
            }
            .instrument(span)
            .await
        }
    }
}
