//! Request metrics for the classifier service.

use crate::types::label::Label;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

const MAX_SAMPLES: usize = 10_000;

/// Metrics collector for classification requests
pub struct ClassifierMetrics {
    /// Requests that produced a label
    pub requests_classified: AtomicU64,
    /// Requests labelled SPAM
    pub spam_count: AtomicU64,
    /// Requests labelled HAM
    pub ham_count: AtomicU64,
    /// Requests that failed inside the pipeline
    pub failures: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ClassifierMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_classified: AtomicU64::new(0),
            spam_count: AtomicU64::new(0),
            ham_count: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a successful classification
    pub fn record_classification(&self, processing_time: Duration, label: Label) {
        self.requests_classified.fetch_add(1, Ordering::Relaxed);
        match label {
            Label::Spam => self.spam_count.fetch_add(1, Ordering::Relaxed),
            Label::Ham => self.ham_count.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent half once full
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }
    }

    /// Record a failed classification
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted: Vec<u64> = match self.processing_times.read() {
            Ok(times) => times.clone(),
            Err(_) => return ProcessingStats::default(),
        };
        if sorted.is_empty() {
            return ProcessingStats::default();
        }
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: sorted[count - 1],
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_classified.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        let classified = self.requests_classified.load(Ordering::Relaxed);
        let spam = self.spam_count.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_classified: classified,
            spam_count: spam,
            ham_count: self.ham_count.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            spam_rate: if classified > 0 {
                spam as f64 / classified as f64
            } else {
                0.0
            },
            throughput: self.get_throughput(),
            uptime_secs: self.start_time.elapsed().as_secs(),
            processing: self.get_processing_stats(),
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let processing = &snapshot.processing;

        info!(
            classified = snapshot.requests_classified,
            spam = snapshot.spam_count,
            ham = snapshot.ham_count,
            failures = snapshot.failures,
            spam_rate = format!("{:.1}%", snapshot.spam_rate * 100.0),
            throughput = format!("{:.1} req/s", snapshot.throughput),
            "Classifier metrics summary"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            max_us = processing.max_us,
            "Classification latency"
        );
    }
}

impl Default for ClassifierMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable view of the metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_classified: u64,
    pub spam_count: u64,
    pub ham_count: u64,
    pub failures: u64,
    pub spam_rate: f64,
    pub throughput: f64,
    pub uptime_secs: u64,
    pub processing: ProcessingStats,
}

/// Periodic reporter that logs a metrics summary
pub struct MetricsReporter {
    metrics: Arc<ClassifierMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ClassifierMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // The first tick completes immediately; skip it so the first summary has data.
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
