//! Process-wide metrics
//!
//! Counters, gauges and a latency histogram for the replication path, plus
//! per-endpoint HTTP request stats, rendered in Prometheus text format.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Histogram bucket boundaries for latency measurements (in milliseconds)
const LATENCY_BUCKETS: [f64; 12] = [
    1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
];

/// Fixed-bucket latency histogram
#[derive(Debug)]
pub struct Histogram {
    buckets: Vec<AtomicU64>,
    boundaries: Vec<f64>,
    sum_micros: AtomicU64,
    count: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self::with_buckets(&LATENCY_BUCKETS)
    }

    pub fn with_buckets(boundaries: &[f64]) -> Self {
        Self {
            buckets: (0..=boundaries.len()).map(|_| AtomicU64::new(0)).collect(),
            boundaries: boundaries.to_vec(),
            sum_micros: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record an observation in milliseconds
    pub fn observe(&self, value_ms: f64) {
        let idx = self
            .boundaries
            .iter()
            .position(|&b| value_ms <= b)
            .unwrap_or(self.boundaries.len());

        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
        self.sum_micros
            .fetch_add((value_ms * 1000.0) as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_duration(&self, d: Duration) {
        self.observe(d.as_secs_f64() * 1000.0);
    }

    /// Cumulative `(upper_bound, count)` pairs, ending with `+Inf`
    pub fn cumulative_buckets(&self) -> Vec<(f64, u64)> {
        let mut cumulative = 0u64;
        let mut out = Vec::with_capacity(self.buckets.len());
        for (i, bucket) in self.buckets.iter().enumerate() {
            cumulative += bucket.load(Ordering::Relaxed);
            let le = self.boundaries.get(i).copied().unwrap_or(f64::INFINITY);
            out.push((le, cumulative));
        }
        out
    }

    pub fn sum_ms(&self) -> f64 {
        self.sum_micros.load(Ordering::Relaxed) as f64 / 1000.0
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn render(&self, out: &mut String, name: &str, labels: &str) {
        for (le, count) in self.cumulative_buckets() {
            let le = if le.is_infinite() {
                "+Inf".to_string()
            } else {
                le.to_string()
            };
            let sep = if labels.is_empty() { "" } else { "," };
            let _ = writeln!(out, "{name}_bucket{{{labels}{sep}le=\"{le}\"}} {count}");
        }
        let _ = writeln!(out, "{name}_sum{{{labels}}} {}", self.sum_ms());
        let _ = writeln!(out, "{name}_count{{{labels}}} {}", self.count());
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Point-in-time value
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, v: u64) {
        self.value.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// HTTP request stats for one path
#[derive(Debug, Default)]
pub struct EndpointMetrics {
    pub requests_total: Counter,
    pub requests_error: Counter,
    pub latency: Histogram,
}

/// Global metrics registry
#[derive(Debug)]
pub struct MetricsRegistry {
    endpoints: Mutex<BTreeMap<String, Arc<EndpointMetrics>>>,

    /// Coordinator: write outcomes
    pub submissions_committed: Counter,
    pub submissions_failed: Counter,
    pub submissions_rejected: Counter,

    /// Coordinator: per-replica outcomes inside broadcasts
    pub replica_acks: Counter,
    pub replica_failures: Counter,
    pub replica_timeouts: Counter,

    /// Coordinator: end-to-end submit latency (committed writes only)
    pub commit_latency: Histogram,

    /// Coordinator: committed entries
    pub coordinator_log_entries: Gauge,

    /// Replica: appends applied and entries held
    pub replica_appends: Counter,
    pub replica_log_entries: Gauge,

    start_time: Instant,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            endpoints: Mutex::new(BTreeMap::new()),
            submissions_committed: Counter::new(),
            submissions_failed: Counter::new(),
            submissions_rejected: Counter::new(),
            replica_acks: Counter::new(),
            replica_failures: Counter::new(),
            replica_timeouts: Counter::new(),
            commit_latency: Histogram::new(),
            coordinator_log_entries: Gauge::new(),
            replica_appends: Counter::new(),
            replica_log_entries: Gauge::new(),
            start_time: Instant::now(),
        }
    }

    /// Get or create metrics for an endpoint
    pub fn endpoint(&self, path: &str) -> Arc<EndpointMetrics> {
        let mut endpoints = self
            .endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        endpoints
            .entry(path.to_string())
            .or_default()
            .clone()
    }

    /// Record a finished HTTP request
    pub fn record_request(&self, path: &str, duration: Duration, success: bool) {
        let endpoint = self.endpoint(path);
        endpoint.requests_total.inc();
        endpoint.latency.observe_duration(duration);
        if !success {
            endpoint.requests_error.inc();
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Generate Prometheus-compatible metrics output
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();

        let counters: [(&str, &str, &Counter); 7] = [
            ("replog_submissions_committed_total", "Writes committed", &self.submissions_committed),
            ("replog_submissions_failed_total", "Writes that failed replication", &self.submissions_failed),
            ("replog_submissions_rejected_total", "Writes rejected as invalid", &self.submissions_rejected),
            ("replog_replica_acks_total", "Positive acknowledgements received from replicas", &self.replica_acks),
            ("replog_replica_failures_total", "Replica calls that failed or were rejected", &self.replica_failures),
            ("replog_replica_timeouts_total", "Replica calls that exceeded the broadcast timeout", &self.replica_timeouts),
            ("replog_replica_appends_total", "Entries appended by this replica", &self.replica_appends),
        ];
        for (name, help, counter) in counters {
            let _ = writeln!(out, "# HELP {name} {help}");
            let _ = writeln!(out, "# TYPE {name} counter");
            let _ = writeln!(out, "{name} {}", counter.get());
        }

        let gauges: [(&str, &str, &Gauge); 2] = [
            ("replog_coordinator_log_entries", "Entries committed in the coordinator log", &self.coordinator_log_entries),
            ("replog_replica_log_entries", "Entries held in the replica log", &self.replica_log_entries),
        ];
        for (name, help, gauge) in gauges {
            let _ = writeln!(out, "# HELP {name} {help}");
            let _ = writeln!(out, "# TYPE {name} gauge");
            let _ = writeln!(out, "{name} {}", gauge.get());
        }

        out.push_str("# HELP replog_uptime_seconds Server uptime in seconds\n");
        out.push_str("# TYPE replog_uptime_seconds gauge\n");
        let _ = writeln!(out, "replog_uptime_seconds {}", self.uptime_seconds());

        out.push_str("# HELP replog_commit_duration_ms Submit latency of committed writes\n");
        out.push_str("# TYPE replog_commit_duration_ms histogram\n");
        self.commit_latency
            .render(&mut out, "replog_commit_duration_ms", "");

        let endpoints = self
            .endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        out.push_str("# HELP replog_http_requests_total Requests per endpoint\n");
        out.push_str("# TYPE replog_http_requests_total counter\n");
        for (path, m) in endpoints.iter() {
            let _ = writeln!(
                out,
                "replog_http_requests_total{{path=\"{path}\"}} {}",
                m.requests_total.get()
            );
        }

        out.push_str("# HELP replog_http_errors_total Error responses per endpoint\n");
        out.push_str("# TYPE replog_http_errors_total counter\n");
        for (path, m) in endpoints.iter() {
            let _ = writeln!(
                out,
                "replog_http_errors_total{{path=\"{path}\"}} {}",
                m.requests_error.get()
            );
        }

        out.push_str("# HELP replog_http_request_duration_ms Request duration in milliseconds\n");
        out.push_str("# TYPE replog_http_request_duration_ms histogram\n");
        for (path, m) in endpoints.iter() {
            m.latency.render(
                &mut out,
                "replog_http_request_duration_ms",
                &format!("path=\"{path}\""),
            );
        }

        out
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global metrics instance
pub static METRICS: once_cell::sync::Lazy<MetricsRegistry> =
    once_cell::sync::Lazy::new(MetricsRegistry::new);
