//! Basic Metrics
//!
//! Request counters and latency tracking for the API surface, with a
//! Prometheus text export.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Metrics collector
#[derive(Debug)]
pub struct Metrics {
    /// Total requests count
    total_requests: AtomicU64,

    /// Requests per endpoint
    requests_by_endpoint: RwLock<HashMap<String, u64>>,

    /// Latency tracking (simplified)
    latency_sum_us: AtomicU64,
    latency_count: AtomicU64,
    latency_min_us: AtomicU64,
    latency_max_us: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            requests_by_endpoint: RwLock::new(HashMap::new()),
            latency_sum_us: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
            latency_min_us: AtomicU64::new(u64::MAX),
            latency_max_us: AtomicU64::new(0),
        }
    }

    /// Record a handled request
    pub fn record_request(&self, endpoint: &str, latency: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        {
            let mut requests = self.requests_by_endpoint.write().unwrap();
            *requests.entry(endpoint.to_string()).or_insert(0) += 1;
        }

        let latency_us = latency.as_micros() as u64;
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);

        // Update min (atomic min)
        let mut current_min = self.latency_min_us.load(Ordering::Relaxed);
        while latency_us < current_min {
            match self.latency_min_us.compare_exchange_weak(
                current_min,
                latency_us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(c) => current_min = c,
            }
        }

        // Update max (atomic max)
        let mut current_max = self.latency_max_us.load(Ordering::Relaxed);
        while latency_us > current_max {
            match self.latency_max_us.compare_exchange_weak(
                current_max,
                latency_us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(c) => current_max = c,
            }
        }
    }

    /// Get total requests count
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Get requests by endpoint
    pub fn requests_by_endpoint(&self) -> HashMap<String, u64> {
        self.requests_by_endpoint.read().unwrap().clone()
    }

    /// Get average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        let count = self.latency_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        sum as f64 / count as f64
    }

    /// Get min latency in microseconds
    pub fn min_latency_us(&self) -> u64 {
        let min = self.latency_min_us.load(Ordering::Relaxed);
        if min == u64::MAX {
            0
        } else {
            min
        }
    }

    /// Get max latency in microseconds
    pub fn max_latency_us(&self) -> u64 {
        self.latency_max_us.load(Ordering::Relaxed)
    }

    /// Export in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let mut out = String::new();

        out.push_str("# HELP wordvec_requests_total Total API requests processed\n");
        out.push_str("# TYPE wordvec_requests_total counter\n");
        out.push_str(&format!("wordvec_requests_total {}\n", self.total_requests()));

        out.push_str("# HELP wordvec_requests Requests per endpoint\n");
        out.push_str("# TYPE wordvec_requests counter\n");
        let mut by_endpoint: Vec<(String, u64)> =
            self.requests_by_endpoint().into_iter().collect();
        by_endpoint.sort();
        for (endpoint, count) in by_endpoint {
            out.push_str(&format!(
                "wordvec_requests{{endpoint=\"{}\"}} {}\n",
                endpoint, count
            ));
        }

        out.push_str("# HELP wordvec_request_latency_us Request latency in microseconds\n");
        out.push_str("# TYPE wordvec_request_latency_us gauge\n");
        out.push_str(&format!(
            "wordvec_request_latency_us{{stat=\"avg\"}} {:.1}\n",
            self.avg_latency_us()
        ));
        out.push_str(&format!(
            "wordvec_request_latency_us{{stat=\"min\"}} {}\n",
            self.min_latency_us()
        ));
        out.push_str(&format!(
            "wordvec_request_latency_us{{stat=\"max\"}} {}\n",
            self.max_latency_us()
        ));

        out
    }
}
