//! Health Checks
//!
//! Server health status backed by a store reachability probe.

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::store::VectorStore;

/// Health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health summary returned by the `/health` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub store: String,
    pub uptime_secs: u64,
    pub version: String,
}

/// Health check manager
pub struct HealthCheck {
    start_time: Instant,
}

impl Default for HealthCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthCheck {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Probe the store and assemble a health report.
    pub async fn check(&self, store: &Arc<dyn VectorStore>) -> HealthReport {
        let (status, store_msg) = match store.ping().await {
            Ok(()) => (HealthStatus::Healthy, "reachable".to_string()),
            Err(e) => (HealthStatus::Unhealthy, e.to_string()),
        };

        HealthReport {
            status,
            store: store_msg,
            uptime_secs: self.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_healthy_report() {
        let store: Arc<dyn VectorStore> =
            Arc::new(MemoryStore::from_entries(2, [("dog".to_string(), vec![1.0, 0.0])]).unwrap());
        let health = HealthCheck::new();

        let report = health.check(&store).await;
        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.store, "reachable");
        assert!(!report.version.is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(HealthStatus::Healthy.to_string(), "healthy");
        assert_eq!(HealthStatus::Unhealthy.to_string(), "unhealthy");
    }
}
