//! Health Check

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::tools::pages::PageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checked_at: DateTime<Utc>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Ping the CMS and report whether it answered.
pub async fn health_check<S: PageSource + ?Sized>(source: &S) -> HealthReport {
    let started = Instant::now();
    let result = source.ping().await;
    let latency_ms = started.elapsed().as_millis() as u64;
    let checked_at = Utc::now();

    match result {
        Ok(()) => HealthReport {
            status: HealthStatus::Ok,
            checked_at,
            latency_ms,
            error: None,
        },
        Err(e) => {
            log::warn!("health check failed after {latency_ms}ms: {e}");
            HealthReport {
                status: HealthStatus::Degraded,
                checked_at,
                latency_ms,
                error: Some(e.to_string()),
            }
        }
    }
}
