// Shared test helpers: an in-memory daemon

#![allow(dead_code)]

use bollard::models::ContainerStatsResponse;
use dockerview::docker_repo::{DaemonApi, ListError, StatsError};
use dockerview::models::ListedContainer;
use std::collections::HashMap;
use std::sync::Mutex;

pub enum FakeStats {
    Ok(ContainerStatsResponse),
    Fail,
    Timeout,
}

#[derive(Default)]
pub struct FakeDaemon {
    pub listing: Mutex<Option<Vec<ListedContainer>>>,
    pub stats: HashMap<String, FakeStats>,
    pub stats_calls: Mutex<Vec<String>>,
}

impl FakeDaemon {
    pub fn with_listing(listing: Vec<ListedContainer>) -> Self {
        Self {
            listing: Mutex::new(Some(listing)),
            ..Default::default()
        }
    }

    /// Listing calls fail until `set_listing` is called.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn set_listing(&self, listing: Option<Vec<ListedContainer>>) {
        *self.listing.lock().unwrap() = listing;
    }

    pub fn stats_for(mut self, id: &str, stats: FakeStats) -> Self {
        self.stats.insert(id.to_string(), stats);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.stats_calls.lock().unwrap().clone()
    }
}

impl DaemonApi for FakeDaemon {
    async fn list_running(&self) -> Result<Vec<ListedContainer>, ListError> {
        self.listing
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ListError::new(std::io::Error::other("daemon unavailable")))
    }

    async fn one_shot_stats(&self, id: &str) -> Result<ContainerStatsResponse, StatsError> {
        self.stats_calls.lock().unwrap().push(id.to_string());
        match self.stats.get(id) {
            Some(FakeStats::Ok(s)) => Ok(s.clone()),
            Some(FakeStats::Fail) => Err(StatsError::Request(Box::new(std::io::Error::other(
                "no such container",
            )))),
            Some(FakeStats::Timeout) => Err(StatsError::Timeout(5000)),
            None => Err(StatsError::Empty),
        }
    }
}

pub fn listed(id: &str, name: &str) -> ListedContainer {
    ListedContainer {
        id: id.to_string(),
        names: vec![format!("/{name}")],
        state: Some("running".to_string()),
        status: Some("Up 2 minutes".to_string()),
    }
}

/// Stats with 100% CPU (4 CPUs, a quarter of system time), 1 MiB memory.
pub fn stats() -> ContainerStatsResponse {
    serde_json::from_value(serde_json::json!({
        "cpu_stats": {
            "cpu_usage": {"total_usage": 1_500_000_000u64},
            "system_cpu_usage": 4_000_000_000u64,
            "online_cpus": 4
        },
        "precpu_stats": {
            "cpu_usage": {"total_usage": 1_000_000_000u64},
            "system_cpu_usage": 2_000_000_000u64
        },
        "memory_stats": {"usage": 1_048_576u64},
        "blkio_stats": {
            "io_service_bytes_recursive": [
                {"major": 8, "minor": 0, "op": "read", "value": 2048},
                {"major": 8, "minor": 0, "op": "write", "value": 1024}
            ]
        },
        "networks": {"eth0": {"rx_bytes": 1024, "tx_bytes": 3072}}
    }))
    .expect("stats fixture")
}

/// A payload the decoder rejects (no cpu_stats section).
pub fn undecodable_stats() -> ContainerStatsResponse {
    ContainerStatsResponse::default()
}
