// One scan: list running containers, fetch and decode stats for each.

use super::DaemonApi;
use super::error::ListError;
use super::stats::{DecodedStats, decode};
use crate::format::format_percent;
use crate::models::{ContainerRecord, ListedContainer};
use tracing::debug;

/// Run one collection cycle against `daemon`.
///
/// Only a failed listing fails the cycle. A container whose stats cannot be
/// fetched or decoded is left out of the result and the scan moves on, so
/// one misbehaving container never blanks the dashboard. Records keep listing
/// order. Stats are fetched one container at a time.
pub async fn collect<D: DaemonApi>(daemon: &D) -> Result<Vec<ContainerRecord>, ListError> {
    let containers = daemon.list_running().await?;

    let mut records = Vec::with_capacity(containers.len());
    for c in &containers {
        let raw = match daemon.one_shot_stats(&c.id).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(
                    container = %c.id,
                    error = %e,
                    operation = "one_shot_stats",
                    "Skipping container"
                );
                continue;
            }
        };
        let stats = match decode(&raw) {
            Ok(stats) => stats,
            Err(e) => {
                debug!(
                    container = %c.id,
                    error = %e,
                    operation = "decode_stats",
                    "Skipping container"
                );
                continue;
            }
        };
        records.push(to_record(c, stats));
    }
    Ok(records)
}

/// Build the display row for a listed container and its decoded stats.
pub fn to_record(c: &ListedContainer, stats: DecodedStats) -> ContainerRecord {
    ContainerRecord {
        id: c.short_id(),
        name: c.display_name(),
        status: c.display_status(),
        cpu_percent: format_percent(stats.cpu_percent),
        block_io: stats.block_io_display(),
        memory: stats.memory,
        network: stats.network,
    }
}
