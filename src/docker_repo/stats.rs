// Turn a raw Docker stats payload into display metrics.

use super::error::DecodeError;
use crate::format::format_bytes;
use bollard::models::{ContainerBlkioStatEntry, ContainerCpuStats, ContainerStatsResponse};

/// Metrics derived from one stats payload (current + previous CPU counters).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedStats {
    pub cpu_percent: f64,
    pub memory: String,
    /// (read, write)
    pub block_io: (String, String),
    pub network: String,
}

impl DecodedStats {
    /// Block I/O joined as `"<read> / <write>"`.
    pub fn block_io_display(&self) -> String {
        format!("{} / {}", self.block_io.0, self.block_io.1)
    }
}

/// Entry point for a raw stats payload: the JSON bytes the daemon serves on
/// `/containers/{id}/stats`. Parses, then applies [`decode`].
///
/// The poll cycle receives payloads already deserialized by bollard and calls
/// [`decode`] directly; this is for callers holding the bytes themselves,
/// such as recorded payloads or a daemon reached without bollard.
pub fn decode_json(raw: &[u8]) -> Result<DecodedStats, DecodeError> {
    let s: ContainerStatsResponse = serde_json::from_slice(raw)?;
    decode(&s)
}

/// Decode an already-deserialized payload.
///
/// `cpu_stats` is required. A missing `precpu_stats` is read as all-zero
/// counters (what a one-shot request without a prior sample looks like);
/// missing memory, block I/O or network sections count as zero.
pub fn decode(s: &ContainerStatsResponse) -> Result<DecodedStats, DecodeError> {
    let cpu = s
        .cpu_stats
        .as_ref()
        .ok_or(DecodeError::MissingSection("cpu_stats"))?;
    let cpu_percent = cpu_percent(cpu, s.precpu_stats.as_ref());

    let mem_usage = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);

    let (block_read, block_write) = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_deref())
        .map_or((0, 0), sum_by_op);

    let (rx, tx) = s.networks.as_ref().map_or((0u64, 0u64), |n| {
        n.values().fold((0u64, 0u64), |(rx, tx), v| {
            (
                rx.saturating_add(v.rx_bytes.unwrap_or(0)),
                tx.saturating_add(v.tx_bytes.unwrap_or(0)),
            )
        })
    });

    Ok(DecodedStats {
        cpu_percent,
        memory: format_bytes(mem_usage),
        block_io: (format_bytes(block_read), format_bytes(block_write)),
        network: format!("↓{} ↑{}", format_bytes(rx), format_bytes(tx)),
    })
}

/// `(cpu_delta / system_delta) * online_cpus * 100`, or exactly 0.0 unless
/// both deltas and the CPU count are strictly positive.
pub fn cpu_percent(cpu: &ContainerCpuStats, precpu: Option<&ContainerCpuStats>) -> f64 {
    let total = |c: &ContainerCpuStats| {
        c.cpu_usage
            .as_ref()
            .and_then(|u| u.total_usage)
            .unwrap_or(0) as f64
    };
    let system = |c: &ContainerCpuStats| c.system_cpu_usage.unwrap_or(0) as f64;

    let cpu_delta = total(cpu) - precpu.map_or(0.0, total);
    let system_delta = system(cpu) - precpu.map_or(0.0, system);
    let online = cpu.online_cpus.unwrap_or(0) as f64;

    if system_delta > 0.0 && cpu_delta > 0.0 && online > 0.0 {
        (cpu_delta / system_delta) * online * 100.0
    } else {
        0.0
    }
}

/// Sum Read and Write entries by their op tag, not by position; other ops
/// (Sync, Async, Total, ...) are ignored.
fn sum_by_op(entries: &[ContainerBlkioStatEntry]) -> (u64, u64) {
    let mut read = 0u64;
    let mut write = 0u64;
    for e in entries {
        let value = e.value.unwrap_or(0);
        match e.op.as_deref() {
            Some(op) if op.eq_ignore_ascii_case("read") => read = read.saturating_add(value),
            Some(op) if op.eq_ignore_ascii_case("write") => write = write.saturating_add(value),
            _ => {}
        }
    }
    (read, write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{
        ContainerBlkioStats, ContainerCpuUsage, ContainerMemoryStats, ContainerNetworkStats,
    };
    use std::collections::HashMap;

    fn cpu_stats(total_usage: u64, system_cpu_usage: u64, online: u32) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus: Some(online),
            throttling_data: None,
        }
    }

    fn blkio(op: &str, value: u64) -> ContainerBlkioStatEntry {
        ContainerBlkioStatEntry {
            op: Some(op.to_string()),
            value: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn cpu_percent_matches_formula() {
        let cur = cpu_stats(1_500_000_000, 12_000_000_000, 4);
        let prev = cpu_stats(1_000_000_000, 10_000_000_000, 4);
        assert_eq!(cpu_percent(&cur, Some(&prev)), 100.0);
    }

    #[test]
    fn cpu_percent_zero_when_system_delta_not_positive() {
        let cur = cpu_stats(200, 500, 2);
        assert_eq!(cpu_percent(&cur, Some(&cpu_stats(100, 500, 2))), 0.0);
        assert_eq!(cpu_percent(&cur, Some(&cpu_stats(100, 900, 2))), 0.0);
    }

    #[test]
    fn cpu_percent_zero_when_cpu_delta_not_positive() {
        let cur = cpu_stats(100, 1000, 2);
        assert_eq!(cpu_percent(&cur, Some(&cpu_stats(100, 500, 2))), 0.0);
        assert_eq!(cpu_percent(&cur, Some(&cpu_stats(300, 500, 2))), 0.0);
    }

    #[test]
    fn cpu_percent_zero_without_online_cpus() {
        let mut cur = cpu_stats(200, 1000, 0);
        assert_eq!(cpu_percent(&cur, Some(&cpu_stats(100, 500, 0))), 0.0);
        cur.online_cpus = None;
        assert_eq!(cpu_percent(&cur, Some(&cpu_stats(100, 500, 0))), 0.0);
    }

    #[test]
    fn decode_requires_cpu_stats() {
        let s = ContainerStatsResponse {
            precpu_stats: Some(cpu_stats(0, 0, 1)),
            ..Default::default()
        };
        assert!(matches!(
            decode(&s),
            Err(DecodeError::MissingSection("cpu_stats"))
        ));
    }

    #[test]
    fn decode_without_precpu_uses_zero_baseline() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu_stats(250, 1000, 2)),
            ..Default::default()
        };
        let out = decode(&s).unwrap();
        assert_eq!(out.cpu_percent, 50.0);
        assert_eq!(out.memory, "0 B");
        assert_eq!(out.block_io_display(), "0 B / 0 B");
        assert_eq!(out.network, "↓0 B ↑0 B");
    }

    #[test]
    fn decode_sums_memory_block_io_and_networks() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(cpu_stats(100_000_000, 1_000_000_000, 2)),
            precpu_stats: Some(cpu_stats(50_000_000, 500_000_000, 2)),
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(256 * 1024 * 1024),
                limit: Some(512 * 1024 * 1024),
                ..Default::default()
            }),
            networks: Some(HashMap::from([
                (
                    "eth0".to_string(),
                    ContainerNetworkStats {
                        rx_bytes: Some(1024),
                        tx_bytes: Some(512),
                        ..Default::default()
                    },
                ),
                (
                    "eth1".to_string(),
                    ContainerNetworkStats {
                        rx_bytes: Some(1024),
                        tx_bytes: Some(512),
                        ..Default::default()
                    },
                ),
            ])),
            blkio_stats: Some(ContainerBlkioStats {
                io_service_bytes_recursive: Some(vec![
                    blkio("Write", 2048),
                    blkio("Read", 1024),
                    blkio("Sync", 999_999),
                    blkio("read", 1024),
                    blkio("Total", 999_999),
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = decode(&s).unwrap();
        assert!((out.cpu_percent - 20.0).abs() < 0.01);
        assert_eq!(out.memory, "256.0 MB");
        assert_eq!(out.block_io, ("2.0 KB".to_string(), "2.0 KB".to_string()));
        assert_eq!(out.network, "↓2.0 KB ↑1.0 KB");
    }

    #[test]
    fn decode_json_parses_daemon_payload() {
        let raw = br#"{
            "cpu_stats": {
                "cpu_usage": {"total_usage": 1500000000},
                "system_cpu_usage": 4000000000,
                "online_cpus": 4
            },
            "precpu_stats": {
                "cpu_usage": {"total_usage": 1000000000},
                "system_cpu_usage": 2000000000
            },
            "memory_stats": {"usage": 1048576, "limit": 2097152},
            "networks": {"eth0": {"rx_bytes": 1024, "tx_bytes": 2048}}
        }"#;
        let out = decode_json(raw).unwrap();
        assert_eq!(out.cpu_percent, 100.0);
        assert_eq!(out.memory, "1.0 MB");
        assert_eq!(out.network, "↓1.0 KB ↑2.0 KB");
    }

    #[test]
    fn decode_json_rejects_garbage() {
        assert!(matches!(
            decode_json(b"{not json"),
            Err(DecodeError::Json(_))
        ));
    }
}
