use crate::docker_repo::RepoOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub daemon: DaemonConfig,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Daemon address used when DOCKER_HOST is unset, e.g. "unix:///run/docker.sock".
    pub host: Option<String>,
    pub ping_timeout_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            host: None,
            ping_timeout_ms: 3000,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub poll_interval_ms: u64,
    pub stats_timeout_ms: u64,
    /// Request stats without waiting for a second CPU sample.
    pub one_shot: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            stats_timeout_ms: 5000,
            one_shot: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append logs to this file. Unset: stderr, silent unless RUST_LOG is set.
    pub file: Option<String>,
}

impl AppConfig {
    /// Load from `CONFIG_FILE`, else `config.toml` if it exists, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_path(DEFAULT_CONFIG_PATH)
            }
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.daemon.ping_timeout_ms > 0,
            "daemon.ping_timeout_ms must be > 0, got {}",
            self.daemon.ping_timeout_ms
        );
        anyhow::ensure!(
            self.daemon.request_timeout_secs > 0,
            "daemon.request_timeout_secs must be > 0, got {}",
            self.daemon.request_timeout_secs
        );
        anyhow::ensure!(
            !is_blank(self.daemon.host.as_deref()),
            "daemon.host must be non-empty when set"
        );
        anyhow::ensure!(
            self.monitoring.poll_interval_ms > 0,
            "monitoring.poll_interval_ms must be > 0, got {}",
            self.monitoring.poll_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_timeout_ms > 0,
            "monitoring.stats_timeout_ms must be > 0, got {}",
            self.monitoring.stats_timeout_ms
        );
        anyhow::ensure!(
            self.logging.file.as_deref().is_none_or(|f| !f.is_empty()),
            "logging.file must be non-empty when set"
        );
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitoring.poll_interval_ms)
    }

    pub fn repo_options(&self) -> RepoOptions {
        RepoOptions {
            host: self.daemon.host.clone(),
            ping_timeout: Duration::from_millis(self.daemon.ping_timeout_ms),
            request_timeout_secs: self.daemon.request_timeout_secs,
            stats_timeout: Duration::from_millis(self.monitoring.stats_timeout_ms),
            one_shot: self.monitoring.one_shot,
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().is_empty())
}
