// Container daemon access via bollard

mod collector;
mod error;
mod resolver;
mod stats;

pub use collector::{collect, to_record};
pub use error::{DecodeError, ListError, ProbeError, ResolveError, StatsError};
pub use resolver::{
    Candidate, HOST_ENV, Platform, candidate_order, host_candidates, override_addr,
    platform_candidates, resolve_with,
};
pub use stats::{DecodedStats, cpu_percent, decode, decode_json};

use crate::models::ListedContainer;
use bollard::models::{ContainerStatsResponse, ContainerSummary};
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use bollard::{API_DEFAULT_VERSION, Docker};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{instrument, warn};

/// The two daemon calls a poll cycle needs.
pub trait DaemonApi: Send + Sync {
    /// Running containers, in daemon order.
    fn list_running(&self) -> impl Future<Output = Result<Vec<ListedContainer>, ListError>> + Send;

    /// A single stats payload for one container.
    fn one_shot_stats(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ContainerStatsResponse, StatsError>> + Send;
}

/// Timeouts and request shape for the daemon client.
#[derive(Debug, Clone)]
pub struct RepoOptions {
    /// Address used when `DOCKER_HOST` is unset.
    pub host: Option<String>,
    pub ping_timeout: Duration,
    /// bollard client timeout, seconds.
    pub request_timeout_secs: u64,
    pub stats_timeout: Duration,
    /// Ask the daemon not to wait for a second CPU sample.
    pub one_shot: bool,
}

impl Default for RepoOptions {
    fn default() -> Self {
        Self {
            host: None,
            ping_timeout: Duration::from_secs(3),
            request_timeout_secs: 10,
            stats_timeout: Duration::from_secs(5),
            one_shot: true,
        }
    }
}

pub struct DockerRepo {
    docker: Docker,
    options: RepoOptions,
}

impl DockerRepo {
    /// Find a reachable daemon on this host (see [`host_candidates`]).
    pub async fn connect(options: RepoOptions) -> Result<Self, ResolveError> {
        let candidates = host_candidates(options.host.as_deref());
        Self::connect_with_candidates(candidates, options).await
    }

    /// First of `candidates` that passes [`DockerRepo::probe`].
    pub async fn connect_with_candidates(
        candidates: Vec<Candidate>,
        options: RepoOptions,
    ) -> Result<Self, ResolveError> {
        let probe = |candidate| Self::probe(candidate, options.clone());
        resolve_with(candidates, probe).await
    }

    /// Build a client for `candidate` and require a ping within the deadline.
    /// Version negotiation gets the same deadline; if it fails or stalls the
    /// un-negotiated client is kept.
    #[instrument(skip(options), fields(repo = "docker", operation = "probe"))]
    pub async fn probe(candidate: Candidate, options: RepoOptions) -> Result<Self, ProbeError> {
        let docker = client_for(&candidate, options.request_timeout_secs)?;
        let timeout_ms = options.ping_timeout.as_millis() as u64;
        match tokio::time::timeout(options.ping_timeout, docker.ping()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(ProbeError::Ping(e)),
            Err(_) => return Err(ProbeError::Timeout(timeout_ms)),
        }
        let negotiate = docker.clone().negotiate_version();
        let docker = match tokio::time::timeout(options.ping_timeout, negotiate).await {
            Ok(Ok(negotiated)) => negotiated,
            Ok(Err(e)) => {
                warn!(error = %e, endpoint = %candidate, "API version negotiation failed");
                docker
            }
            Err(_) => {
                warn!(endpoint = %candidate, timeout_ms, "API version negotiation timed out");
                docker
            }
        };
        Ok(Self { docker, options })
    }
}

fn client_for(candidate: &Candidate, timeout_secs: u64) -> Result<Docker, ProbeError> {
    let docker = match candidate {
        Candidate::Override(addr) => return client_for_address(addr, timeout_secs),
        Candidate::NamedPipe(path) => {
            Docker::connect_with_socket(path, timeout_secs, API_DEFAULT_VERSION)
        }
        Candidate::UnixSocket(path) => {
            let path = path.to_string_lossy();
            Docker::connect_with_socket(&path, timeout_secs, API_DEFAULT_VERSION)
        }
        Candidate::AmbientEnv => Docker::connect_with_defaults(),
    };
    docker.map_err(ProbeError::Client)
}

fn client_for_address(addr: &str, timeout_secs: u64) -> Result<Docker, ProbeError> {
    let docker = if let Some(path) = addr
        .strip_prefix("unix://")
        .or_else(|| addr.strip_prefix("npipe://"))
    {
        Docker::connect_with_socket(path, timeout_secs, API_DEFAULT_VERSION)
    } else if addr.starts_with("tcp://") || addr.starts_with("http://") {
        Docker::connect_with_http(addr, timeout_secs, API_DEFAULT_VERSION)
    } else {
        return Err(ProbeError::UnsupportedAddress(addr.to_string()));
    };
    docker.map_err(ProbeError::Client)
}

fn listed(c: ContainerSummary) -> ListedContainer {
    ListedContainer {
        id: c.id.unwrap_or_default(),
        names: c.names.unwrap_or_default(),
        state: c.state.map(|s| s.to_string()).filter(|s| !s.is_empty()),
        status: c.status,
    }
}

impl DaemonApi for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "list_running"))]
    async fn list_running(&self) -> Result<Vec<ListedContainer>, ListError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let filter = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(filter))
            .await
            .map_err(ListError::new)?;
        Ok(containers.into_iter().map(listed).collect())
    }

    async fn one_shot_stats(&self, id: &str) -> Result<ContainerStatsResponse, StatsError> {
        let options = StatsOptions {
            stream: false,
            one_shot: self.options.one_shot,
            ..Default::default()
        };
        let mut stream = self.docker.stats(id, Some(options));
        let timeout_ms = self.options.stats_timeout.as_millis() as u64;
        match tokio::time::timeout(self.options.stats_timeout, stream.next()).await {
            Ok(Some(Ok(s))) => Ok(s),
            Ok(Some(Err(e))) => Err(StatsError::Request(Box::new(e))),
            Ok(None) => Err(StatsError::Empty),
            Err(_) => Err(StatsError::Timeout(timeout_ms)),
        }
    }
}
