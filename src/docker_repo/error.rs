// Error taxonomy for the daemon pipeline

use thiserror::Error;

/// No candidate endpoint answered its liveness ping. Fatal at startup.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no reachable container daemon (tried: {})", .attempted.join(", "))]
    NoDaemonFound { attempted: Vec<String> },
}

/// A single candidate failed to produce a live client.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("unsupported daemon address {0:?}")]
    UnsupportedAddress(String),
    #[error("failed to create client: {0}")]
    Client(#[source] bollard::errors::Error),
    #[error("ping failed: {0}")]
    Ping(#[source] bollard::errors::Error),
    #[error("ping timed out after {0} ms")]
    Timeout(u64),
}

/// Listing running containers failed; the whole cycle is lost.
#[derive(Debug, Error)]
#[error("failed to list containers: {0}")]
pub struct ListError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl ListError {
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(err))
    }
}

/// One container's stats request failed; that container is skipped.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("stats request timed out after {0} ms")]
    Timeout(u64),
    #[error("daemon returned no stats payload")]
    Empty,
}

/// A stats payload could not be turned into metrics; that container is skipped.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed stats payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stats payload has no {0} section")]
    MissingSection(&'static str),
}
