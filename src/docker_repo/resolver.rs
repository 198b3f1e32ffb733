// Daemon endpoint discovery: ordered candidates, first live one wins.

use super::error::ResolveError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding an explicit daemon address.
pub const HOST_ENV: &str = "DOCKER_HOST";

const UNIX_SYSTEM_SOCKET: &str = "/var/run/docker.sock";

const WINDOWS_PIPES: [&str; 4] = [
    "//./pipe/docker_engine",
    "//./pipe/dockerDesktopLinuxEngine",
    "//./pipe/podman-machine-default",
    "//./pipe/rancher_desktop",
];

/// Home-relative sockets of desktop VM backends (Colima, Docker Desktop,
/// OrbStack, Rancher Desktop), probed after the system socket.
const HOME_SOCKETS: [&str; 4] = [
    ".colima/default/docker.sock",
    ".docker/run/docker.sock",
    ".orbstack/run/docker.sock",
    ".rd/docker.sock",
];

const MACOS_PODMAN_SOCKET: &str = ".local/share/containers/podman/machine/podman.sock";
const LIMA_SOCKET: &str = ".lima/docker/sock/docker.sock";

/// One place the daemon might be listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Explicitly configured address (`unix://`, `npipe://`, `tcp://`, `http://`).
    Override(String),
    NamedPipe(String),
    UnixSocket(PathBuf),
    /// Whatever the client library derives from the environment.
    AmbientEnv,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Override(addr) => write!(f, "{addr}"),
            Candidate::NamedPipe(path) => write!(f, "npipe://{path}"),
            Candidate::UnixSocket(path) => write!(f, "unix://{}", path.display()),
            Candidate::AmbientEnv => f.write_str("environment defaults"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    OtherUnix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::OtherUnix
        }
    }
}

/// Well-known endpoints for `platform`, most likely first.
///
/// Home-relative sockets are skipped when `home` is unknown, rootless sockets
/// when `uid` is unknown.
pub fn platform_candidates(
    platform: Platform,
    home: Option<&Path>,
    uid: Option<u32>,
) -> Vec<Candidate> {
    if platform == Platform::Windows {
        return WINDOWS_PIPES
            .iter()
            .map(|p| Candidate::NamedPipe((*p).to_string()))
            .collect();
    }

    let mut out = vec![Candidate::UnixSocket(PathBuf::from(UNIX_SYSTEM_SOCKET))];
    if let Some(home) = home {
        out.extend(
            HOME_SOCKETS
                .iter()
                .map(|rel| Candidate::UnixSocket(home.join(rel))),
        );
    }
    match platform {
        Platform::Linux => {
            if let Some(uid) = uid {
                let run = PathBuf::from(format!("/run/user/{uid}"));
                out.push(Candidate::UnixSocket(run.join("docker.sock")));
                out.push(Candidate::UnixSocket(run.join("podman/podman.sock")));
            }
        }
        Platform::MacOs => {
            if let Some(home) = home {
                out.push(Candidate::UnixSocket(home.join(MACOS_PODMAN_SOCKET)));
            }
        }
        Platform::Windows | Platform::OtherUnix => {}
    }
    if let Some(home) = home {
        out.push(Candidate::UnixSocket(home.join(LIMA_SOCKET)));
    }
    out
}

/// Full probe order: override (if any), platform list, ambient defaults.
pub fn candidate_order(
    override_addr: Option<&str>,
    platform: Platform,
    home: Option<&Path>,
    uid: Option<u32>,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    if let Some(addr) = override_addr.map(str::trim).filter(|s| !s.is_empty()) {
        out.push(Candidate::Override(addr.to_string()));
    }
    out.extend(platform_candidates(platform, home, uid));
    out.push(Candidate::AmbientEnv);
    out
}

/// Candidates for this host: `DOCKER_HOST` (or `config_host`), then the
/// platform list, then ambient defaults.
pub fn host_candidates(config_host: Option<&str>) -> Vec<Candidate> {
    let env_host = std::env::var(HOST_ENV).ok();
    let home = std::env::var_os("HOME").map(PathBuf::from);
    candidate_order(
        override_addr(env_host.as_deref(), config_host),
        Platform::current(),
        home.as_deref(),
        current_uid(),
    )
}

/// `DOCKER_HOST` wins over the configured host; a blank value counts as unset.
pub fn override_addr<'a>(
    env_host: Option<&'a str>,
    config_host: Option<&'a str>,
) -> Option<&'a str> {
    let set = |s: &&str| !s.trim().is_empty();
    env_host.filter(set).or(config_host.filter(set))
}

#[cfg(target_os = "linux")]
fn current_uid() -> Option<u32> {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata("/proc/self").ok().map(|m| m.uid())
}

#[cfg(not(target_os = "linux"))]
fn current_uid() -> Option<u32> {
    None
}

/// Probe `candidates` in order and return the first client that answers.
/// Each candidate is probed at most once; failed clients are dropped.
pub async fn resolve_with<T, E, F, Fut>(
    candidates: Vec<Candidate>,
    mut probe: F,
) -> Result<T, ResolveError>
where
    F: FnMut(Candidate) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempted = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let label = candidate.to_string();
        match probe(candidate).await {
            Ok(client) => {
                info!(endpoint = %label, "Connected to container daemon");
                return Ok(client);
            }
            Err(e) => {
                debug!(endpoint = %label, error = %e, operation = "probe", "Candidate rejected");
                attempted.push(label);
            }
        }
    }
    Err(ResolveError::NoDaemonFound { attempted })
}
