use cluster_saga::{Host, HostList};
use tracing::warn;

pub(crate) const HOSTS_ENV_VAR: &str = "HOSTS";

pub(crate) const DEFAULT_HOSTS: &[&str] = &[
    "http://localhost:8000",
    "http://localhost:8001",
    "http://localhost:8002",
];

/// Resolve the cluster from `--hosts`, then `$HOSTS`, then the local defaults.
pub(crate) fn resolve_hosts(cli_hosts: Option<&str>) -> HostList {
    let raw = match cli_hosts {
        Some(list) => list.to_string(),
        None => std::env::var(HOSTS_ENV_VAR).unwrap_or_default(),
    };
    parse_hosts(&raw)
}

/// Split a comma-separated host list, falling back to [`DEFAULT_HOSTS`]
/// when it holds no entries.
pub(crate) fn parse_hosts(raw: &str) -> HostList {
    let mut hosts: Vec<Host> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(Host::from)
        .collect();

    if hosts.is_empty() {
        warn!("{HOSTS_ENV_VAR} is not set or is empty, using default hosts");
        hosts = DEFAULT_HOSTS.iter().copied().map(Host::from).collect();
    }

    for host in &hosts {
        if !has_http_scheme(host) {
            warn!(%host, "host URL does not start with http:// or https://");
        }
    }

    HostList::new(hosts)
}

fn has_http_scheme(host: &Host) -> bool {
    host.as_str().starts_with("http://") || host.as_str().starts_with("https://")
}
