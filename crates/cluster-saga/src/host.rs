use std::fmt;

/// A cluster participant, identified by its base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host(String);

impl Host {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self(base_url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins `path` onto the base URL with exactly one `/` between them.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.0.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Host {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Host {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId(String);

impl GroupId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The ordered, fixed set of hosts a coordinator works against.
///
/// Every phase iterates hosts in this order. Duplicates are dropped on
/// construction, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostList {
    hosts: Vec<Host>,
}

impl HostList {
    #[must_use]
    pub fn new(hosts: impl IntoIterator<Item = Host>) -> Self {
        let mut unique: Vec<Host> = Vec::new();
        for host in hosts {
            if !unique.contains(&host) {
                unique.push(host);
            }
        }
        Self { hosts: unique }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Host> {
        self.hosts.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Host] {
        &self.hosts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl<H: Into<Host>> FromIterator<H> for HostList {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into))
    }
}

impl<'a> IntoIterator for &'a HostList {
    type Item = &'a Host;
    type IntoIter = std::slice::Iter<'a, Host>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let host = Host::new("http://localhost:8000/");

        assert_eq!(host.url("/v1/group/"), "http://localhost:8000/v1/group/");
    }

    #[test]
    fn url_inserts_missing_slash() {
        let host = Host::new("http://localhost:8000");

        assert_eq!(host.url("v1/group/g1/"), "http://localhost:8000/v1/group/g1/");
    }

    #[test]
    fn host_list_preserves_order() {
        let hosts: HostList = ["http://c", "http://a", "http://b"].into_iter().collect();

        let names: Vec<_> = hosts.iter().map(Host::as_str).collect();

        assert_eq!(names, ["http://c", "http://a", "http://b"]);
    }

    #[test]
    fn host_list_drops_duplicates_keeping_first() {
        let hosts: HostList = ["http://a", "http://b", "http://a"].into_iter().collect();

        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts.as_slice()[0], Host::new("http://a"));
        assert_eq!(hosts.as_slice()[1], Host::new("http://b"));
    }

    #[test]
    fn empty_host_list() {
        let hosts = HostList::default();

        assert!(hosts.is_empty());
        assert_eq!(hosts.iter().count(), 0);
    }
}
