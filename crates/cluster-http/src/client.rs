use std::time::Duration;

use async_trait::async_trait;
use cluster_saga::{GroupClient, GroupId, Host, HostError, HostOutcome};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::Result;

/// Per-call timeout; exceeding it counts as a transport failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const GROUP_PATH: &str = "v1/group/";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupBody<'a> {
    group_id: &'a str,
}

/// [`GroupClient`] speaking the cluster's group API over HTTP.
///
/// Holds one pooled `reqwest::Client` shared by every host.
#[derive(Debug, Clone)]
pub struct HttpGroupClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpGroupClient {
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(
        &self,
        host: &Host,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<StatusCode, HostError> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| classify(host, err))?;
        Ok(response.status())
    }
}

/// Timeouts and failures to connect or exchange the request are transport
/// failures. Anything else, such as an unparseable host URL, is unexpected.
fn classify(host: &Host, err: reqwest::Error) -> HostError {
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        HostError::transport(host, err)
    } else {
        HostError::unexpected(host, err)
    }
}

/// `{host}/v1/group/{group}/` with the id percent-encoded as one segment.
fn group_url(host: &Host, group: &GroupId) -> std::result::Result<Url, HostError> {
    let mut url =
        Url::parse(&host.url(GROUP_PATH)).map_err(|err| HostError::unexpected(host, err))?;
    url.path_segments_mut()
        .map_err(|()| HostError::unexpected(host, "host URL cannot hold a path"))?
        .pop_if_empty()
        .push(group.as_str())
        .push("");
    Ok(url)
}

fn outcome(status: StatusCode, expected: StatusCode) -> HostOutcome {
    if status == expected {
        HostOutcome::Success
    } else {
        HostOutcome::Rejected {
            status: status.as_u16(),
        }
    }
}

#[async_trait]
impl GroupClient for HttpGroupClient {
    async fn create(
        &self,
        host: &Host,
        group: &GroupId,
    ) -> std::result::Result<HostOutcome, HostError> {
        let body = GroupBody {
            group_id: group.as_str(),
        };
        let request = self.client.post(host.url(GROUP_PATH)).json(&body);
        let status = self.send(host, request).await?;

        let result = outcome(status, StatusCode::CREATED);
        if result.is_success() {
            debug!(%host, %group, "group created");
        } else {
            error!(%host, %group, %status, "failed to create group");
        }
        Ok(result)
    }

    async fn delete(
        &self,
        host: &Host,
        group: &GroupId,
    ) -> std::result::Result<HostOutcome, HostError> {
        let body = GroupBody {
            group_id: group.as_str(),
        };
        let request = self.client.delete(host.url(GROUP_PATH)).json(&body);
        let status = self.send(host, request).await?;

        let result = outcome(status, StatusCode::OK);
        if result.is_success() {
            debug!(%host, %group, "group deleted");
        } else {
            error!(%host, %group, %status, "failed to delete group");
        }
        Ok(result)
    }

    async fn exists(
        &self,
        host: &Host,
        group: &GroupId,
    ) -> std::result::Result<HostOutcome, HostError> {
        let url = group_url(host, group)?;
        let status = self.send(host, self.client.get(url)).await?;

        match status {
            StatusCode::OK => debug!(%host, %group, "group verified"),
            StatusCode::NOT_FOUND => warn!(%host, %group, "group not found"),
            _ => error!(%host, %group, %status, "unexpected status while verifying group"),
        }
        Ok(outcome(status, StatusCode::OK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_body_uses_camel_case() -> anyhow::Result<()> {
        let body = GroupBody { group_id: "g1" };

        let json = serde_json::to_value(&body)?;

        assert_eq!(json, serde_json::json!({ "groupId": "g1" }));
        Ok(())
    }

    #[test]
    fn only_expected_status_is_success() {
        assert_eq!(outcome(StatusCode::CREATED, StatusCode::CREATED), HostOutcome::Success);
        assert_eq!(
            outcome(StatusCode::OK, StatusCode::CREATED),
            HostOutcome::Rejected { status: 200 }
        );
        assert_eq!(
            outcome(StatusCode::CONFLICT, StatusCode::CREATED),
            HostOutcome::Rejected { status: 409 }
        );
    }

    #[test]
    fn group_url_escapes_reserved_characters() -> anyhow::Result<()> {
        let url = group_url(&Host::new("http://h:8000/"), &GroupId::new("team?a/b#c"))?;

        assert_eq!(url.as_str(), "http://h:8000/v1/group/team%3Fa%2Fb%23c/");
        Ok(())
    }

    #[test]
    fn group_url_keeps_plain_ids() -> anyhow::Result<()> {
        let url = group_url(&Host::new("http://h:8000"), &GroupId::new("example_group"))?;

        assert_eq!(url.as_str(), "http://h:8000/v1/group/example_group/");
        Ok(())
    }

    #[test]
    fn group_url_rejects_host_without_scheme() {
        let result = group_url(&Host::new("localhost:8000"), &GroupId::new("g"));

        assert!(matches!(result, Err(HostError::Unexpected { .. })));
    }

    #[test]
    fn client_keeps_configured_timeout() -> anyhow::Result<()> {
        let client = HttpGroupClient::new(Duration::from_secs(3))?;

        assert_eq!(client.timeout(), Duration::from_secs(3));
        Ok(())
    }
}
