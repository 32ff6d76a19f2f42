//! End-to-end saga runs against mock hosts over HTTP.

use std::time::Duration;

use cluster_http::HttpGroupClient;
use cluster_saga::{
    ClusterDelete, GroupId, Host, HostList, HostOperations, RetryPolicy, SagaCoordinator,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct MockHost {
    server: MockServer,
}

impl MockHost {
    async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn host(&self) -> Host {
        Host::new(self.server.uri())
    }

    async fn answer(&self, verb: &str, route: &str, status: u16, times: u64) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(&self.server)
            .await;
    }
}

fn operations() -> anyhow::Result<HostOperations<HttpGroupClient>> {
    let client = HttpGroupClient::new(Duration::from_secs(2))?;
    Ok(HostOperations::new(client, RetryPolicy::immediate(3)))
}

async fn cluster() -> [MockHost; 3] {
    [MockHost::start().await, MockHost::start().await, MockHost::start().await]
}

fn host_list(hosts: &[MockHost]) -> HostList {
    HostList::new(hosts.iter().map(MockHost::host))
}

#[tokio::test]
async fn group_is_created_and_verified_on_every_host() -> anyhow::Result<()> {
    let hosts = cluster().await;
    for mock in &hosts {
        mock.answer("POST", "/v1/group/", 201, 1).await;
        mock.answer("GET", "/v1/group/example_group/", 200, 1).await;
        mock.answer("DELETE", "/v1/group/", 200, 0).await;
    }
    let saga = SagaCoordinator::new(host_list(&hosts), operations()?);

    let committed = saga.execute(&GroupId::new("example_group")).await?;

    assert!(committed);
    Ok(())
}

#[tokio::test]
async fn rejection_on_third_host_rolls_back_first_two() -> anyhow::Result<()> {
    let [a, b, c] = cluster().await;
    for mock in [&a, &b] {
        mock.answer("POST", "/v1/group/", 201, 1).await;
        mock.answer("DELETE", "/v1/group/", 200, 1).await;
        mock.answer("GET", "/v1/group/g/", 404, 1).await;
    }
    c.answer("POST", "/v1/group/", 409, 1).await;
    c.answer("DELETE", "/v1/group/", 200, 0).await;
    let hosts = [a, b, c];
    let saga = SagaCoordinator::new(host_list(&hosts), operations()?);

    let report = saga.execute_with_report(&GroupId::new("g")).await?;

    assert!(!report.is_committed());
    assert!(report.residual.is_empty());
    assert_eq!(report.success_hosts, [hosts[0].host(), hosts[1].host()]);
    Ok(())
}

#[tokio::test]
async fn group_still_visible_after_rollback_is_residual() -> anyhow::Result<()> {
    let [a, b] = [MockHost::start().await, MockHost::start().await];
    a.answer("POST", "/v1/group/", 201, 1).await;
    a.answer("DELETE", "/v1/group/", 200, 1).await;
    a.answer("GET", "/v1/group/g/", 200, 1).await;
    b.answer("POST", "/v1/group/", 500, 1).await;
    let hosts = [a, b];
    let saga = SagaCoordinator::new(host_list(&hosts), operations()?);

    let report = saga.execute_with_report(&GroupId::new("g")).await?;

    assert!(!report.is_committed());
    assert_eq!(report.residual.hosts(), [hosts[0].host()]);
    Ok(())
}

#[tokio::test]
async fn cluster_delete_reports_failing_host() -> anyhow::Result<()> {
    let [a, b, c] = cluster().await;
    a.answer("DELETE", "/v1/group/", 200, 1).await;
    b.answer("DELETE", "/v1/group/", 500, 1).await;
    c.answer("DELETE", "/v1/group/", 200, 1).await;
    let hosts = [a, b, c];
    let delete = ClusterDelete::new(host_list(&hosts), operations()?);

    let residual = delete.delete_group(&GroupId::new("g")).await?;

    assert_eq!(residual.hosts(), [hosts[1].host()]);
    Ok(())
}
