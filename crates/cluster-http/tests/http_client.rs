//! Integration tests for the HTTP transport against a mock host.

use std::time::Duration;

use cluster_http::HttpGroupClient;
use cluster_saga::{GroupClient, GroupId, Host, HostError, HostOutcome};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> anyhow::Result<HttpGroupClient> {
    Ok(HttpGroupClient::new(Duration::from_secs(2))?)
}

async fn mount(server: &MockServer, verb: &str, route: &str, status: u16) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_posts_group_id_and_accepts_201() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/group/"))
        .and(body_json(json!({ "groupId": "example_group" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client()?
        .create(&Host::new(server.uri()), &GroupId::new("example_group"))
        .await?;

    assert_eq!(outcome, HostOutcome::Success);
    Ok(())
}

#[tokio::test]
async fn create_treats_other_statuses_as_rejection() -> anyhow::Result<()> {
    for status in [200, 400, 409, 500] {
        let server = MockServer::start().await;
        mount(&server, "POST", "/v1/group/", status).await;

        let outcome = client()?
            .create(&Host::new(server.uri()), &GroupId::new("g"))
            .await?;

        assert_eq!(outcome, HostOutcome::Rejected { status });
    }
    Ok(())
}

#[tokio::test]
async fn delete_sends_body_and_accepts_200() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/group/"))
        .and(body_json(json!({ "groupId": "g" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client()?
        .delete(&Host::new(server.uri()), &GroupId::new("g"))
        .await?;

    assert_eq!(outcome, HostOutcome::Success);
    Ok(())
}

#[tokio::test]
async fn delete_rejection_keeps_status() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount(&server, "DELETE", "/v1/group/", 500).await;

    let outcome = client()?
        .delete(&Host::new(server.uri()), &GroupId::new("g"))
        .await?;

    assert_eq!(outcome, HostOutcome::Rejected { status: 500 });
    Ok(())
}

#[tokio::test]
async fn verify_maps_200_404_and_anomalies() -> anyhow::Result<()> {
    for (status, expected) in [
        (200, HostOutcome::Success),
        (404, HostOutcome::Rejected { status: 404 }),
        (503, HostOutcome::Rejected { status: 503 }),
    ] {
        let server = MockServer::start().await;
        mount(&server, "GET", "/v1/group/g1/", status).await;

        let outcome = client()?
            .exists(&Host::new(server.uri()), &GroupId::new("g1"))
            .await?;

        assert_eq!(outcome, expected);
    }
    Ok(())
}

#[tokio::test]
async fn verify_escapes_group_id_as_one_segment() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/group/team"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount(&server, "GET", "/v1/group/team%3Fa%2Fb/", 404).await;

    let outcome = client()?
        .exists(&Host::new(server.uri()), &GroupId::new("team?a/b"))
        .await?;

    assert_eq!(outcome, HostOutcome::Rejected { status: 404 });
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/v1/group/team%3Fa%2Fb/");
    assert_eq!(requests[0].url.query(), None);
    Ok(())
}

#[tokio::test]
async fn trailing_slash_in_host_is_tolerated() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount(&server, "GET", "/v1/group/g1/", 200).await;

    let outcome = client()?
        .exists(&Host::new(format!("{}/", server.uri())), &GroupId::new("g1"))
        .await?;

    assert_eq!(outcome, HostOutcome::Success);
    Ok(())
}

#[tokio::test]
async fn slow_host_times_out_as_transport_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    let client = HttpGroupClient::new(Duration::from_millis(100))?;

    let result = client
        .create(&Host::new(server.uri()), &GroupId::new("g"))
        .await;

    assert!(matches!(result, Err(HostError::Transport { .. })));
    Ok(())
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() -> anyhow::Result<()> {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let host = Host::new(format!("http://{}", listener.local_addr()?));
    drop(listener);

    let result = client()?.delete(&host, &GroupId::new("g")).await;

    assert!(matches!(result, Err(HostError::Transport { .. })));
    Ok(())
}

#[tokio::test]
async fn host_without_scheme_is_unexpected() -> anyhow::Result<()> {
    let result = client()?
        .create(&Host::new("localhost:8000"), &GroupId::new("g"))
        .await;

    assert!(matches!(result, Err(HostError::Unexpected { .. })));
    Ok(())
}
