#![allow(clippy::unwrap_used)]
// Integration tests for `DirectoryClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bakewatch_api::DirectoryClient;

async fn setup() -> (MockServer, DirectoryClient) {
    let server = MockServer::start().await;
    let base = format!("{}/v3/", server.uri());
    let client = DirectoryClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_list_bakers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/bakers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "address": "tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx",
                "name": "Example Baker",
                "logo": "https://services.tzkt.io/v1/avatars/tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx",
                "status": "active",
                "balance": 12_345.6,
                "delegation": {
                    "enabled": true, "minBalance": 0, "fee": 0.05,
                    "capacity": 100_000, "freeSpace": -250.5, "estimatedApy": 0.031
                },
                "staking": {
                    "enabled": false, "minBalance": 0, "fee": 0.1,
                    "capacity": 50_000, "freeSpace": 50_000, "estimatedApy": 0.09
                }
            },
            {"address": "tz1bareMinimum", "name": "Bare"}
        ])))
        .mount(&server)
        .await;

    let bakers = client.bakers().await.unwrap();
    assert_eq!(bakers.len(), 2);

    let first = &bakers[0];
    assert_eq!(first.name, "Example Baker");
    assert!(first.delegation.enabled);
    assert!(first.delegation.free_space < 0.0);
    assert!(!first.staking.enabled);

    let bare = &bakers[1];
    assert!(bare.logo.is_none());
    assert!(!bare.delegation.enabled);
    assert!(bare.staking.capacity.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_bakers_failure_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v3/bakers"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.bakers().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_transient());
}
