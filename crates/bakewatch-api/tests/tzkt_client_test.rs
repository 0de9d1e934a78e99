#![allow(clippy::unwrap_used)]
// Integration tests for `TzktClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bakewatch_api::{Error, TzktClient};

const BAKER: &str = "tz1T1fRJmpPp1pN2z45sivxdbKNQtyatzCVx";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TzktClient) {
    let server = MockServer::start().await;
    let base = format!("{}/v1", server.uri());
    let client = TzktClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Head ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_head_level() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/head"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "level": 8_123_456,
            "hash": "BLockHash",
            "timestamp": "2025-06-01T12:00:00Z",
            "cycle": 900
        })))
        .mount(&server)
        .await;

    assert_eq!(client.head_level().await.unwrap(), 8_123_456);
}

#[tokio::test]
async fn test_head_http_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/head"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = client.head().await;
    match result {
        Err(Error::Http {
            status, message, ..
        }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/head"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let result = client.head().await;
    assert!(
        matches!(result, Err(Error::RateLimited { retry_after_secs: 7 })),
        "expected RateLimited, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/head"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.head().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Rights ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upcoming_rights_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/rights"))
        .and(query_param("baker", BAKER))
        .and(query_param("level.ge", "8000000"))
        .and(query_param("limit", "10000"))
        .and(query_param("type", "baking"))
        .and(query_param("select", "cycle,level,timestamp,type,round,status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "baking", "cycle": 900, "level": 8_000_010, "timestamp": "2025-06-01T12:01:00Z", "round": 0},
            {"type": "baking", "cycle": 900, "level": 8_000_020, "timestamp": "2025-06-01T12:02:00Z", "round": 1}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rights = client
        .upcoming_rights(BAKER, 8_000_000, 10_000)
        .await
        .unwrap();
    assert_eq!(rights.len(), 2);
    assert_eq!(rights[0].level, 8_000_010);
    assert_eq!(rights[1].round, Some(1));
}

#[tokio::test]
async fn test_past_rights_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/rights"))
        .and(query_param("baker", BAKER))
        .and(query_param("level.le", "8000000"))
        .and(query_param("limit", "20"))
        .and(query_param("sort.desc", "level"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "baking", "cycle": 899, "level": 7_999_990, "timestamp": "2025-06-01T11:00:00Z", "round": 0, "status": "realized"},
            {"type": "baking", "cycle": 899, "level": 7_999_900, "timestamp": "2025-06-01T10:00:00Z", "round": 0, "status": "missed_baking"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rights = client.past_rights(BAKER, 8_000_000, 20).await.unwrap();
    assert_eq!(rights.len(), 2);
    assert_eq!(rights[0].status.as_deref(), Some("realized"));
    assert_eq!(rights[1].status.as_deref(), Some("missed_baking"));
}

// ── Accounts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_account_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{BAKER}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "delegate",
            "address": BAKER,
            "balance": 12_000_000_000_i64,
            "stakedBalance": 10_000_000_000_i64,
            "externalStakedBalance": 5_000_000_000_i64,
            "stakersCount": 42,
            "delegatedBalance": 30_000_000_000_i64,
            "stakingBalance": 47_000_000_000_i64
        })))
        .mount(&server)
        .await;

    let account = client.account(BAKER).await.unwrap();
    assert_eq!(account.balance, 12_000_000_000);
    assert_eq!(account.staked_balance, 10_000_000_000);
    assert_eq!(account.stakers_count, 42);
    assert_eq!(account.unstaked_balance, 0);
}

#[tokio::test]
async fn test_account_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{BAKER}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.account(BAKER).await.unwrap_err();
    assert!(err.is_not_found(), "expected 404, got: {err:?}");
}

// ── Cycles ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cycles_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/cycles"))
        .and(query_param("sort.desc", "index"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "index": 900,
            "firstLevel": 7_990_000,
            "startTime": "2025-05-30T00:00:00Z",
            "lastLevel": 8_000_799,
            "endTime": "2025-06-02T00:00:00Z",
            "snapshotLevel": 7_980_000,
            "totalBakers": 300,
            "totalBakingPower": 700_000_000_000_000_i64
        }])))
        .mount(&server)
        .await;

    let cycles = client.cycles(20).await.unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].index, 900);
    assert_eq!(cycles[0].last_level, 8_000_799);
    assert_eq!(cycles[0].total_bakers, 300);
}
