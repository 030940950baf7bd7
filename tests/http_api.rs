//! HTTP surface of coordinator and replicas, exercised over real sockets

mod support;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use support::{spawn_coordinator, spawn_replica};

#[tokio::test]
async fn test_submit_and_read_everywhere() {
    let r1 = spawn_replica("replica-1", Duration::ZERO).await;
    let r2 = spawn_replica("replica-2", Duration::ZERO).await;
    let (coord_url, _) = spawn_coordinator(&[&r1, &r2], Duration::from_secs(5)).await;
    let client = Client::new();

    let resp = client
        .post(format!("{coord_url}/api/messages"))
        .json(&json!({ "message": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["sequence_number"], 1);

    for url in [&coord_url, &r1.http_url, &r2.http_url] {
        let body: Value = client
            .get(format!("{url}/api/messages"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1, "node {url}");
        assert_eq!(messages[0]["sequence_number"], 1);
        assert_eq!(messages[0]["content"], "hello");
    }
}

#[tokio::test]
async fn test_timeout_surfaces_as_server_error() {
    let r1 = spawn_replica("replica-1", Duration::ZERO).await;
    let slow = spawn_replica("slow", Duration::from_secs(2)).await;
    let (coord_url, _) = spawn_coordinator(&[&r1, &slow], Duration::from_millis(200)).await;
    let client = Client::new();

    let resp = client
        .post(format!("{coord_url}/api/messages"))
        .json(&json!({ "message": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body.get("sequence_number").is_none());

    let body: Value = client
        .get(format!("{coord_url}/api/messages"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_coordinator_health_probes_replicas() {
    let r1 = spawn_replica("replica-1", Duration::ZERO).await;
    let (coord_url, _) = spawn_coordinator(&[&r1], Duration::from_secs(5)).await;

    let body: Value = Client::new()
        .get(format!("{coord_url}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["replicas"][0]["replica_id"], "replica-1");
    assert_eq!(body["replicas"][0]["status"], "healthy");
}
