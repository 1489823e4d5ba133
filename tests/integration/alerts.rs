//! Cargo ship alert tests
//!
//! These tests verify that:
//! - A crate spawn posts exactly one webhook message per event
//! - Other World events never alert
//! - Webhook failures do not affect ingestion

use std::time::Duration;

use rds_stats::discord::{DiscordManager, Notifier};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

const CRATE_SPAWN: &str =
    r#"{"category":3,"timestamp":1,"id_subject":"OnCargoShipSpawnCrate","id_object":"x","quantity":0}"#;

async fn wait_for_requests(server: &MockServer, expected: usize) {
    for _ in 0..100 {
        if server.received_requests().await.unwrap_or_default().len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("webhook never received {expected} requests");
}

#[tokio::test]
async fn test_crate_spawn_posts_one_alert() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "content": "Crate spawned on Cargo Ship!" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = TestHub::spawn(Some(format!("{}/api/webhooks/1/token", mock_server.uri()))).await;
    hub.send(CRATE_SPAWN).await;

    wait_for_requests(&mock_server, 1).await;

    // a later farm event proves the loop moved past the alert without a second request
    hub.send(&farm_event("A", "B", 1, 1)).await;
    hub.wait_for_quantity("A", "B", 1).await;

    mock_server.verify().await;
    assert_eq!(hub.stats.len(), 1);
}

#[tokio::test]
async fn test_other_world_events_do_not_alert() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let hub = TestHub::spawn(Some(format!("{}/hook", mock_server.uri()))).await;
    hub.send(r#"{"category":3,"timestamp":1,"id_subject":"OnPatrolHeli","id_object":"x","quantity":0}"#)
        .await;
    hub.send(r#"{"category":2,"timestamp":1,"id_subject":"OnCargoShipSpawnCrate","id_object":"x","quantity":1}"#)
        .await;
    hub.wait_for_quantity("OnCargoShipSpawnCrate", "x", 1).await;

    mock_server.verify().await;
}

#[tokio::test]
async fn test_malformed_crate_spawn_does_not_alert() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let hub = TestHub::spawn(Some(format!("{}/hook", mock_server.uri()))).await;
    hub.send(r#"{"category":3,"timestamp":1,"id_subject":"OnCargoShipSpawnCrate""#)
        .await;
    hub.send(&farm_event("A", "B", 1, 1)).await;
    hub.wait_for_quantity("A", "B", 1).await;

    mock_server.verify().await;
    assert_eq!(hub.stats.len(), 1);
}

#[tokio::test]
async fn test_webhook_error_status_is_not_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = TestHub::spawn(Some(format!("{}/hook", mock_server.uri()))).await;
    hub.send(CRATE_SPAWN).await;
    wait_for_requests(&mock_server, 1).await;

    hub.send(&farm_event("A", "B", 2, 1)).await;
    hub.wait_for_quantity("A", "B", 2).await;
}

#[tokio::test]
async fn test_unreachable_webhook_is_not_fatal() {
    let hub = TestHub::spawn(Some(format!("http://127.0.0.1:{}/hook", closed_port()))).await;
    hub.send(CRATE_SPAWN).await;

    hub.send(&farm_event("A", "B", 2, 1)).await;
    hub.wait_for_quantity("A", "B", 2).await;
}

#[tokio::test]
async fn test_discord_manager_posts_content() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({ "content": "hello" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = DiscordManager::new(Some(format!("{}/hook", mock_server.uri())));
    manager.notify("hello").await.unwrap();

    mock_server.verify().await;
}

#[tokio::test]
async fn test_crate_spawn_without_quantity_still_alerts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "content": "Crate spawned on Cargo Ship!" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = TestHub::spawn(Some(format!("{}/hook", mock_server.uri()))).await;
    hub.send(r#"{"category":3,"timestamp":1,"id_subject":"OnCargoShipSpawnCrate","id_object":"x"}"#)
        .await;

    wait_for_requests(&mock_server, 1).await;
    mock_server.verify().await;
}
