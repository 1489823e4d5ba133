//! Concurrency tests
//!
//! These tests verify thread-safety of the shared service objects:
//! - Concurrent registrations are never lost
//! - Concurrent WebSocket clients all receive the stream
//! - Farm events from many producer tasks are all counted

use std::sync::Arc;

use async_trait::async_trait;
use rds_stats::{HubResult, Subscriber, SubscriberRegistry};
use tokio::net::UnixDatagram;

use crate::helpers::*;

struct Sink;

#[async_trait]
impl Subscriber for Sink {
    async fn send_text(&self, _text: String) -> HubResult<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_register_no_lost_updates() {
    let registry = SubscriberRegistry::new();

    let mut tasks = vec![];
    for _ in 0..64 {
        let registry = registry.clone();
        tasks.push(tokio::spawn(async move { registry.register(Arc::new(Sink)).await }));
    }

    let mut ids = vec![];
    for task in tasks {
        ids.push(task.await.unwrap());
    }

    assert_eq!(registry.len().await, 64);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 64);

    let mut tasks = vec![];
    for id in ids {
        let registry = registry.clone();
        tasks.push(tokio::spawn(async move { registry.unregister(id).await }));
    }
    for task in tasks {
        assert!(task.await.unwrap());
    }
    assert!(registry.is_empty().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_broadcast_during_registration() {
    let registry = SubscriberRegistry::new();

    let broadcaster = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for i in 0..100 {
                registry.broadcast(&i.to_string()).await;
            }
        })
    };

    let mut tasks = vec![];
    for _ in 0..32 {
        let registry = registry.clone();
        tasks.push(tokio::spawn(async move { registry.register(Arc::new(Sink)).await }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    broadcaster.await.unwrap();

    assert_eq!(registry.len().await, 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_clients_all_receive_events() {
    let hub = Arc::new(TestHub::spawn(None).await);

    let mut clients = vec![];
    for _ in 0..8 {
        let (client, _) = tokio_tungstenite::connect_async(hub.ws_url()).await.unwrap();
        clients.push(client);
    }
    wait_for_subscribers(&hub.registry, 8).await;

    let raw = farm_event("A", "B", 1, 1);
    hub.send(&raw).await;

    for client in clients.iter_mut() {
        assert_eq!(next_text(client).await, raw);
    }

    drop(clients);
    wait_for_subscribers(&hub.registry, 0).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_producers_all_counted() {
    let hub = Arc::new(TestHub::spawn(None).await);

    let mut tasks = vec![];
    for i in 0..10u64 {
        let path = hub.socket_path.clone();
        tasks.push(tokio::spawn(async move {
            let producer = UnixDatagram::unbound().unwrap();
            for j in 0..10u64 {
                send_datagram(&producer, &path, &farm_event("A", "B", 1, i * 10 + j)).await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    hub.wait_for_quantity("A", "B", 100).await;
}
