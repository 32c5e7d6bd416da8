// ==========================================
// 订单账本客户端集成测试
// ==========================================
// 测试目标: TTL 缓存、去重、HTTP 请求头、状态码与重试
// ==========================================


use std::sync::Arc;
use std::time::Duration;
use test_helpers::{spawn_ledger_stub, CountingTransport, LEDGER_T1_S1};
use upload_reconcile::ledger::{LedgerError, SnapshotCache};
use upload_reconcile::{logging, LedgerConfig, OrderLedgerClient};

fn counting_client(
    transport: &Arc<CountingTransport>,
    ttl: Duration,
) -> OrderLedgerClient<Arc<CountingTransport>> {
    OrderLedgerClient::with_transport(Arc::clone(transport), Arc::new(SnapshotCache::new(ttl)), 2)
}

#[tokio::test(start_paused = true)]
async fn test_ttl_window_controls_network_calls() {
    logging::init_test();
    let transport = CountingTransport::new(LEDGER_T1_S1);
    let client = counting_client(&transport, Duration::from_secs(300));

    client.get_orders().await.unwrap();
    tokio::time::advance(Duration::from_secs(120)).await;
    client.get_orders().await.unwrap();
    assert_eq!(transport.calls(), 1);

    tokio::time::advance(Duration::from_secs(181)).await;
    let snapshot = client.get_orders().await.unwrap();

    assert_eq!(transport.calls(), 2);
    assert_eq!(snapshot.orders[0].subscriber_id, "S1");
}

#[tokio::test(start_paused = true)]
async fn test_shared_cache_between_clients() {
    let cache = Arc::new(SnapshotCache::new(Duration::from_secs(60)));
    let first = CountingTransport::new(LEDGER_T1_S1);
    let second = CountingTransport::new("[]");

    OrderLedgerClient::with_transport(Arc::clone(&first), Arc::clone(&cache), 2)
        .get_orders()
        .await
        .unwrap();
    let snapshot = OrderLedgerClient::with_transport(Arc::clone(&second), Arc::clone(&cache), 2)
        .get_orders()
        .await
        .unwrap();

    assert_eq!(second.calls(), 0);
    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn test_identical_orders_collapse() {
    let body = r#"[
        {"ordertoken": "T1", "subid": "S1", "timestamp": "2024-03-20", "status": 1},
        {"ordertoken": "T1", "subid": "S1", "timestamp": "2024-03-20", "status": 1}
    ]"#;
    let transport = CountingTransport::new(body);

    let snapshot = counting_client(&transport, Duration::from_secs(300))
        .get_orders()
        .await
        .unwrap();

    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn test_http_request_headers() {
    let stub = spawn_ledger_stub(200, LEDGER_T1_S1).await;
    let client = OrderLedgerClient::from_config(&LedgerConfig::new(&stub.url)).unwrap();

    let snapshot = client.get_orders().await.unwrap();

    assert_eq!(snapshot.orders[0].order_token, "T1");
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let head = requests[0].to_ascii_lowercase();
    assert!(head.starts_with("get /orders "));
    assert!(head.contains("accept: application/json"));
    assert!(head.contains("accept-encoding: identity"));
    assert!(head.contains("connection: close"));
    assert!(head.contains("user-agent: mozilla/5.0"));
}

#[tokio::test]
async fn test_http_error_status_fails_without_retry() {
    let stub = spawn_ledger_stub(500, "{\"error\": \"boom\"}").await;
    let client = OrderLedgerClient::from_config(&LedgerConfig::new(&stub.url)).unwrap();

    let err = client.get_orders().await.unwrap_err();

    assert!(matches!(err, LedgerError::Status { status: 500, .. }));
    assert_eq!(stub.requests().len(), 1);
    assert!(client.cached_snapshot().is_none());
}

#[tokio::test]
async fn test_http_truncated_body_exhausts_budget() {
    let stub = spawn_ledger_stub(200, "{\"data\": [{\"ordertoken\": \"T1\"").await;
    let config = LedgerConfig::new(&stub.url).with_max_attempts(3);
    let client = OrderLedgerClient::from_config(&config).unwrap();

    let err = client.get_orders().await.unwrap_err();

    assert!(matches!(err, LedgerError::RetriesExhausted { attempts: 3, .. }));
    assert_eq!(stub.requests().len(), 3);
}
