// ==========================================
// 上传对账系统 - 账本快照缓存
// ==========================================
// 并发约定: 单写多读；读方只在锁内克隆 Arc，不在锁内做 I/O
// 红线: 仅在 TTL 窗口内返回快照；只有完整解码成功的快照才会写入
// 限制: 并发未命中不合并，每个调用方各自拉取
// ==========================================

use crate::domain::order::LedgerSnapshot;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry {
    snapshot: Arc<LedgerSnapshot>,
    expires_at: Instant,
}

pub struct SnapshotCache {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// TTL 窗口内的快照
    pub fn get_fresh(&self) -> Option<Arc<LedgerSnapshot>> {
        let now = Instant::now();
        let guard = self.entry.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|entry| now < entry.expires_at)
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// 整体替换快照并重置过期时间
    pub fn store(&self, snapshot: LedgerSnapshot) -> Arc<LedgerSnapshot> {
        let snapshot = Arc::new(snapshot);
        let entry = CacheEntry {
            snapshot: Arc::clone(&snapshot),
            expires_at: Instant::now() + self.ttl,
        };

        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
        snapshot
    }

    pub fn invalidate(&self) {
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::ExternalOrder;

    fn snapshot(token: &str) -> LedgerSnapshot {
        LedgerSnapshot::new(vec![ExternalOrder {
            order_token: token.to_string(),
            subscriber_id: String::new(),
            timestamp: String::new(),
            status_code: -1,
        }])
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_within_ttl_then_expires() {
        let cache = SnapshotCache::new(Duration::from_secs(300));
        assert!(cache.get_fresh().is_none());

        cache.store(snapshot("T1"));
        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get_fresh().unwrap().orders[0].order_token, "T1");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get_fresh().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_replaces_wholesale() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let first = cache.store(snapshot("T1"));
        cache.store(snapshot("T2"));

        assert_eq!(first.orders[0].order_token, "T1");
        assert_eq!(cache.get_fresh().unwrap().orders[0].order_token, "T2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_fresh() {
        let cache = SnapshotCache::new(Duration::ZERO);
        cache.store(snapshot("T1"));
        assert!(cache.get_fresh().is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        cache.store(snapshot("T1"));
        cache.invalidate();
        assert!(cache.get_fresh().is_none());
    }
}
