// ==========================================
// 上传对账系统 - 订单账本客户端
// ==========================================
// 职责: 对外提供 "获取当前订单"，屏蔽传输抖动与响应结构不固定
// 流程: 缓存命中 → 直接返回；否则 请求 → 状态检查 → JSON 解码 → 递归提取 → 去重 → 写缓存
// 重试: 每次调用最多 max_attempts 次；截断 JSON 与传输错误进入下一次尝试，
//       非截断的解码错误与 >=300 状态码立即失败
// ==========================================

use crate::config::LedgerConfig;
use crate::domain::order::{ExternalOrder, LedgerSnapshot};
use crate::ledger::error::{LedgerError, LedgerResult};
use crate::ledger::extractor::extract_orders;
use crate::ledger::snapshot_cache::SnapshotCache;
use crate::ledger::transport::{HttpLedgerTransport, LedgerTransport};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct OrderLedgerClient<T = HttpLedgerTransport> {
    transport: T,
    cache: Arc<SnapshotCache>,
    max_attempts: u32,
}

impl OrderLedgerClient<HttpLedgerTransport> {
    /// 按配置创建 HTTP 客户端（独立缓存）
    pub fn from_config(config: &LedgerConfig) -> LedgerResult<Self> {
        let transport = HttpLedgerTransport::new(config)?;
        let cache = Arc::new(SnapshotCache::new(config.cache_ttl));
        Ok(Self::with_transport(transport, cache, config.max_attempts))
    }
}

impl<T: LedgerTransport> OrderLedgerClient<T> {
    /// 注入传输层与缓存（缓存可在多个客户端间共享）
    pub fn with_transport(transport: T, cache: Arc<SnapshotCache>, max_attempts: u32) -> Self {
        Self {
            transport,
            cache,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }

    /// 当前有效的缓存快照（不触发拉取）
    pub fn cached_snapshot(&self) -> Option<Arc<LedgerSnapshot>> {
        self.cache.get_fresh()
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// 获取当前订单快照
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub async fn get_orders(&self) -> LedgerResult<Arc<LedgerSnapshot>> {
        if let Some(snapshot) = self.cache.get_fresh() {
            info!(orders = snapshot.len(), "账本缓存命中");
            return Ok(snapshot);
        }

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            info!(attempt = attempt, "拉取账本订单");

            match self.fetch_once().await {
                Ok(orders) => {
                    info!(attempt = attempt, orders = orders.len(), "账本订单提取完成");
                    return Ok(self.cache.store(LedgerSnapshot::new(orders)));
                }
                Err(e) if e.is_retryable() => {
                    warn!(attempt = attempt, error = %e, "账本拉取失败，进入下一次尝试");
                    last_error = Some(e);
                }
                Err(e) => {
                    error!(attempt = attempt, error = %e, "账本拉取失败，不再重试");
                    return Err(e);
                }
            }
        }

        let last = last_error
            .unwrap_or_else(|| LedgerError::Transport("未执行任何尝试".to_string()));
        error!(attempts = self.max_attempts, error = %last, "账本重试次数耗尽");
        Err(LedgerError::RetriesExhausted {
            attempts: self.max_attempts,
            last: Box::new(last),
        })
    }

    async fn fetch_once(&self) -> LedgerResult<Vec<ExternalOrder>> {
        let response = self.transport.fetch().await?;
        info!(status = response.status, body_bytes = response.body.len(), "账本接口响应");

        if response.status >= 300 {
            return Err(LedgerError::status(response.status, &response.body));
        }

        let raw: Value = serde_json::from_slice(&response.body)?;
        Ok(extract_orders(&raw))
    }
}
