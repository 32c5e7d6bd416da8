// ==========================================
// 上传对账系统 - 对账校验API
// ==========================================
// 职责: 编排一次完整校验
//   文件 → 原始表格 → 表头定位 → 行记录
//   账本客户端 → 订单快照
//   (记录, 快照) → 校验报告
// 红线: 任一阶段失败即中止，不做部分表格 / 空账本降级
// ==========================================

use crate::api::error::ApiResult;
use crate::api::table_api::{TableApi, TablePreview};
use crate::config::LedgerConfig;
use crate::domain::upload::{RawTable, ValidationReport};
use crate::engine::validation::ValidationEngine;
use crate::ledger::{HttpLedgerTransport, LedgerTransport, OrderLedgerClient};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 批量校验中单个文件的结果
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: ApiResult<ValidationReport>,
}

/// 对账校验API
pub struct ValidationApi<T: LedgerTransport = HttpLedgerTransport> {
    client: Arc<OrderLedgerClient<T>>,
    tables: TableApi,
    engine: ValidationEngine,
}

impl ValidationApi<HttpLedgerTransport> {
    /// 按配置创建（HTTP 账本客户端）
    pub fn from_config(config: &LedgerConfig) -> ApiResult<Self> {
        let client = OrderLedgerClient::from_config(config)?;
        Ok(Self::new(Arc::new(client)))
    }
}

impl<T: LedgerTransport> ValidationApi<T> {
    /// 注入账本客户端（客户端可在多个 API 实例间共享）
    pub fn new(client: Arc<OrderLedgerClient<T>>) -> Self {
        Self {
            client,
            tables: TableApi::new(),
            engine: ValidationEngine::new(),
        }
    }

    pub fn client(&self) -> &Arc<OrderLedgerClient<T>> {
        &self.client
    }

    pub fn tables(&self) -> &TableApi {
        &self.tables
    }

    pub fn load_table(&self, path: &Path) -> ApiResult<RawTable> {
        self.tables.load_table(path)
    }

    pub fn save_table(&self, path: &Path, table: &RawTable) -> ApiResult<()> {
        self.tables.save_table(path, table)
    }

    pub fn inspect(&self, path: &Path) -> ApiResult<TablePreview> {
        self.tables.inspect(path)
    }

    /// 校验单个上传文件
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn validate_upload(&self, path: &Path) -> ApiResult<ValidationReport> {
        let table = self.load_table(path)?;
        info!(rows = table.len(), "上传文件读取完成");
        self.validate_table(&table).await
    }

    /// 校验已读入的表格
    pub async fn validate_table(&self, table: &RawTable) -> ApiResult<ValidationReport> {
        let (header_index, records) = self.tables.records(table);

        let snapshot = self.client.get_orders().await?;
        let rows = self.engine.validate(&records, &snapshot.orders);

        let report = ValidationReport {
            run_id: Uuid::new_v4(),
            header_index,
            orders_count: snapshot.len(),
            rows,
        };
        info!(
            run_id = %report.run_id,
            header_index = header_index,
            records = records.len(),
            orders = report.orders_count,
            "校验报告生成"
        );
        Ok(report)
    }

    /// 并发校验多个文件；单个文件失败不影响其他文件
    #[instrument(skip(self, paths), fields(files = paths.len()))]
    pub async fn validate_batch(&self, paths: &[PathBuf]) -> Vec<BatchItem> {
        let tasks = paths.iter().map(|path| async move {
            let result = self.validate_upload(path).await;
            if let Err(e) = &result {
                warn!(path = %path.display(), kind = %e.kind(), error = %e, "文件校验失败");
            }
            BatchItem {
                path: path.clone(),
                result,
            }
        });

        let items = join_all(tasks).await;
        info!(
            succeeded = items.iter().filter(|i| i.result.is_ok()).count(),
            failed = items.iter().filter(|i| i.result.is_err()).count(),
            "批量校验完成"
        );
        items
    }
}
