// ==========================================
// 上传对账系统 - 账本传输层
// ==========================================
// 职责: 单次 GET 请求，返回状态码与完整响应体
// 固定请求头: 桌面浏览器 UA / Accept: application/json /
//             Accept-Encoding: identity（避免压缩流被截断）/ Connection: close
// ==========================================

use crate::config::LedgerConfig;
use crate::ledger::error::{LedgerError, LedgerResult};
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, CONNECTION, USER_AGENT,
};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;

/// 原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

// ==========================================
// LedgerTransport Trait
// ==========================================
// 实现者: HttpLedgerTransport；测试中可替换为桩实现
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    async fn fetch(&self) -> LedgerResult<LedgerResponse>;
}

#[async_trait]
impl<T: LedgerTransport + ?Sized> LedgerTransport for Arc<T> {
    async fn fetch(&self) -> LedgerResult<LedgerResponse> {
        (**self).fetch().await
    }
}

// ==========================================
// HttpLedgerTransport - reqwest 实现
// ==========================================
pub struct HttpLedgerTransport {
    client: Client,
    url: String,
}

impl HttpLedgerTransport {
    pub fn new(config: &LedgerConfig) -> LedgerResult<Self> {
        let url = config.api_url.trim();
        if url.is_empty() {
            return Err(LedgerError::MissingEndpoint);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| LedgerError::Transport(format!("User-Agent 无效: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LedgerTransport for HttpLedgerTransport {
    async fn fetch(&self) -> LedgerResult<LedgerResponse> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| LedgerError::Transport(format!("read body error: {}", e)))?;

        debug!(status = status, body_bytes = body.len(), url = %self.url, "账本响应已读取");
        Ok(LedgerResponse {
            status,
            body: body.to_vec(),
        })
    }
}
