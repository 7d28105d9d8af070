// ==========================================
// Bling 批量导入网关 - Bling API v3 客户端
// ==========================================
// 职责:
//   - 创建实体（POST,每次调用恰好一次请求,不重试）
//   - 读取参考数据列表（GET）
// 认证: Authorization: Bearer <调用方令牌>
// ==========================================

use crate::config::UpstreamConfig;
use crate::domain::UploadToken;
use crate::importer::entity_importer_trait::{EntitySubmitter, SubmitOutcome};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ==========================================
// 参考数据列表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceList {
    FormasPagamento, // 付款方式
    Portadores,      // 持有人（会计账户）
    Categorias,      // 收支分类
}

impl ReferenceList {
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            ReferenceList::FormasPagamento => "formas-pagamentos",
            ReferenceList::Portadores => "contas-contabeis",
            ReferenceList::Categorias => "categorias/receitas-despesas",
        }
    }
}

impl fmt::Display for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint_path())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// 上游非 2xx,保留原始响应文本
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("Falha de comunicação com o Bling: {0}")]
    Transport(String),
}

// ==========================================
// BlingClient
// ==========================================
#[derive(Debug, Clone)]
pub struct BlingClient {
    client: reqwest::Client,
    base_url: String,
}

impl BlingClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - config: 上游配置（根路径、超时）
    pub fn new(config: &UpstreamConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 读取参考数据列表,原样返回上游 JSON
    pub async fn fetch_reference(
        &self,
        list: ReferenceList,
        token: &UploadToken,
    ) -> Result<Value, UpstreamError> {
        let url = self.url(list.endpoint_path());
        tracing::debug!(url = %url, "Bling API: GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), "参考数据读取失败");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))
    }
}

#[async_trait]
impl EntitySubmitter for BlingClient {
    async fn submit(
        &self,
        endpoint_path: &str,
        payload: &Value,
        token: &UploadToken,
    ) -> SubmitOutcome {
        let url = self.url(endpoint_path);
        tracing::debug!(url = %url, "Bling API: POST");

        let response = match self
            .client
            .post(&url)
            .bearer_auth(token.expose())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SubmitOutcome::Transport(e.to_string()),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return SubmitOutcome::Transport(e.to_string()),
        };
        tracing::debug!(url = %url, status = status.as_u16(), "Bling API response");

        if !status.is_success() {
            return SubmitOutcome::Rejected {
                status: status.as_u16(),
                body,
            };
        }

        // 201 可能无响应体
        if body.trim().is_empty() {
            return SubmitOutcome::Created(Value::Null);
        }
        match serde_json::from_str::<Value>(&body) {
            Ok(entity) => SubmitOutcome::Created(entity),
            Err(e) => SubmitOutcome::Transport(format!("Resposta inválida do Bling: {}", e)),
        }
    }
}
