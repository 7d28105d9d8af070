// ==========================================
// Bling 批量导入网关 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
//   - RowDecoder: 字节 → 工作表（阶段 0）
//   - EntitySubmitter: 载荷 → 上游 ERP（阶段 3）
// ==========================================

use crate::domain::UploadToken;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{DecodedSheet, SheetSelector};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// 上游限流响应的特征字符串（出现在错误文本任意位置即视为限流）
pub const THROTTLE_SIGNATURE: &str = "TOO_MANY_REQUESTS";

// ==========================================
// RowDecoder Trait
// ==========================================
// 用途: 上传文件解码（阶段 0）
// 实现者: ExcelRowDecoder
pub trait RowDecoder: Send + Sync {
    /// 解码上传内容并选取工作表
    ///
    /// # 参数
    /// - content: 上传文件原始字节
    /// - sheet: 工作表选择（位置或名称）
    ///
    /// # 返回
    /// - Ok(DecodedSheet): 选中的工作表
    /// - Err: 非表格文件 / 工作表不存在（批次级错误）
    fn decode(&self, content: &[u8], sheet: &SheetSelector) -> ImportResult<DecodedSheet>;
}

// ==========================================
// SubmitOutcome - 单次提交结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 2xx,携带上游响应体
    Created(Value),
    /// 非 2xx,保留原始响应文本
    Rejected { status: u16, body: String },
    /// 网络/协议失败
    Transport(String),
}

impl SubmitOutcome {
    /// 是否为限流响应
    ///
    /// 只有上游拒绝才可能是限流；传输失败一律不重试
    pub fn is_throttled(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected { body, .. } if is_throttled(body))
    }

    /// 转换为行级结果
    pub fn into_result(self) -> ImportResult<Value> {
        match self {
            SubmitOutcome::Created(entity) => Ok(entity),
            SubmitOutcome::Rejected { status, body } if is_throttled(&body) => {
                Err(ImportError::UpstreamThrottled { status, body })
            }
            SubmitOutcome::Rejected { status, body } => {
                Err(ImportError::UpstreamRejected { status, body })
            }
            SubmitOutcome::Transport(message) => Err(ImportError::Transport(message)),
        }
    }
}

/// 错误文本是否带有限流特征
pub fn is_throttled(error_text: &str) -> bool {
    error_text.contains(THROTTLE_SIGNATURE)
}

// ==========================================
// EntitySubmitter Trait
// ==========================================
// 用途: 向上游 ERP 提交单个实体（阶段 3）
// 实现者: BlingClient；测试中为脚本化桩
#[async_trait]
pub trait EntitySubmitter: Send + Sync {
    /// 提交一个实体
    ///
    /// # 参数
    /// - endpoint_path: 上游资源路径（如 /produtos）
    /// - payload: 已序列化的实体载荷
    /// - token: 调用方持有的访问令牌
    ///
    /// # 返回
    /// - 单次提交结果；本方法不做重试
    async fn submit(&self, endpoint_path: &str, payload: &Value, token: &UploadToken)
        -> SubmitOutcome;
}

#[async_trait]
impl<T> EntitySubmitter for Arc<T>
where
    T: EntitySubmitter + ?Sized,
{
    async fn submit(
        &self,
        endpoint_path: &str,
        payload: &Value,
        token: &UploadToken,
    ) -> SubmitOutcome {
        (**self).submit(endpoint_path, payload, token).await
    }
}
