// ==========================================
// Bling 批量导入网关 - 批量导入编排器实现
// ==========================================
// 职责: 驱动 解码 → 映射 → 校验 → 提交 管道,累加逐行报告
// 流程（每行）:
//   Pending → Mapped → Validated → Submitted → Recorded
//   - 追踪列全空: 跳过,不计数
//   - 校验失败: 记录失败,不访问网络
//   - 提交前等待策略间隔
//   - 限流: 冷却后以同一载荷重试一次,以重试结果为准
// 并发: 单批次内严格顺序处理；批次之间互不影响
// ==========================================

use crate::domain::{ImportResponse, RowOutcome, UploadBatch, UploadToken};
use crate::importer::dq_validator::RowValidator;
use crate::importer::entity_importer_trait::{EntitySubmitter, RowDecoder, SubmitOutcome};
use crate::importer::entity_policy::EntityPolicy;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{DecodedRow, ExcelRowDecoder};
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 行处理阶段（用于日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowStage {
    Mapped,
    Validated,
    Submitted,
    Retried,
}

impl fmt::Display for RowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStage::Mapped => write!(f, "MAPPED"),
            RowStage::Validated => write!(f, "VALIDATED"),
            RowStage::Submitted => write!(f, "SUBMITTED"),
            RowStage::Retried => write!(f, "RETRIED"),
        }
    }
}

// ==========================================
// BatchImporter - 批量导入编排器
// ==========================================
pub struct BatchImporter<S>
where
    S: EntitySubmitter,
{
    // 导入组件
    decoder: Box<dyn RowDecoder>,
    validator: RowValidator,

    // 上游提交器
    submitter: S,
}

impl<S> BatchImporter<S>
where
    S: EntitySubmitter,
{
    /// 创建编排器
    ///
    /// # 参数
    /// - decoder: 表格解码器
    /// - submitter: 上游提交器
    pub fn new(decoder: Box<dyn RowDecoder>, submitter: S) -> Self {
        Self {
            decoder,
            validator: RowValidator,
            submitter,
        }
    }

    /// 使用 Excel 解码器创建
    pub fn with_excel(submitter: S) -> Self {
        Self::new(Box::new(ExcelRowDecoder), submitter)
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// 导入一份上传文件
    ///
    /// # 参数
    /// - policy: 实体导入策略
    /// - content: 上传文件原始字节
    /// - token: 调用方访问令牌
    ///
    /// # 返回
    /// - Ok(Completed): 逐行报告（行级失败不影响其他行）
    /// - Ok(EmptySheet): 只有表头
    /// - Err: 解码失败（批次级）
    #[instrument(skip_all, fields(kind = %policy.kind(), batch_id))]
    pub async fn import<P>(
        &self,
        policy: &P,
        content: &[u8],
        token: &UploadToken,
    ) -> ImportResult<ImportResponse>
    where
        P: EntityPolicy,
    {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(bytes = content.len(), token = %token, "开始批量导入");

        // === 阶段 0: 解码 ===
        let sheet = self.decoder.decode(content, &policy.sheet())?;
        if !sheet.has_data_rows() {
            info!(sheet = %sheet.name(), "工作表无数据行");
            return Ok(ImportResponse::empty_sheet(policy.kind()));
        }
        debug!(sheet = %sheet.name(), rows = sheet.row_count(), "工作表解码完成");

        // === 阶段 1-3: 逐行处理 ===
        let mut batch = UploadBatch::new(policy.kind());
        for row in sheet.into_rows() {
            if row.is_blank(policy.tracked_columns()) {
                debug!(row = row.row_number(), "空行,跳过");
                continue;
            }
            let outcome = self.process_row(policy, &row, token).await;
            if let RowOutcome::Failure { error_message, .. } = &outcome {
                warn!(row = row.row_number(), error = %error_message, "行导入失败");
            }
            batch.record(outcome);
        }

        info!(
            total = batch.total_considered(),
            success = batch.success_count(),
            errors = batch.error_count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "批量导入完成"
        );
        Ok(ImportResponse::Completed(batch.into_report()))
    }

    /// 处理单行（任何错误都收敛为该行的失败结果）
    async fn process_row<P>(
        &self,
        policy: &P,
        row: &DecodedRow,
        token: &UploadToken,
    ) -> RowOutcome
    where
        P: EntityPolicy,
    {
        let row_index = row.data_index();
        match self.run_row(policy, row, token).await {
            Ok(entity) => RowOutcome::success(row_index, entity),
            Err(e) => RowOutcome::failure(row_index, e.to_string()),
        }
    }

    async fn run_row<P>(
        &self,
        policy: &P,
        row: &DecodedRow,
        token: &UploadToken,
    ) -> ImportResult<Value>
    where
        P: EntityPolicy,
    {
        let payload = policy.map_row(row);
        debug!(row = row.row_number(), stage = %RowStage::Mapped, "行状态迁移");

        self.validator.validate(policy, &payload)?;
        debug!(row = row.row_number(), stage = %RowStage::Validated, "行状态迁移");

        let body = serde_json::to_value(&payload)?;
        let timing = policy.timing();

        tokio::time::sleep(timing.pacing).await;
        let outcome = self
            .submitter
            .submit(policy.endpoint_path(), &body, token)
            .await;
        debug!(
            row = row.row_number(),
            stage = %RowStage::Submitted,
            created = matches!(outcome, SubmitOutcome::Created(_)),
            "行状态迁移"
        );

        match outcome.into_result() {
            Err(ImportError::UpstreamThrottled { status, .. }) => {
                warn!(
                    row = row.row_number(),
                    status,
                    cooldown_ms = timing.throttle_cooldown.as_millis() as u64,
                    "上游限流,冷却后重试"
                );
                tokio::time::sleep(timing.throttle_cooldown).await;
                let retry = self
                    .submitter
                    .submit(policy.endpoint_path(), &body, token)
                    .await;
                debug!(row = row.row_number(), stage = %RowStage::Retried, "行状态迁移");
                retry.into_result()
            }
            other => other,
        }
    }
}
