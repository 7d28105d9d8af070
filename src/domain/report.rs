// ==========================================
// Bling 批量导入网关 - 导入批次与报告
// ==========================================
// 红线: 报告顺序 = 源表行顺序
// 红线: success + errors == total（total 只计非空行）
// 生命周期: 单次上传请求内创建、填充、序列化后丢弃
// ==========================================

use crate::domain::types::EntityKind;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

const COMPLETED_MESSAGE: &str = "Processamento concluído";
const EMPTY_SHEET_MESSAGE: &str = "Planilha vazia";

// ==========================================
// RowOutcome - 单行最终结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// 上游创建成功,entity 为上游返回体
    Success { row_index: usize, entity: Value },
    /// 校验或上游失败
    Failure {
        row_index: usize,
        error_message: String,
    },
}

impl RowOutcome {
    pub fn success(row_index: usize, entity: Value) -> Self {
        RowOutcome::Success { row_index, entity }
    }

    pub fn failure(row_index: usize, error_message: impl Into<String>) -> Self {
        RowOutcome::Failure {
            row_index,
            error_message: error_message.into(),
        }
    }

    /// 数据行序号（1 起,不含表头）
    pub fn row_index(&self) -> usize {
        match self {
            RowOutcome::Success { row_index, .. } | RowOutcome::Failure { row_index, .. } => {
                *row_index
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Success { .. })
    }
}

// ==========================================
// UploadBatch - 单次上传的结果累加器
// ==========================================
#[derive(Debug, Clone)]
pub struct UploadBatch {
    kind: EntityKind,
    rows: Vec<RowOutcome>,
    total_considered: usize,
}

impl UploadBatch {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            total_considered: 0,
        }
    }

    /// 追加一行结果（调用方保证行号严格递增）
    pub fn record(&mut self, outcome: RowOutcome) {
        debug_assert!(
            self.rows
                .last()
                .map_or(true, |last| last.row_index() < outcome.row_index()),
            "row outcomes must be recorded in ascending row order"
        );
        self.total_considered += 1;
        self.rows.push(outcome);
    }

    pub fn total_considered(&self) -> usize {
        self.total_considered
    }

    pub fn success_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_success()).count()
    }

    pub fn error_count(&self) -> usize {
        self.rows.len() - self.success_count()
    }

    /// 生成对外报告
    pub fn into_report(self) -> ImportReport {
        let success = self.success_count();
        let report_key = self.kind.report_key();
        let mut errors = Vec::new();
        let mut processed_items = Vec::with_capacity(self.rows.len());

        for outcome in self.rows {
            match outcome {
                RowOutcome::Success { row_index, entity } => {
                    processed_items.push(ProcessedItem::Success {
                        index: row_index,
                        report_key,
                        entity,
                    });
                }
                RowOutcome::Failure {
                    row_index,
                    error_message,
                } => {
                    errors.push(RowError {
                        index: row_index,
                        // 表头占第 1 行
                        row: row_index + 1,
                        error: error_message.clone(),
                    });
                    processed_items.push(ProcessedItem::Error {
                        index: row_index,
                        error: error_message,
                    });
                }
            }
        }

        ImportReport {
            message: COMPLETED_MESSAGE.to_string(),
            total: self.total_considered,
            success,
            errors,
            processed_items,
        }
    }
}

// ==========================================
// 报告结构（JSON 对外契约）
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub index: usize,
    pub row: usize,
    pub error: String,
}

/// processedItems 元素；成功项的实体键名随实体类型变化（produto/contato/conta）
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedItem {
    Success {
        index: usize,
        report_key: &'static str,
        entity: Value,
    },
    Error {
        index: usize,
        error: String,
    },
}

impl Serialize for ProcessedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        match self {
            ProcessedItem::Success {
                index,
                report_key,
                entity,
            } => {
                map.serialize_entry("index", index)?;
                map.serialize_entry("status", "success")?;
                map.serialize_entry(*report_key, entity)?;
            }
            ProcessedItem::Error { index, error } => {
                map.serialize_entry("index", index)?;
                map.serialize_entry("status", "error")?;
                map.serialize_entry("error", error)?;
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub message: String,
    pub total: usize,
    pub success: usize,
    pub errors: Vec<RowError>,
    pub processed_items: Vec<ProcessedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptySheetNotice {
    pub message: String,
    pub error: String,
}

/// 导入响应：正常报告 或 空表提示
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportResponse {
    Completed(ImportReport),
    EmptySheet(EmptySheetNotice),
}

impl ImportResponse {
    pub fn empty_sheet(kind: EntityKind) -> Self {
        ImportResponse::EmptySheet(EmptySheetNotice {
            message: EMPTY_SHEET_MESSAGE.to_string(),
            error: kind.empty_sheet_guidance().to_string(),
        })
    }

    /// 正常报告（空表时为 None）
    pub fn report(&self) -> Option<&ImportReport> {
        match self {
            ImportResponse::Completed(report) => Some(report),
            ImportResponse::EmptySheet(_) => None,
        }
    }
}
