// ==========================================
// Bling 批量导入网关 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
//   - 解码错误: 批次级致命,在逐行处理前抛出
//   - 行级错误: 校验/上游拒绝/限流/传输,记录到该行并继续
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
///
/// 行级错误的 Display 即该行写入报告的错误文本。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    // ===== 解码错误（批次级） =====
    #[error("Arquivo não é uma planilha válida: {0}")]
    WorkbookOpen(String),

    #[error("Aba da planilha não encontrada: {0}")]
    SheetNotFound(String),

    #[error("Falha ao ler a aba {sheet}: {message}")]
    SheetRead { sheet: String, message: String },

    // ===== 行级错误 =====
    #[error("{0}")]
    Validation(String),

    /// 上游非 2xx,保留原始响应体
    #[error("{body}")]
    UpstreamRejected { status: u16, body: String },

    /// 上游限流,原样保留响应体以便重试失败时写入报告
    #[error("{body}")]
    UpstreamThrottled { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    // ===== 通用错误 =====
    #[error("Erro interno: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 是否为批次级解码错误
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ImportError::WorkbookOpen(_)
                | ImportError::SheetNotFound(_)
                | ImportError::SheetRead { .. }
        )
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::WorkbookOpen(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
