// ==========================================
// Bling 批量导入网关 - API 层错误类型
// ==========================================
// 职责: 请求级错误 → HTTP 状态码 + JSON 错误体
// 红线: 行级错误不在此处出现（写入导入报告,响应仍为 200）
// ==========================================

use crate::importer::ImportError;
use crate::upstream::UpstreamError;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("Token de acesso não fornecido")]
    MissingToken,

    #[error("Nenhum arquivo enviado")]
    MissingFile,

    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedMediaType(String),

    #[error("Arquivo excede o limite de {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Muitas requisições deste IP, tente novamente em {retry_after} segundos")]
    RateLimited { retry_after: u64 },

    // ==========================================
    // 导入 / 上游错误
    // ==========================================
    #[error(transparent)]
    Import(#[from] ImportError),

    /// 上游失败,message 为上游原始文本
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Erro interno: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::MissingFile | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Import(err) => match err {
                e if e.is_decode_error() => StatusCode::UNPROCESSABLE_ENTITY,
                ImportError::Validation(_) => StatusCode::BAD_REQUEST,
                ImportError::UpstreamRejected { .. }
                | ImportError::UpstreamThrottled { .. }
                | ImportError::Transport(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 错误码（JSON 错误体 error 字段）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingToken => "MISSING_TOKEN",
            ApiError::MissingFile => "MISSING_FILE",
            ApiError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            ApiError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::RateLimited { .. } => "RATE_LIMITED",
            ApiError::Import(err) => match err {
                e if e.is_decode_error() => "INVALID_SPREADSHEET",
                ImportError::Validation(_) => "VALIDATION_ERROR",
                ImportError::UpstreamRejected { .. }
                | ImportError::UpstreamThrottled { .. }
                | ImportError::Transport(_) => "UPSTREAM_ERROR",
                _ => "INTERNAL",
            },
            ApiError::Upstream { .. } => "UPSTREAM_ERROR",
            ApiError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => ApiError::Upstream {
                status: Some(status),
                message: body,
            },
            UpstreamError::Transport(message) => ApiError::Upstream {
                status: None,
                message,
            },
        }
    }
}

/// JSON 错误体
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "请求处理失败");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "请求被拒绝");
        }

        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimited { retry_after } = self {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MissingFile.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::PayloadTooLarge { limit: 10 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(ImportError::SheetNotFound("Dados".into())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ImportError::Validation("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(UpstreamError::Status {
                status: 401,
                body: "invalid_token".into()
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_rate_limited_response_carries_retry_after() {
        let response = ApiError::RateLimited { retry_after: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(RETRY_AFTER),
            Some(&HeaderValue::from_static("42"))
        );
    }

    #[test]
    fn test_upstream_message_is_raw_text() {
        let err = ApiError::from(ImportError::UpstreamRejected {
            status: 400,
            body: r#"{"error":"VALIDATION_ERROR"}"#.into(),
        });
        assert_eq!(err.to_string(), r#"{"error":"VALIDATION_ERROR"}"#);
        assert_eq!(err.code(), "UPSTREAM_ERROR");
    }
}
