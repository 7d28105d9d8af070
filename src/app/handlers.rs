// ==========================================
// Bling 批量导入网关 - HTTP 处理器
// ==========================================
// 职责: 请求级检查（令牌 / 文件 / 类型 / 大小）后委托给 API 层
// 红线: 行级失败写入报告,响应 200；只有请求级问题返回非 200
// ==========================================

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::{ApiError, ApiResult};
use crate::app::state::AppState;
use crate::config::ImportConfigReader;
use crate::domain::{EntityKind, ImportResponse, UploadToken};
use crate::upstream::ReferenceList;

/// multipart 中承载表格的字段名
pub const FILE_FIELD: &str = "file";

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

// ==========================================
// 请求级检查
// ==========================================

/// 从 Authorization 头提取 Bearer 令牌
pub fn bearer_token(headers: &HeaderMap) -> ApiResult<UploadToken> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(UploadToken::from_authorization_header)
        .ok_or(ApiError::MissingToken)
}

/// 上传文件类型白名单
///
/// octet-stream 仅在文件名为 .xlsx / .xls 时接受
pub fn is_spreadsheet(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let has_spreadsheet_extension = file_name
        .map(|name| {
            let lower = name.to_ascii_lowercase();
            lower.ends_with(".xlsx") || lower.ends_with(".xls")
        })
        .unwrap_or(false);

    match content_type.map(|ct| ct.split(';').next().unwrap_or("").trim()) {
        Some(XLSX_MIME) | Some(XLS_MIME) => true,
        Some(OCTET_STREAM_MIME) | None => has_spreadsheet_extension,
        Some(_) => false,
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::InvalidInput(err.body_text())
    }
}

/// 读取 multipart 中的表格文件
async fn read_upload(mut multipart: Multipart, limit: usize) -> ApiResult<Bytes> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        if !is_spreadsheet(content_type.as_deref(), file_name.as_deref()) {
            return Err(ApiError::UnsupportedMediaType(
                content_type.unwrap_or_else(|| "desconhecido".to_string()),
            ));
        }

        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        if bytes.len() > limit {
            return Err(ApiError::PayloadTooLarge { limit });
        }
        tracing::debug!(file_name = ?file_name, bytes = bytes.len(), "收到上传文件");
        return Ok(bytes);
    }
    Err(ApiError::MissingFile)
}

async fn upload(
    state: AppState,
    kind: EntityKind,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportResponse>> {
    let token = bearer_token(&headers)?;
    let multipart = multipart.map_err(|_| ApiError::MissingFile)?;
    let content = read_upload(multipart, state.config.max_upload_bytes()).await?;

    let response = state.import_api.import(kind, &content, &token).await?;
    Ok(Json(response))
}

async fn create(
    state: AppState,
    kind: EntityKind,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let token = bearer_token(&headers)?;
    let Json(body) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let entity = state.import_api.create(kind, body, &token).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

async fn reference(
    state: AppState,
    list: ReferenceList,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers)?;
    let value = state.upstream.fetch_reference(list, &token).await?;
    Ok(Json(value))
}

// ==========================================
// 健康检查
// ==========================================

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": crate::APP_NAME,
        "version": crate::VERSION,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ==========================================
// 批量导入
// ==========================================

pub async fn upload_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportResponse>> {
    upload(state, EntityKind::Product, headers, multipart).await
}

pub async fn upload_customers(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportResponse>> {
    upload(state, EntityKind::Customer, headers, multipart).await
}

pub async fn upload_payables(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportResponse>> {
    upload(state, EntityKind::PayableAccount, headers, multipart).await
}

pub async fn upload_receivables(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportResponse>> {
    upload(state, EntityKind::ReceivableAccount, headers, multipart).await
}

// ==========================================
// 单条创建
// ==========================================

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create(state, EntityKind::Product, headers, body).await
}

pub async fn create_customer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create(state, EntityKind::Customer, headers, body).await
}

pub async fn create_payable(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create(state, EntityKind::PayableAccount, headers, body).await
}

pub async fn create_receivable(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    create(state, EntityKind::ReceivableAccount, headers, body).await
}

// ==========================================
// 参考数据
// ==========================================

pub async fn list_payment_methods(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    reference(state, ReferenceList::FormasPagamento, headers).await
}

pub async fn list_holders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    reference(state, ReferenceList::Portadores, headers).await
}

pub async fn list_categories(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    reference(state, ReferenceList::Categorias, headers).await
}
