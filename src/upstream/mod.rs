// ==========================================
// Bling 批量导入网关 - 上游层
// ==========================================
// 职责: Bling ERP v3 REST API 访问（创建实体 / 参考数据）
// ==========================================

pub mod bling_client;

pub use bling_client::{BlingClient, ReferenceList, UpstreamError};
