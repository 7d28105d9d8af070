// ==========================================
// Bling 批量导入网关 - 核心库
// ==========================================
// 技术栈: axum + reqwest + calamine
// 系统定位: Web 前端与 Bling ERP v3 API 之间的 BFF
// 核心: 表格批量导入（解码 → 映射 → 校验 → 限速提交 → 报告）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 载荷/报告/令牌
pub mod domain;

// 导入层 - 批量导入管道
pub mod importer;

// 上游层 - Bling API 客户端
pub mod upstream;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{EntityKind, ImportReport, ImportResponse, RowOutcome, UploadBatch, UploadToken};
pub use importer::{BatchImporter, EntityPolicy, EntitySubmitter, ImportError, SubmitOutcome};
pub use upstream::BlingClient;

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "bling-import-bff";
