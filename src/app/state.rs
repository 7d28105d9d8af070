// ==========================================
// Bling 批量导入网关 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::ImportApi;
use crate::app::rate_limit::RateLimiter;
use crate::config::AppConfig;
use crate::importer::BatchImporter;
use crate::upstream::BlingClient;

/// 应用状态
///
/// 各请求共享；只读,不保存任何请求数据
#[derive(Clone)]
pub struct AppState {
    /// 实体导入 API
    pub import_api: Arc<ImportApi<Arc<BlingClient>>>,

    /// 上游客户端（参考数据读取）
    pub upstream: Arc<BlingClient>,

    /// 系统配置
    pub config: Arc<AppConfig>,

    /// 按客户端 IP 的请求限流
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    /// 按配置创建 AppState
    ///
    /// # 返回
    /// - Err: HTTP 客户端初始化失败
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!(base_url = %config.upstream.base_url, "初始化 Bling 客户端");
        let upstream = Arc::new(BlingClient::new(&config.upstream)?);
        Ok(Self::with_upstream(config, upstream))
    }

    /// 使用指定上游客户端创建
    pub fn with_upstream(config: AppConfig, upstream: Arc<BlingClient>) -> Self {
        let importer = BatchImporter::with_excel(upstream.clone());
        let import_api = ImportApi::from_config(importer, &config);
        let rate_limiter = RateLimiter::from_config(&config.import.rate_limit);
        Self {
            import_api: Arc::new(import_api),
            upstream,
            config: Arc::new(config),
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        }
    }
}
