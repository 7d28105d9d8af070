// ==========================================
// Bling 批量导入网关 - 配置层
// ==========================================
// 职责: 系统配置加载（环境变量路径 → 可执行文件旁 config.toml → 内嵌默认）
// ==========================================

pub mod app_config;
pub mod import_config_trait;

// 重导出核心配置
pub use app_config::{
    load_config, load_config_from, AppConfig, ImportConfig, PacingConfig, RateLimitConfig,
    ServerConfig, UpstreamConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG,
};
pub use import_config_trait::ImportConfigReader;
