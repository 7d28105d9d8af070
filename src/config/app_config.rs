// ==========================================
// Bling 批量导入网关 - 应用配置
// ==========================================
// 格式: TOML
// 加载顺序:
//   1. 环境变量 BLING_BFF_CONFIG 指定的文件
//   2. 可执行文件同目录下的 config.toml
//   3. 内嵌默认配置
// ==========================================

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "BLING_BFF_CONFIG";

/// 内嵌默认配置
pub const DEFAULT_CONFIG: &str = r#"
[server]
bind_addr = "0.0.0.0:8080"

[upstream]
base_url = "https://www.bling.com.br/Api/v3"
timeout_secs = 30

[import]
max_upload_bytes = 5242880
throttle_cooldown_ms = 1000

[import.pacing]
products_ms = 350
customers_ms = 500
accounts_ms = 500

[import.rate_limit]
window_secs = 900
max_requests = 100
"#;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.bling.com.br/Api/v3".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 触发限流后重试前的冷却时间
    pub throttle_cooldown_ms: u64,
    pub pacing: PacingConfig,
    pub rate_limit: RateLimitConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            throttle_cooldown_ms: 1000,
            pacing: PacingConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// 按客户端 IP 的请求限额（滑动窗口）
///
/// max_requests = 0 表示不限流
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            max_requests: 100,
        }
    }
}

/// 每次上游提交前的等待间隔（毫秒）
///
/// 产品资源上游较快,间隔更短；联系人与账款资源更慢,留更多余量。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub products_ms: u64,
    pub customers_ms: u64,
    pub accounts_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            products_ms: 350,
            customers_ms: 500,
            accounts_ms: 500,
        }
    }
}

/// 加载配置
pub fn load_config() -> anyhow::Result<AppConfig> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        tracing::info!("Loading config from {}: {}", CONFIG_PATH_ENV, path);
        return load_config_from(Path::new(&path));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");
            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return load_config_from(&config_path);
            }
            tracing::debug!("config.toml not found at: {}", config_path.display());
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// 从指定文件加载配置（缺省的段/字段使用默认值）
pub fn load_config_from(path: &Path) -> anyhow::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}
