// ==========================================
// Bling 批量导入网关 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::app_config::{AppConfig, ImportConfig};
use crate::domain::EntityKind;
use std::time::Duration;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入策略构造时读取限速参数
// 实现者: ImportConfig / AppConfig；测试可提供零延迟实现
pub trait ImportConfigReader: Send + Sync {
    /// 获取某实体类型每次提交前的等待间隔
    ///
    /// # 默认值
    /// - 产品: 350ms
    /// - 联系人/账款: 500ms
    fn pacing_interval(&self, kind: EntityKind) -> Duration;

    /// 获取限流后重试前的冷却时间
    ///
    /// # 默认值
    /// - 1000ms
    fn throttle_cooldown(&self) -> Duration;

    /// 获取上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 5 MiB
    fn max_upload_bytes(&self) -> usize;
}

impl ImportConfigReader for ImportConfig {
    fn pacing_interval(&self, kind: EntityKind) -> Duration {
        let ms = match kind {
            EntityKind::Product => self.pacing.products_ms,
            EntityKind::Customer => self.pacing.customers_ms,
            EntityKind::PayableAccount | EntityKind::ReceivableAccount => {
                self.pacing.accounts_ms
            }
        };
        Duration::from_millis(ms)
    }

    fn throttle_cooldown(&self) -> Duration {
        Duration::from_millis(self.throttle_cooldown_ms)
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl ImportConfigReader for AppConfig {
    fn pacing_interval(&self, kind: EntityKind) -> Duration {
        self.import.pacing_interval(kind)
    }

    fn throttle_cooldown(&self) -> Duration {
        self.import.throttle_cooldown()
    }

    fn max_upload_bytes(&self) -> usize {
        self.import.max_upload_bytes()
    }
}
