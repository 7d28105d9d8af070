// ==========================================
// Bling 批量导入网关 - 实体导入策略
// ==========================================
// 职责: 以策略对象参数化共享导入管道
//   - 工作表选择 / 追踪列（判定空行）
//   - 行映射（单元格 → 载荷）
//   - 必填字段 + 实体专属规则
//   - 上游端点 / 限速参数
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{EntityKind, EntityPayload};
use crate::importer::file_parser::{DecodedRow, SheetSelector};
use std::time::Duration;

// ==========================================
// PolicyTiming - 限速参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyTiming {
    /// 每次提交前的等待间隔
    pub pacing: Duration,
    /// 限流后重试前的冷却时间
    pub throttle_cooldown: Duration,
}

impl PolicyTiming {
    pub fn new(pacing: Duration, throttle_cooldown: Duration) -> Self {
        Self {
            pacing,
            throttle_cooldown,
        }
    }

    /// 从配置读取某实体类型的限速参数
    pub fn from_config<C: ImportConfigReader + ?Sized>(config: &C, kind: EntityKind) -> Self {
        Self::new(config.pacing_interval(kind), config.throttle_cooldown())
    }

    /// 零延迟（测试用）
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

// ==========================================
// RequiredField - 必填字段检查项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    /// 报告中显示的字段名
    pub label: &'static str,
    pub present: bool,
}

impl RequiredField {
    pub fn new(label: &'static str, present: bool) -> Self {
        Self { label, present }
    }

    /// 文本字段：存在且非空白
    pub fn text(label: &'static str, value: Option<&str>) -> Self {
        Self::new(label, value.is_some_and(|v| !v.trim().is_empty()))
    }

    /// 数值字段：存在、有限且非零
    pub fn number(label: &'static str, value: Option<f64>) -> Self {
        Self::new(label, value.is_some_and(is_truthy_number))
    }

    /// ID 字段：存在且非零
    pub fn id(label: &'static str, value: Option<i64>) -> Self {
        Self::new(label, value.is_some_and(|v| v != 0))
    }
}

/// 数值真值判定：NaN 与 0 视为未填写
fn is_truthy_number(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

// ==========================================
// EntityPolicy Trait
// ==========================================
// 用途: 每种实体一份策略,共享同一条导入管道
// 实现者: ProductPolicy, CustomerPolicy, AccountPolicy
pub trait EntityPolicy: Send + Sync {
    type Payload: EntityPayload;

    fn kind(&self) -> EntityKind;

    /// 数据所在工作表
    fn sheet(&self) -> SheetSelector {
        SheetSelector::Index(0)
    }

    /// 追踪列（全部为空即为空行,跳过且不计数）
    fn tracked_columns(&self) -> &'static [usize];

    fn timing(&self) -> PolicyTiming;

    /// 行映射（纯函数：同一行多次映射结果完全一致）
    fn map_row(&self, row: &DecodedRow) -> Self::Payload;

    /// 补齐派生字段（单条创建接口在校验前调用）
    fn prepare(&self, payload: Self::Payload) -> Self::Payload {
        payload
    }

    /// 必填字段检查项（按报告顺序）
    fn required_fields(&self, payload: &Self::Payload) -> Vec<RequiredField>;

    /// 实体专属规则（仅在必填字段齐全后执行）
    fn check_rules(&self, _payload: &Self::Payload) -> Result<(), String> {
        Ok(())
    }

    fn endpoint_path(&self) -> &'static str {
        self.kind().endpoint_path()
    }
}
