// ==========================================
// Bling 批量导入网关 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 实体类型 (Entity Kind)
// ==========================================
// 每种实体对应一个上游资源端点与一套导入策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Product,           // 产品
    Customer,          // 联系人/客户
    PayableAccount,    // 应付账款
    ReceivableAccount, // 应收账款
}

impl EntityKind {
    /// 上游资源路径（相对于 API 根路径）
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            EntityKind::Product => "produtos",
            EntityKind::Customer => "contatos",
            EntityKind::PayableAccount => "contas/pagar",
            EntityKind::ReceivableAccount => "contas/receber",
        }
    }

    /// 报告中 processedItems 承载上游实体的键名
    pub fn report_key(&self) -> &'static str {
        match self {
            EntityKind::Product => "produto",
            EntityKind::Customer => "contato",
            EntityKind::PayableAccount | EntityKind::ReceivableAccount => "conta",
        }
    }

    /// 空表提示文案
    pub fn empty_sheet_guidance(&self) -> &'static str {
        match self {
            EntityKind::Product => {
                "A planilha não contém produtos para importar. Por favor, utilize o template fornecido."
            }
            EntityKind::Customer => {
                "A planilha não contém contatos para importar. Por favor, utilize o template fornecido."
            }
            EntityKind::PayableAccount | EntityKind::ReceivableAccount => {
                "A planilha não contém contas para importar. Por favor, utilize o template fornecido."
            }
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Product => write!(f, "PRODUCT"),
            EntityKind::Customer => write!(f, "CUSTOMER"),
            EntityKind::PayableAccount => write!(f, "PAYABLE_ACCOUNT"),
            EntityKind::ReceivableAccount => write!(f, "RECEIVABLE_ACCOUNT"),
        }
    }
}
