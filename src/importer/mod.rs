// ==========================================
// Bling 批量导入网关 - 导入层
// ==========================================
// 职责: 上传表格 → 逐行载荷 → 上游 ERP,生成逐行报告
// 支持: Excel (.xlsx / .xls)
// 实体: 产品 / 联系人 / 应付账款 / 应收账款
// ==========================================

// 模块声明
pub mod account_policy;
pub mod customer_policy;
pub mod dq_validator;
pub mod entity_importer_impl;
pub mod entity_importer_trait;
pub mod entity_policy;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod product_policy;

// 重导出核心类型
pub use account_policy::AccountPolicy;
pub use customer_policy::{normalize_person_type, CustomerPolicy, CUSTOMER_SHEET};
pub use dq_validator::RowValidator;
pub use entity_importer_impl::BatchImporter;
pub use entity_policy::{EntityPolicy, PolicyTiming, RequiredField};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CellValue, DecodedRow, DecodedSheet, ExcelRowDecoder, SheetSelector};
pub use product_policy::ProductPolicy;

// 重导出 Trait 接口
pub use entity_importer_trait::{
    is_throttled, EntitySubmitter, RowDecoder, SubmitOutcome, THROTTLE_SIGNATURE,
};
