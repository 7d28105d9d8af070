// ==========================================
// Bling 批量导入网关 - 领域模型层
// ==========================================
// 职责: 定义实体类型、上游载荷、导入报告、上传令牌
// 红线: 不含网络访问逻辑,不含解析逻辑
// ==========================================

pub mod payload;
pub mod report;
pub mod token;
pub mod types;

// 重导出核心类型
pub use payload::{
    AccountPayload, Address, AdditionalData, ContactRef, CountryRef, CustomerAddresses, CustomerPayload,
    EntityPayload, FinancialData, IdRef, Occurrence, ProductPayload,
};
pub use report::{
    EmptySheetNotice, ImportReport, ImportResponse, ProcessedItem, RowError, RowOutcome,
    UploadBatch,
};
pub use token::UploadToken;
pub use types::EntityKind;
