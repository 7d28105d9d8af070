// ==========================================
// 集成测试公共辅助
// ==========================================
#![allow(dead_code)]

pub mod mock_submitter;
pub mod stub_upstream;
pub mod xlsx_builder;
