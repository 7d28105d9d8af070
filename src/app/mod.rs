// ==========================================
// Bling 批量导入网关 - 应用层
// ==========================================
// 职责: HTTP 集成,连接 Web 前端与后端
// ==========================================

pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

// 重导出
pub use rate_limit::RateLimiter;
pub use routes::configure_routes;
pub use state::AppState;
