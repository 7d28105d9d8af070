// ==========================================
// Bling 批量导入网关 - 路由配置
// ==========================================

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::app::handlers;
use crate::app::rate_limit;
use crate::app::state::AppState;
use crate::config::ImportConfigReader;

// multipart 边界与表单头的余量
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn configure_routes(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        // 健康检查
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        // 批量导入
        .route("/products/upload", post(handlers::upload_products))
        .route("/customers/upload", post(handlers::upload_customers))
        .route("/accounts-payable/upload", post(handlers::upload_payables))
        .route("/accounts-receivable/upload", post(handlers::upload_receivables))
        // 单条创建
        .route("/products", post(handlers::create_product))
        .route("/customers", post(handlers::create_customer))
        .route("/accounts-payable", post(handlers::create_payable))
        .route("/accounts-receivable", post(handlers::create_receivable))
        // 参考数据
        .route(
            "/reference/formas-pagamento",
            get(handlers::list_payment_methods),
        )
        .route("/reference/portadores", get(handlers::list_holders))
        .route("/reference/categorias", get(handlers::list_categories))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit,
        ))
        .with_state(state)
}
