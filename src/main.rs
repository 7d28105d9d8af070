// ==========================================
// Bling 批量导入网关 - 服务主入口
// ==========================================
// 技术栈: axum + tokio
// 系统定位: Web 前端与 Bling ERP 之间的 BFF
// ==========================================

use anyhow::Context;
use std::net::SocketAddr;

use bling_import_bff::app::{configure_routes, AppState};
use bling_import_bff::config::load_config;
use bling_import_bff::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("Bling 批量导入网关");
    tracing::info!("系统版本: {}", bling_import_bff::VERSION);
    tracing::info!("==================================================");

    let config = load_config()?;
    let bind_addr = config.server.bind_addr.clone();

    tracing::info!("正在初始化AppState...");
    let state = AppState::from_config(config)?;
    let app = configure_routes(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("无法监听地址 {}", bind_addr))?;
    tracing::info!("服务已启动: http://{}", bind_addr);

    // 限流按客户端地址计数,需要连接信息
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("HTTP 服务异常退出")?;
    Ok(())
}
