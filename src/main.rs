//! Student Report Comment Generator - Rust Backend
//!
//! 使用 axum 框架构建的后端服务，接收学生评估数据并调用
//! 生成式 API 产出简短的教师评语。

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;

use api::create_api_routes;
use state::create_shared_state;

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comment_rs=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting report comment generator backend...");

    // 创建共享状态
    let state = create_shared_state();

    // 配置 CORS（允许所有来源）
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 构建路由
    let app = Router::new()
        .merge(create_api_routes(Arc::clone(&state)))
        .layer(cors);

    // 绑定地址，端口可通过 PORT 环境变量覆盖
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8799);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on: {}", addr);

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
