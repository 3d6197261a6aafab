//! API 路由模块

mod comment;
mod config;
mod health;
mod models;

pub use comment::comment_routes;
pub use config::config_routes;
pub use health::health_routes;
pub use models::models_routes;

use axum::{http::StatusCode, Router};

use crate::state::AppState;
use std::sync::Arc;

/// 未匹配路由的兜底处理器
async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// 创建所有 API 路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(config_routes())
        .merge(comment_routes())
        .merge(models_routes())
        .fallback(not_found)
        .with_state(state)
}
