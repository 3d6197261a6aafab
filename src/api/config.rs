//! 配置管理端点

use axum::{
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{get_config, update_config, AppConfig};
use crate::error::AppResult;
use crate::state::AppState;

/// 配置响应（隐藏 api_key 的实际值）
#[derive(Serialize)]
pub struct ConfigResponse {
    /// 是否已设置 API 密钥
    pub api_key_set: bool,
    /// API 基础 URL
    pub base_url: String,
    /// 首选模型（空串表示未配置）
    pub model: String,
    /// 限流重试次数
    pub max_retries: u32,
    /// 退避起始间隔（毫秒）
    pub backoff_base_ms: u64,
}

impl From<AppConfig> for ConfigResponse {
    fn from(config: AppConfig) -> Self {
        Self {
            api_key_set: !config.api_key.is_empty(),
            base_url: config.base_url,
            model: config.model,
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
        }
    }
}

/// 配置更新请求
#[derive(Deserialize)]
pub struct ConfigUpdateRequest {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_retries: Option<u32>,
    pub backoff_base_ms: Option<u64>,
}

/// 配置更新响应
#[derive(Serialize)]
pub struct ConfigUpdateResponse {
    pub success: bool,
    pub message: String,
}

/// 获取当前配置
async fn get_config_handler() -> Json<ConfigResponse> {
    let config = get_config();
    Json(ConfigResponse::from(config))
}

/// 更新配置
async fn update_config_handler(
    Json(req): Json<ConfigUpdateRequest>,
) -> AppResult<Json<ConfigUpdateResponse>> {
    update_config(|config| {
        if let Some(api_key) = req.api_key {
            config.api_key = api_key;
        }
        if let Some(base_url) = req.base_url {
            config.base_url = base_url;
        }
        if let Some(model) = req.model {
            config.model = model;
        }
        if let Some(max_retries) = req.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(backoff_base_ms) = req.backoff_base_ms {
            config.backoff_base_ms = backoff_base_ms;
        }
    })?;

    Ok(Json(ConfigUpdateResponse {
        success: true,
        message: "Config updated successfully".to_string(),
    }))
}

/// 创建配置路由
pub fn config_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/config", get(get_config_handler))
        .route("/api/config", put(update_config_handler))
}
