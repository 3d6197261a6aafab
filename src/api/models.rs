//! 模型发现端点
//!
//! 帮助部署者确认当前凭据可用的模型，配合首选模型配置使用。

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::config::get_config;
use crate::error::{AppError, AppResult};
use crate::llm::{extract_model_names, retry_on_rate_limit, GeminiClient, RetryPolicy};
use crate::models::ModelListResponse;
use crate::state::AppState;

/// 列出当前凭据可用的模型
async fn list_models(State(state): State<Arc<AppState>>) -> AppResult<Json<ModelListResponse>> {
    let config = get_config();
    let api_key = config.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Config(
            "API key is not configured. Set GEMINI_API_KEY or edit config.json.".to_string(),
        ));
    }

    let client = GeminiClient::new(state.http.clone(), api_key, &config.base_url)
        .map_err(|e| AppError::Config(e.to_string()))?;

    // 与生成共用同一套限流退避
    let policy = RetryPolicy::new(config.max_retries, config.backoff_base_ms);
    let reply = retry_on_rate_limit(policy, || client.list_models())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !reply.is_success() {
        return Err(AppError::Upstream {
            status: reply.status,
            model: None,
            detail: reply.body,
        });
    }

    Ok(Json(ModelListResponse {
        models: extract_model_names(&reply.body),
        note: "Set the preferred model via PUT /api/config or the GEMINI_MODEL environment variable.".to_string(),
    }))
}

/// 创建模型发现路由
pub fn models_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/models", get(list_models))
}
