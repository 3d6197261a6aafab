//! 评语生成端点

use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::config::get_config;
use crate::error::{AppError, AppResult};
use crate::models::{CommentRequest, CommentResponse};
use crate::services::CommentService;
use crate::state::AppState;

/// 生成评语
///
/// Content-Type 必须是 application/json。请求体宽松解析：
/// 无法解析时按空对象处理，由净化器填充默认值，不在此处报错。
async fn generate_comment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<CommentResponse>> {
    require_json_content_type(&headers)?;

    let value: Value = serde_json::from_str(&body).unwrap_or_else(|e| {
        warn!("Request body is not valid JSON, falling back to defaults: {}", e);
        Value::Object(Default::default())
    });
    let request = CommentRequest::sanitize(&value);

    let service = CommentService::new(state.http.clone(), &get_config())?;
    let response = service.generate_comment(&request).await?;
    Ok(Json(response))
}

/// 校验 Content-Type（允许携带 charset 等参数）
fn require_json_content_type(headers: &HeaderMap) -> AppResult<()> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.to_ascii_lowercase().contains("application/json") {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Content-Type must be application/json".to_string(),
        ))
    }
}

/// 创建评语路由
pub fn comment_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/comment", post(generate_comment))
}
