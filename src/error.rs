//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。
//! 上游（生成式 API）的失败会原样透传其状态码。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误（缺少 API 密钥等）
    #[error("配置错误: {0}")]
    Config(String),

    /// 请求参数错误（Content-Type 不正确等）
    #[error("请求错误: {0}")]
    BadRequest(String),

    /// 上游 API 返回的失败，携带失败时使用的模型（若有）与原始错误负载
    #[error("上游错误 ({status})")]
    Upstream {
        status: u16,
        model: Option<String>,
        detail: Value,
    },

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    /// 上游状态码转换为 axum StatusCode，非法值按 502 处理
    fn upstream_status(status: u16) -> StatusCode {
        StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": msg }),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Upstream {
                status,
                model,
                detail,
            } => (
                Self::upstream_status(status),
                json!({
                    "error": "Upstream API request failed",
                    "model": model,
                    "detail": detail,
                }),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "detail": msg }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
