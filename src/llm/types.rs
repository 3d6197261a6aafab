//! LLM 类型定义

use serde_json::Value;

/// 内置候选模型，按优先级排列
///
/// 首选模型（若配置）排在这些之前
pub const FALLBACK_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-flash",
];

/// 上游 HTTP 响应
///
/// 状态码加上宽松解析的 JSON 负载，无法解析的原文包装为 {"raw": ...}
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// HTTP 状态码
    pub status: u16,
    /// 解析后的响应体
    pub body: Value,
}

impl UpstreamReply {
    /// 是否为 2xx 成功响应
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// LLM 错误类型
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// HTTP 请求错误
    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 构建候选模型列表
///
/// 首选模型（若有）排在最前，内置候选去重后接续，保持顺序
pub fn build_candidates(preferred: Option<&str>) -> Vec<String> {
    let mut candidates = Vec::with_capacity(FALLBACK_MODELS.len() + 1);
    if let Some(model) = preferred {
        candidates.push(model.to_string());
    }
    for model in FALLBACK_MODELS {
        if !candidates.iter().any(|c| c == model) {
            candidates.push((*model).to_string());
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_is_success() {
        let ok = UpstreamReply { status: 200, body: json!({}) };
        let rate_limited = UpstreamReply { status: 429, body: json!({}) };
        assert!(ok.is_success());
        assert!(!rate_limited.is_success());
    }

    #[test]
    fn test_build_candidates_without_preference() {
        let candidates = build_candidates(None);
        assert_eq!(candidates.len(), FALLBACK_MODELS.len());
        assert_eq!(candidates[0], "gemini-2.0-flash");
    }

    #[test]
    fn test_build_candidates_prepends_preferred() {
        let candidates = build_candidates(Some("gemini-1.5-pro"));
        assert_eq!(candidates[0], "gemini-1.5-pro");
        assert_eq!(candidates.len(), FALLBACK_MODELS.len() + 1);
    }

    #[test]
    fn test_build_candidates_dedupes_preferred() {
        let candidates = build_candidates(Some("gemini-2.0-flash-lite"));
        assert_eq!(candidates[0], "gemini-2.0-flash-lite");
        // 首选与内置候选重复时不再重复出现
        assert_eq!(candidates.len(), FALLBACK_MODELS.len());
        assert_eq!(
            candidates.iter().filter(|c| *c == "gemini-2.0-flash-lite").count(),
            1
        );
    }
}
