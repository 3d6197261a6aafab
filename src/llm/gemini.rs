//! Gemini API 调用
//!
//! generateContent 文本生成与模型列表两个端点。密钥通过请求头传递，
//! 不进入 URL，避免泄漏到访问日志或错误信息。

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::format::{build_generate_endpoint, build_models_endpoint};
use super::types::{LlmError, UpstreamReply};

/// API 密钥请求头
const API_KEY_HEADER: &str = "x-goog-api-key";

/// generateContent 请求载荷
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

impl GenerateRequest {
    /// 单条用户文本包装为 contents 结构
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

/// Gemini API 客户端
///
/// 持有共享的连接池，本身无状态，可按请求创建
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// 创建新的客户端
    pub fn new(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// 调用 generateContent
    ///
    /// 任何状态码都作为 UpstreamReply 返回，只有传输层失败才是 Err
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<UpstreamReply, LlmError> {
        let endpoint = build_generate_endpoint(&self.base_url, model);
        debug!("Gemini request: model={}, prompt_len={}", model, prompt.len());

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        Self::into_reply(response).await
    }

    /// 列出当前凭据可用的模型
    pub async fn list_models(&self) -> Result<UpstreamReply, LlmError> {
        let endpoint = build_models_endpoint(&self.base_url);
        debug!("Gemini model list request");

        let response = self
            .client
            .get(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Self::into_reply(response).await
    }

    /// 读取响应体并宽松解析
    async fn into_reply(response: reqwest::Response) -> Result<UpstreamReply, LlmError> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            let preview: String = text.chars().take(500).collect();
            error!("Gemini API error: status={}, body={}", status, preview);
        }

        Ok(UpstreamReply {
            status,
            body: parse_body(&text),
        })
    }
}

/// 宽松解析响应体
///
/// 上游偶尔返回非 JSON 的错误页，原文包装为 {"raw": ...} 保留给调用方
fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_valid_json() {
        let body = parse_body(r#"{"candidates": []}"#);
        assert!(body.get("candidates").is_some());
    }

    #[test]
    fn test_parse_body_wraps_invalid_json() {
        let body = parse_body("<html>502 Bad Gateway</html>");
        assert_eq!(
            body.get("raw").and_then(Value::as_str),
            Some("<html>502 Bad Gateway</html>")
        );
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = GeminiClient::new(Client::new(), "", "https://example.com");
        assert!(matches!(result, Err(LlmError::ConfigError(_))));
    }

    #[test]
    fn test_generate_request_shape() {
        let payload = serde_json::to_value(GenerateRequest::from_prompt("hello")).unwrap();
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "hello");
    }
}
