//! 评语生成服务
//!
//! 串联生成链路：配置检查 → Prompt 构建 → 候选回退（每个候选
//! 内部带限流重试）→ 文本提取 → 数字剥离，并记录请求日志。

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::json;
use std::time::Instant;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::llm::{
    build_candidates, extract_text, retry_on_rate_limit, try_candidates, CandidateFailure,
    FallbackOutcome, GeminiClient, LlmError, RetryPolicy, UpstreamReply,
};
use crate::models::{CommentRequest, CommentResponse};
use crate::utils::RequestLogger;

use super::PromptService;

/// 数字剥离正则，独立于模型是否遵守指令的兜底
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new("[0-9]").expect("valid digit pattern"));

/// 全部候选失败时附带的提示
const MODELS_HINT: &str = "Call GET /api/models to list the models available to your API key.";

/// 评语生成服务
pub struct CommentService {
    client: GeminiClient,
    candidates: Vec<String>,
    retry: RetryPolicy,
    masked_key: String,
    logger: RequestLogger,
}

impl CommentService {
    /// 从配置创建服务
    ///
    /// 缺少密钥是致命前置条件：这里直接失败，不会发出任何网络调用
    pub fn new(http: Client, config: &AppConfig) -> Result<Self, AppError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::Config(
                "API key is not configured. Set GEMINI_API_KEY or edit config.json.".to_string(),
            ));
        }

        let client = GeminiClient::new(http, api_key, &config.base_url)
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            client,
            candidates: build_candidates(config.preferred_model()),
            retry: RetryPolicy::new(config.max_retries, config.backoff_base_ms),
            masked_key: RequestLogger::mask_api_key(api_key),
            logger: RequestLogger::default(),
        })
    }

    /// 生成评语
    pub async fn generate_comment(
        &self,
        request: &CommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let prompt = PromptService::new().build_comment_prompt(request);
        let request_id = RequestLogger::generate_request_id();
        let entry = RequestLogger::begin_entry(
            &request_id,
            &self.masked_key,
            &self.candidates,
            prompt.len(),
        );
        let start = Instant::now();

        info!(
            "Comment generation start: request_id={}, candidates={}",
            request_id,
            self.candidates.len()
        );

        let outcome =
            try_candidates(&self.candidates, |model| self.generate_once(model, &prompt)).await;

        match resolve_outcome(outcome) {
            Ok(response) => {
                self.logger
                    .log_success(entry, start, &response.model, response.comment.len());
                info!(
                    "Comment generation done: request_id={}, model={}",
                    request_id, response.model
                );
                Ok(response)
            }
            Err(err) => {
                let status_code = match &err {
                    AppError::Upstream { status, .. } => Some(*status),
                    _ => None,
                };
                self.logger
                    .log_error(entry, start, &err.to_string(), status_code);
                Err(err)
            }
        }
    }

    /// 单个候选的完整调用，内部做限流重试
    async fn generate_once(&self, model: String, prompt: &str) -> Result<UpstreamReply, LlmError> {
        retry_on_rate_limit(self.retry, || self.client.generate(&model, prompt)).await
    }
}

/// 处理回退结果
///
/// 成功时提取文本并剥离数字；提取不到文本返回空评语而不是报错。
/// 失败时转换为携带上游状态码的应用错误。
fn resolve_outcome(outcome: FallbackOutcome) -> Result<CommentResponse, AppError> {
    match outcome {
        FallbackOutcome::Success { model, reply } => {
            let comment = strip_digits(&extract_text(&reply.body));
            Ok(CommentResponse { comment, model })
        }
        FallbackOutcome::AllFailed { model, failure } => Err(match failure {
            CandidateFailure::Upstream(reply) => AppError::Upstream {
                status: reply.status,
                model: Some(model),
                detail: json!({ "provider": reply.body, "hint": MODELS_HINT }),
            },
            CandidateFailure::Transport(e) => AppError::Internal(e.to_string()),
        }),
    }
}

/// 剥离所有数字字符并修剪首尾空白
fn strip_digits(text: &str) -> String {
    DIGIT_RE.replace_all(text, "").trim().to_string()
}
