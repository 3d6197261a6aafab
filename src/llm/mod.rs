//! LLM 模块
//!
//! 提供 Gemini API 客户端，以及候选模型回退、限流重试和
//! 响应形状容错提取。

mod extract;
mod fallback;
mod format;
mod gemini;
mod retry;
mod types;

pub use extract::{extract_model_names, extract_text};
pub use fallback::{try_candidates, CandidateFailure, FallbackOutcome};
pub use gemini::GeminiClient;
pub use retry::{retry_on_rate_limit, RetryPolicy};
pub use types::*;
