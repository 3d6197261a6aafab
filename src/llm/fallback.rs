//! 候选模型顺序回退
//!
//! 按顺序尝试候选模型，第一个 2xx 立即返回；全部失败时保留
//! 最后一个失败及其候选名。候选之间严格串行，不做并行扇出。

use std::future::Future;
use tracing::{info, warn};

use super::types::{LlmError, UpstreamReply};

/// 单个候选的失败记录
#[derive(Debug)]
pub enum CandidateFailure {
    /// 上游返回非 2xx
    Upstream(UpstreamReply),
    /// 传输层错误
    Transport(LlmError),
}

/// 回退结果
#[derive(Debug)]
pub enum FallbackOutcome {
    /// 某个候选成功
    Success { model: String, reply: UpstreamReply },
    /// 所有候选失败
    AllFailed {
        model: String,
        failure: CandidateFailure,
    },
}

/// 依次尝试候选模型
///
/// generate 负责单个候选的完整调用（含限流重试），传输错误
/// 同样记为该候选失败并继续尝试下一个
pub async fn try_candidates<F, Fut>(candidates: &[String], mut generate: F) -> FallbackOutcome
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<UpstreamReply, LlmError>>,
{
    let mut last: Option<(String, CandidateFailure)> = None;

    for model in candidates {
        match generate(model.clone()).await {
            Ok(reply) if reply.is_success() => {
                info!("Generation succeeded: model={}", model);
                return FallbackOutcome::Success {
                    model: model.clone(),
                    reply,
                };
            }
            Ok(reply) => {
                warn!("Model {} failed: status={}", model, reply.status);
                last = Some((model.clone(), CandidateFailure::Upstream(reply)));
            }
            Err(e) => {
                warn!("Model {} transport error: {}", model, e);
                last = Some((model.clone(), CandidateFailure::Transport(e)));
            }
        }
    }

    match last {
        Some((model, failure)) => FallbackOutcome::AllFailed { model, failure },
        // 候选列表由 build_candidates 产生，正常不会为空
        None => FallbackOutcome::AllFailed {
            model: String::new(),
            failure: CandidateFailure::Transport(LlmError::ConfigError(
                "No candidate models configured".to_string(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn reply(status: u16) -> UpstreamReply {
        UpstreamReply {
            status,
            body: json!({ "status": status }),
        }
    }

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fallback_stops_at_first_success() {
        let attempted = RefCell::new(Vec::new());
        let candidates = models(&["model-a", "model-b", "model-c"]);

        let outcome = try_candidates(&candidates, |model| {
            attempted.borrow_mut().push(model.clone());
            let status = if model == "model-a" { 404 } else { 200 };
            std::future::ready(Ok(reply(status)))
        })
        .await;

        match outcome {
            FallbackOutcome::Success { model, reply } => {
                assert_eq!(model, "model-b");
                assert_eq!(reply.status, 200);
            }
            other => panic!("expected success, got {:?}", other),
        }
        // model-c 不应被尝试
        assert_eq!(*attempted.borrow(), vec!["model-a", "model-b"]);
    }

    #[tokio::test]
    async fn test_fallback_reports_last_failure() {
        let candidates = models(&["model-a", "model-b"]);

        let outcome = try_candidates(&candidates, |model| {
            let status = if model == "model-a" { 404 } else { 429 };
            std::future::ready(Ok(reply(status)))
        })
        .await;

        match outcome {
            FallbackOutcome::AllFailed { model, failure } => {
                assert_eq!(model, "model-b");
                match failure {
                    CandidateFailure::Upstream(r) => assert_eq!(r.status, 429),
                    other => panic!("expected upstream failure, got {:?}", other),
                }
            }
            other => panic!("expected all-failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fallback_continues_past_transport_errors() {
        let candidates = models(&["model-a", "model-b"]);

        let outcome = try_candidates(&candidates, |model| {
            if model == "model-a" {
                std::future::ready(Err(LlmError::ConfigError("connection refused".to_string())))
            } else {
                std::future::ready(Ok(reply(200)))
            }
        })
        .await;

        assert!(matches!(outcome, FallbackOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn test_fallback_empty_candidates() {
        let outcome = try_candidates(&[], |_| std::future::ready(Ok(reply(200)))).await;
        assert!(matches!(outcome, FallbackOutcome::AllFailed { .. }));
    }
}
