//! 限流重试
//!
//! 单个上游调用的有界重试：只有 429 触发重试，退避间隔每次翻倍，
//! 无抖动。重试耗尽时原样返回最后一次 429 响应，不转换为错误。

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::types::{LlmError, UpstreamReply};

/// 触发重试的唯一状态码
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// 重试策略
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 总尝试次数（首次调用 + 重试）
    pub max_attempts: u32,
    /// 退避起始间隔
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// 按重试次数和起始退避间隔创建策略
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_attempts: max_retries + 1,
            backoff_base: Duration::from_millis(backoff_base_ms),
        }
    }

    /// 第 attempt 次失败后的退避时长（attempt 从 0 计）
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 800)
    }
}

/// 对单个上游调用做限流重试
///
/// 传输层错误与非 429 状态码立即返回，不重试
pub async fn retry_on_rate_limit<F, Fut>(
    policy: RetryPolicy,
    mut call: F,
) -> Result<UpstreamReply, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<UpstreamReply, LlmError>>,
{
    let mut attempt = 0;
    loop {
        let reply = call().await?;
        if reply.status != STATUS_TOO_MANY_REQUESTS || attempt + 1 >= policy.max_attempts {
            return Ok(reply);
        }

        let backoff = policy.backoff_for_attempt(attempt);
        warn!(
            "Rate limited (attempt {}/{}), backing off {}ms",
            attempt + 1,
            policy.max_attempts,
            backoff.as_millis()
        );
        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn reply(status: u16) -> UpstreamReply {
        UpstreamReply {
            status,
            body: json!({}),
        }
    }

    /// 依次返回给定状态码序列的调用计数器
    fn scripted<'a>(
        statuses: &'a [u16],
        calls: &'a Cell<usize>,
    ) -> impl FnMut() -> std::future::Ready<Result<UpstreamReply, LlmError>> + 'a {
        move || {
            let n = calls.get();
            calls.set(n + 1);
            std::future::ready(Ok(reply(statuses[n])))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_rate_limits() {
        let calls = Cell::new(0);
        let start = tokio::time::Instant::now();

        let result = retry_on_rate_limit(RetryPolicy::default(), scripted(&[429, 429, 200], &calls))
            .await
            .unwrap();

        assert_eq!(result.status, 200);
        assert_eq!(calls.get(), 3);
        // 恰好两次退避：800ms + 1600ms
        assert_eq!(start.elapsed(), Duration::from_millis(2400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_returns_last_reply() {
        let calls = Cell::new(0);

        let result = retry_on_rate_limit(
            RetryPolicy::default(),
            scripted(&[429, 429, 429, 429], &calls),
        )
        .await
        .unwrap();

        // 耗尽后返回最后一次 429 响应本身，而不是错误
        assert_eq!(result.status, 429);
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_rate_limit_status_returns_immediately() {
        let calls = Cell::new(0);
        let start = tokio::time::Instant::now();

        let result = retry_on_rate_limit(RetryPolicy::default(), scripted(&[500], &calls))
            .await
            .unwrap();

        assert_eq!(result.status, 500);
        assert_eq!(calls.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_not_retried() {
        let calls = Cell::new(0);

        let result = retry_on_rate_limit(RetryPolicy::default(), || {
            calls.set(calls.get() + 1);
            std::future::ready(Err(LlmError::ConfigError("boom".to_string())))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_backoff_doubles_without_jitter() {
        let policy = RetryPolicy::new(3, 800);
        assert_eq!(policy.backoff_for_attempt(0), Duration::from_millis(800));
        assert_eq!(policy.backoff_for_attempt(1), Duration::from_millis(1600));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_millis(3200));
    }
}
