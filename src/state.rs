//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。共享内容只有一个带连接池的
//! HTTP 客户端，请求之间没有可变状态。

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// 应用共享状态
///
/// 使用 Arc 包裹以便在多个处理器之间安全共享
#[derive(Clone)]
pub struct AppState {
    /// 出站 HTTP 客户端（所有上游调用复用同一个连接池）
    pub http: Client,
}

impl AppState {
    /// 创建新的应用状态
    ///
    /// 显式设置超时，避免上游挂起时请求无限等待
    pub fn new() -> Self {
        // build 仅在 TLS 后端初始化失败时出错，属于启动期致命问题
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to build HTTP client");

        Self { http }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state() -> Arc<AppState> {
    Arc::new(AppState::new())
}
