//! 应用配置管理
//!
//! 提供配置的加载、保存、更新功能，使用全局单例模式管理配置状态。
//! API 密钥和首选模型可以通过环境变量覆盖文件配置。

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::AppError;

/// 获取配置文件路径
fn get_config_path() -> PathBuf {
    // 配置文件位于可执行文件同级目录
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 生成式 API 密钥
    #[serde(default)]
    pub api_key: String,

    /// 生成式 API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 首选模型名称（为空表示无偏好，直接使用内置候选列表）
    #[serde(default)]
    pub model: String,

    /// 限流重试次数（首次调用之外的额外尝试）
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// 退避起始间隔（毫秒），每次重试翻倍
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    800
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: String::new(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl AppConfig {
    /// 首选模型，空字符串视为未配置
    pub fn preferred_model(&self) -> Option<&str> {
        let model = self.model.trim();
        if model.is_empty() {
            None
        } else {
            Some(model)
        }
    }
}

/// 全局配置单例
static CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    let mut config = load_config_from_file().unwrap_or_default();
    apply_env_overrides(&mut config);
    RwLock::new(config)
});

/// 从文件加载配置
fn load_config_from_file() -> Option<AppConfig> {
    let path = get_config_path();
    if path.exists() {
        let content = fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    } else {
        None
    }
}

/// 应用环境变量覆盖（部署时通过 secret 注入）
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            config.api_key = key.trim().to_string();
        }
    }
    if let Ok(model) = std::env::var("GEMINI_MODEL") {
        if !model.trim().is_empty() {
            config.model = model.trim().to_string();
        }
    }
}

/// 保存配置到文件
fn save_config_to_file(config: &AppConfig) -> Result<(), AppError> {
    let path = get_config_path();
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("序列化配置失败: {}", e)))?;
    fs::write(&path, content)
        .map_err(|e| AppError::Config(format!("写入配置文件失败: {}", e)))?;
    Ok(())
}

/// 获取当前配置（克隆）
pub fn get_config() -> AppConfig {
    CONFIG.read().clone()
}

/// 更新配置
///
/// 接收一个闭包来修改配置，修改后自动保存到文件
pub fn update_config<F>(updater: F) -> Result<AppConfig, AppError>
where
    F: FnOnce(&mut AppConfig),
{
    let mut config = CONFIG.write();
    updater(&mut config);
    save_config_to_file(&config)?;
    Ok(config.clone())
}
