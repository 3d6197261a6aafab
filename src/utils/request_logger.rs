//! 生成请求日志记录器
//!
//! 记录每次评语生成请求到 JSONL 文件，便于调试和分析。
//! 日志只保留脱敏后的密钥，不记录学生数据本身。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use uuid::Uuid;

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 请求 ID
    pub request_id: String,
    /// 时间戳
    pub timestamp: DateTime<Utc>,
    /// API 密钥（脱敏）
    pub api_key_masked: String,
    /// 本次请求的候选模型列表
    pub candidates: Vec<String>,
    /// Prompt 长度
    pub prompt_length: usize,
    /// 状态
    pub status: String,
    /// 实际成功的模型
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    /// 持续时间（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// 生成评语长度
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_length: Option<usize>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// 上游 HTTP 状态码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// 请求日志记录器
pub struct RequestLogger {
    log_path: PathBuf,
    max_entries: usize,
    file: Mutex<Option<File>>,
}

impl RequestLogger {
    /// 创建新的日志记录器
    pub fn new(log_dir: Option<PathBuf>) -> Self {
        let log_dir = log_dir.unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("storage")
        });

        // 确保目录存在
        let _ = fs::create_dir_all(&log_dir);

        let log_path = log_dir.join("comment_requests.jsonl");

        Self {
            log_path,
            max_entries: 1000,
            file: Mutex::new(None),
        }
    }

    /// 生成请求 ID
    pub fn generate_request_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }

    /// API 密钥脱敏
    pub fn mask_api_key(api_key: &str) -> String {
        if api_key.len() <= 8 {
            "*".repeat(api_key.len())
        } else {
            format!("{}...{}", &api_key[..4], &api_key[api_key.len() - 4..])
        }
    }

    /// 创建初始日志条目
    pub fn begin_entry(
        request_id: &str,
        api_key_masked: &str,
        candidates: &[String],
        prompt_length: usize,
    ) -> LogEntry {
        LogEntry {
            request_id: request_id.to_string(),
            timestamp: Utc::now(),
            api_key_masked: api_key_masked.to_string(),
            candidates: candidates.to_vec(),
            prompt_length,
            status: "pending".to_string(),
            model_used: None,
            duration_ms: None,
            comment_length: None,
            error_message: None,
            status_code: None,
        }
    }

    /// 记录成功
    pub fn log_success(
        &self,
        mut entry: LogEntry,
        start_time: std::time::Instant,
        model_used: &str,
        comment_length: usize,
    ) {
        entry.status = "success".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.model_used = Some(model_used.to_string());
        entry.comment_length = Some(comment_length);
        self.write_entry(&entry);
    }

    /// 记录错误
    pub fn log_error(
        &self,
        mut entry: LogEntry,
        start_time: std::time::Instant,
        error_message: &str,
        status_code: Option<u16>,
    ) {
        entry.status = "error".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.error_message = Some(Self::truncate(error_message, 500));
        entry.status_code = status_code;
        self.write_entry(&entry);
    }

    /// 截断字符串
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            format!("{}...", s.chars().take(max_len).collect::<String>())
        }
    }

    /// 写入日志条目
    fn write_entry(&self, entry: &LogEntry) {
        let mut file_guard = self.file.lock();

        // 懒加载文件
        if file_guard.is_none() {
            if let Ok(f) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
            {
                *file_guard = Some(f);
            }
        }

        if let Some(file) = file_guard.as_mut() {
            if let Ok(json) = serde_json::to_string(entry) {
                let _ = writeln!(file, "{}", json);
                let _ = file.flush();
            }
        }

        drop(file_guard);
        self.cleanup_if_needed();
    }

    /// 清理旧日志
    fn cleanup_if_needed(&self) {
        if let Ok(file) = File::open(&self.log_path) {
            let reader = BufReader::new(file);
            let lines: Vec<String> = reader.lines().filter_map(|l| l.ok()).collect();

            if lines.len() > self.max_entries {
                let keep_lines = &lines[lines.len() - self.max_entries..];
                if let Ok(mut file) = File::create(&self.log_path) {
                    for line in keep_lines {
                        let _ = writeln!(file, "{}", line);
                    }
                }
            }
        }
    }
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(RequestLogger::mask_api_key("short"), "*****");
        assert_eq!(
            RequestLogger::mask_api_key("AIzaSyA1234567890abcd"),
            "AIza...abcd"
        );
    }

    #[test]
    fn test_begin_entry_is_pending() {
        let entry = RequestLogger::begin_entry("req-1", "AIza...abcd", &["m".to_string()], 42);
        assert_eq!(entry.status, "pending");
        assert_eq!(entry.prompt_length, 42);
        assert!(entry.model_used.is_none());
    }
}
