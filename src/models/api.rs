//! REST API 请求/响应模型
//!
//! 入站请求不直接反序列化为结构体，而是经过 sanitize 净化：
//! 任意形状的 JSON 都会被整理为规范的 CommentRequest，不会失败。

use serde::Serialize;
use serde_json::Value;

/// 每个主题列表保留的最大条目数
const MAX_TOPICS: usize = 10;

/// 姓名字段为空时的默认称呼
const DEFAULT_FIRST_NAME: &str = "Student";

/// 评语生成请求（净化后的规范形式）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRequest {
    /// 学生名字
    pub student_first_name: String,
    /// 表现突出的主题
    pub strength_topics: Vec<String>,
    /// 进步中的主题
    pub developing_topics: Vec<String>,
    /// 需要重点关注的主题
    pub focus_topics: Vec<String>,
}

impl CommentRequest {
    /// 从任意解析后的 JSON 值构造请求
    ///
    /// 全函数：字符串字段强制转换并裁剪，空名字回退为 "Student"；
    /// 非数组的主题字段得到空列表，数组逐项转字符串、去空白、
    /// 丢弃空串后截断为前 10 条（保持原始顺序）。
    pub fn sanitize(value: &Value) -> Self {
        let mut name = coerce_string(value.get("studentFirstName").unwrap_or(&Value::Null));
        if name.is_empty() {
            name = DEFAULT_FIRST_NAME.to_string();
        }

        Self {
            student_first_name: name,
            strength_topics: sanitize_topics(value.get("strengthTopics")),
            developing_topics: sanitize_topics(value.get("developingTopics")),
            focus_topics: sanitize_topics(value.get("focusTopics")),
        }
    }
}

/// JSON 值强制转换为裁剪后的字符串
///
/// 字符串、数字、布尔取其显示形式，其余类型视为空
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// 净化主题列表
fn sanitize_topics(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(coerce_string)
            .filter(|s| !s.is_empty())
            .take(MAX_TOPICS)
            .collect(),
        _ => Vec::new(),
    }
}

/// 评语生成响应
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    /// 生成的评语
    pub comment: String,
    /// 实际使用的模型
    pub model: String,
}

/// 模型列表响应
#[derive(Debug, Serialize)]
pub struct ModelListResponse {
    /// 当前凭据可用的模型名称
    pub models: Vec<String>,
    /// 配置提示
    pub note: String,
}
