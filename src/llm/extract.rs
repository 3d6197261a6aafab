//! 响应文本提取
//!
//! 上游响应的形状随 API 版本而不同，这里按已知形状依次尝试，
//! 取第一个非空结果。全部不匹配时返回空串，由调用方决定后续。

use serde_json::Value;

/// 从上游响应中提取生成文本
pub fn extract_text(body: &Value) -> String {
    for extractor in [candidates_tree, output_text, output_tree] {
        let text = extractor(body);
        if !text.is_empty() {
            return text;
        }
    }
    String::new()
}

/// candidates[].content.parts[].text 树（generateContent 标准形状）
///
/// 所有片段按原始顺序拼接
fn candidates_tree(body: &Value) -> String {
    let mut out = String::new();
    if let Some(candidates) = body.get("candidates").and_then(Value::as_array) {
        for candidate in candidates {
            if let Some(parts) = candidate.pointer("/content/parts").and_then(Value::as_array) {
                for part in parts {
                    if let Some(text) = part.get("text").and_then(Value::as_str) {
                        out.push_str(text);
                    }
                }
            }
        }
    }
    out
}

/// 顶层 output_text：字符串或字符串数组
fn output_text(body: &Value) -> String {
    match body.get("output_text") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

/// output[].content[].text 树
fn output_tree(body: &Value) -> String {
    let mut out = String::new();
    if let Some(output) = body.get("output").and_then(Value::as_array) {
        for item in output {
            if let Some(content) = item.get("content").and_then(Value::as_array) {
                for block in content {
                    if let Some(text) = block.get("text").and_then(Value::as_str) {
                        out.push_str(text);
                    }
                }
            }
        }
    }
    out
}

/// 从模型列表响应中提取模型名称（保持上游原文）
pub fn extract_model_names(body: &Value) -> Vec<String> {
    match body.get("models").and_then(Value::as_array) {
        Some(models) => models
            .iter()
            .filter_map(|m| m.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}
