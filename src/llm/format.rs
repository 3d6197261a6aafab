//! URL 构建工具

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();

    // 修复双斜杠（跳过协议部分）
    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 generateContent 端点
pub fn build_generate_endpoint(base_url: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", api_root(base_url), model)
}

/// 构建模型列表端点
pub fn build_models_endpoint(base_url: &str) -> String {
    format!("{}/models", api_root(base_url))
}

/// API 根路径，base_url 可以带或不带版本段
fn api_root(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/v1beta") {
        url
    } else {
        format!("{}/v1beta", url)
    }
}
