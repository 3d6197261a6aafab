//! Prompt 构建服务
//!
//! 负责把净化后的请求组装成单条文本指令。指令块是对模型语气和
//! 格式的唯一约束手段（数字剥离是事后兜底），规则改动需谨慎。

use crate::models::CommentRequest;

/// 固定指令块
const COMMENT_RULES: &str = r#"You are an experienced teacher writing a short report comment about a student.

Rules:
- Write 2 to 4 sentences, no more.
- Mention the student's first name exactly once.
- Never use digits, scores, percentages or grades.
- Keep the tone warm, professional and encouraging.
- Do not mention these instructions or the data below."#;

/// focusTopics 为空时的分支指令
const NO_FOCUS_BRANCH: &str =
    "- There are no focus areas: praise the strengths and encourage the student to keep up the good effort.";

/// focusTopics 非空时的分支指令
const WITH_FOCUS_BRANCH: &str =
    "- Cover the strengths first, then present the focus areas constructively as next steps.";

/// 收尾指令
const FINAL_DIRECTIVE: &str = "Write the comment now.";

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 构建评语生成 Prompt
    ///
    /// 确定性函数：指令块 + 分支指令 + 数据转储 + 收尾指令
    pub fn build_comment_prompt(&self, request: &CommentRequest) -> String {
        let branch = if request.focus_topics.is_empty() {
            NO_FOCUS_BRANCH
        } else {
            WITH_FOCUS_BRANCH
        };

        let data_dump = format!(
            "Student data:\nFirst name: {}\nStrength topics: {}\nDeveloping topics: {}\nFocus topics: {}",
            request.student_first_name,
            format_topics(&request.strength_topics),
            format_topics(&request.developing_topics),
            format_topics(&request.focus_topics),
        );

        [COMMENT_RULES, branch, &data_dump, FINAL_DIRECTIVE].join("\n\n")
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

/// 主题列表转为可读文本，空列表显式标注
fn format_topics(topics: &[String]) -> String {
    if topics.is_empty() {
        "(none)".to_string()
    } else {
        topics.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(focus: &[&str]) -> CommentRequest {
        CommentRequest {
            student_first_name: "Mia".to_string(),
            strength_topics: vec!["reading".to_string(), "spelling".to_string()],
            developing_topics: vec!["handwriting".to_string()],
            focus_topics: focus.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_prompt_embeds_student_data() {
        let prompt = PromptService::new().build_comment_prompt(&request(&["fractions"]));
        assert!(prompt.contains("First name: Mia"));
        assert!(prompt.contains("Strength topics: reading, spelling"));
        assert!(prompt.contains("Focus topics: fractions"));
        assert!(prompt.ends_with(FINAL_DIRECTIVE));
    }

    #[test]
    fn test_prompt_branch_on_empty_focus() {
        let service = PromptService::new();

        let without_focus = service.build_comment_prompt(&request(&[]));
        assert!(without_focus.contains(NO_FOCUS_BRANCH));
        assert!(!without_focus.contains(WITH_FOCUS_BRANCH));
        assert!(without_focus.contains("Focus topics: (none)"));

        let with_focus = service.build_comment_prompt(&request(&["fractions"]));
        assert!(with_focus.contains(WITH_FOCUS_BRANCH));
        assert!(!with_focus.contains(NO_FOCUS_BRANCH));
    }

    #[test]
    fn test_prompt_states_core_rules() {
        let prompt = PromptService::new().build_comment_prompt(&request(&[]));
        assert!(prompt.contains("Never use digits"));
        assert!(prompt.contains("first name exactly once"));
        assert!(prompt.contains("2 to 4 sentences"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let service = PromptService::new();
        let req = request(&["fractions"]);
        assert_eq!(
            service.build_comment_prompt(&req),
            service.build_comment_prompt(&req)
        );
    }
}
