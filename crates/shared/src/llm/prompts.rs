use serde::{Deserialize, Serialize};

use super::gateway::{LlmCompletionRequest, LlmMessage};

pub const SYSTEM_PROMPT: &str = "You are juici, a high-performance general assistant built for real-world tasks. You can summarize, create, research, and plan with precision. You're fast, direct, and helpful — but always professional. Your goal is to make things happen, not just answer questions. You're built by juici.ai and deployed for general business use.";

pub const COMPLETION_TEMPERATURE: f64 = 0.7;
pub const COMPLETION_MAX_TOKENS: u32 = 2000;

/// Prompt transformation selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    Summarize,
    Expand,
    Rewrite,
    Task,
}

impl PromptMode {
    pub const ALL: [Self; 4] = [Self::Summarize, Self::Expand, Self::Rewrite, Self::Task];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Expand => "expand",
            Self::Rewrite => "rewrite",
            Self::Task => "task",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Summarize => "Summarize",
            Self::Expand => "Expand",
            Self::Rewrite => "Rewrite",
            Self::Task => "Task",
        }
    }

    /// Exact, case-sensitive tag lookup. Anything else means "no mode".
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == tag)
    }

    const fn template_prefix(self) -> &'static str {
        match self {
            Self::Summarize => {
                "Please summarize the following concisely while preserving key information: "
            }
            Self::Expand => "Please expand on the following with more detail and depth: ",
            Self::Rewrite => "Please rewrite the following in a clear, professional style: ",
            Self::Task => "Please create a structured plan or outline for the following task: ",
        }
    }

    pub fn apply(self, prompt: &str) -> String {
        format!("{}{prompt}", self.template_prefix())
    }
}

pub fn build_user_content(prompt: &str, mode: Option<PromptMode>) -> String {
    match mode {
        Some(mode) => mode.apply(prompt),
        None => prompt.to_string(),
    }
}

pub fn completion_request_for_prompt(
    prompt: &str,
    mode: Option<PromptMode>,
) -> LlmCompletionRequest {
    LlmCompletionRequest {
        messages: vec![
            LlmMessage::system(SYSTEM_PROMPT),
            LlmMessage::user(build_user_content(prompt, mode)),
        ],
        temperature: COMPLETION_TEMPERATURE,
        max_tokens: COMPLETION_MAX_TOKENS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmMessageRole;

    #[test]
    fn prompt_without_mode_is_passed_through_unchanged() {
        for prompt in ["hello", "  padded  ", "multi\nline", "Please summarize: x"] {
            assert_eq!(build_user_content(prompt, None), prompt);
        }
    }

    #[test]
    fn unknown_tags_do_not_resolve_to_a_mode() {
        for tag in ["", "Summarize", "SUMMARIZE", "translate", " task", "null"] {
            assert_eq!(PromptMode::from_tag(tag), None, "tag {tag:?}");
        }
    }

    #[test]
    fn known_tags_round_trip_through_lookup() {
        for mode in PromptMode::ALL {
            assert_eq!(PromptMode::from_tag(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn summarize_wraps_prompt_in_fixed_template() {
        let content = build_user_content("X", Some(PromptMode::Summarize));
        assert!(content.starts_with(
            "Please summarize the following concisely while preserving key information: X"
        ));
    }

    #[test]
    fn every_mode_substitutes_prompt_verbatim() {
        let prompt = "ship the *release* {today}";
        let expected = [
            (
                PromptMode::Summarize,
                "Please summarize the following concisely while preserving key information: ship the *release* {today}",
            ),
            (
                PromptMode::Expand,
                "Please expand on the following with more detail and depth: ship the *release* {today}",
            ),
            (
                PromptMode::Rewrite,
                "Please rewrite the following in a clear, professional style: ship the *release* {today}",
            ),
            (
                PromptMode::Task,
                "Please create a structured plan or outline for the following task: ship the *release* {today}",
            ),
        ];

        for (mode, content) in expected {
            assert_eq!(build_user_content(prompt, Some(mode)), content);
        }
    }

    #[test]
    fn completion_request_carries_system_then_user_message() {
        let request = completion_request_for_prompt("plan a launch", Some(PromptMode::Task));

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, LlmMessageRole::System);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, LlmMessageRole::User);
        assert_eq!(
            request.user_content(),
            Some("Please create a structured plan or outline for the following task: plan a launch")
        );
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 2000);
    }
}
