use shared::llm::PromptMode;
use shared::models::{ChatMessage, ChatRole, GenerateRequest, GenerateResponse};
use tracing::warn;

use crate::api::{GenerateApi, GenerateApiError};

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm juici gen, your high-performance assistant. How can I help you today?";
pub const FALLBACK_ERROR_TEXT: &str = "Something went wrong";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Sorry, there was an error processing your request.";
pub const HISTORY_ENTRIES: [&str; 2] = ["Current Chat", "New Chat"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub mode: Option<PromptMode>,
    pub show_history: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            mode: None,
            show_history: true,
        }
    }
}

/// In-memory state of one chat: the append-only message log, the input line,
/// and the display toggles. Nothing outlives the session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    input: String,
    loading: bool,
    settings: ChatSettings,
    settings_open: bool,
    expanded_view: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
            input: String::new(),
            loading: false,
            settings: ChatSettings::default(),
            settings_open: false,
            expanded_view: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mirrors the disabled state of the send control.
    pub fn can_send(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn set_mode(&mut self, mode: Option<PromptMode>) {
        self.settings.mode = mode;
    }

    pub fn toggle_history(&mut self) -> bool {
        self.settings.show_history = !self.settings.show_history;
        self.settings.show_history
    }

    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.settings_open = !self.settings_open;
        self.settings_open
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    pub fn is_expanded_view(&self) -> bool {
        self.expanded_view
    }

    pub fn toggle_expanded_view(&mut self) -> bool {
        self.expanded_view = !self.expanded_view;
        self.expanded_view
    }

    /// Content of the expanded pane: the latest message, only while the pane
    /// is open and only if the assistant wrote it.
    pub fn expanded_content(&self) -> Option<&str> {
        if !self.expanded_view {
            return None;
        }

        self.messages
            .last()
            .filter(|message| message.role == ChatRole::Assistant)
            .map(|message| message.content.as_str())
    }

    /// Entries of the conversations pane, or `None` while the pane is hidden.
    /// The message log itself is never filtered.
    pub fn history_entries(&self) -> Option<&'static [&'static str]> {
        self.settings
            .show_history
            .then_some(HISTORY_ENTRIES.as_slice())
    }

    /// Appends the user message, clears the input and marks the session as
    /// loading. Returns the request to send, or `None` when sending is
    /// disabled.
    pub fn begin_send(&mut self) -> Option<GenerateRequest> {
        if !self.can_send() {
            return None;
        }

        let input = std::mem::take(&mut self.input);
        let prompt = input.trim().to_string();
        self.messages.push(ChatMessage::user(input));
        self.loading = true;

        Some(GenerateRequest {
            prompt,
            mode: self.settings.mode,
        })
    }

    /// Appends exactly one assistant message for the outcome and clears the
    /// loading flag. The user message is never rolled back.
    pub fn complete_send(
        &mut self,
        outcome: Result<GenerateResponse, GenerateApiError>,
    ) -> &ChatMessage {
        let content = match outcome {
            Ok(response) if response.success => response.data.unwrap_or_default(),
            Ok(response) => format!(
                "Error: {}",
                response
                    .error
                    .filter(|error| !error.is_empty())
                    .as_deref()
                    .unwrap_or(FALLBACK_ERROR_TEXT)
            ),
            Err(err) => {
                warn!("generation round-trip failed: {err}");
                TRANSPORT_ERROR_MESSAGE.to_string()
            }
        };

        self.loading = false;
        self.messages.push(ChatMessage::assistant(content));
        &self.messages[self.messages.len() - 1]
    }

    pub async fn send(&mut self, api: &dyn GenerateApi) -> Option<&ChatMessage> {
        let request = self.begin_send()?;
        let outcome = api.generate(request).await;
        Some(self.complete_send(outcome))
    }
}
