use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type LlmGatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<LlmCompletion, LlmGatewayError>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMessageRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmMessageRole,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LlmMessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmMessageRole::User,
            content: content.into(),
        }
    }
}

/// One chat-completion call. The model is chosen by the gateway, not the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmCompletionRequest {
    pub messages: Vec<LlmMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl LlmCompletionRequest {
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.role == LlmMessageRole::User)
            .map(|message| message.content.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmTokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmCompletion {
    pub model: String,
    pub provider_request_id: Option<String>,
    pub content: String,
    pub usage: Option<LlmTokenUsage>,
}

/// Failures of the upstream call. `Display` is the message handed back to
/// clients verbatim, so provider failures carry no prefix.
#[derive(Debug, Error)]
pub enum LlmGatewayError {
    #[error("The OPENAI_API_KEY environment variable is missing or empty.")]
    MissingCredential,
    #[error("Request timed out.")]
    Timeout,
    #[error("Connection error.")]
    Connection,
    #[error("{0}")]
    ProviderFailure(String),
    #[error("invalid completion payload: {0}")]
    InvalidProviderPayload(String),
}

pub trait LlmGateway: Send + Sync {
    fn complete<'a>(&'a self, request: LlmCompletionRequest) -> LlmGatewayFuture<'a>;
}
