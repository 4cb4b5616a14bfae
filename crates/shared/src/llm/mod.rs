pub mod gateway;
pub mod observability;
pub mod openai;
pub mod prompts;

pub use gateway::{
    LlmCompletion, LlmCompletionRequest, LlmGateway, LlmGatewayError, LlmGatewayFuture,
    LlmMessage, LlmMessageRole, LlmTokenUsage,
};
pub use observability::{LlmTelemetryEvent, complete_with_telemetry};
pub use openai::{OpenAiGateway, OpenAiGatewayConfig};
pub use prompts::{
    COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE, PromptMode, SYSTEM_PROMPT, build_user_content,
    completion_request_for_prompt,
};
