use std::path::PathBuf;

use thiserror::Error;

pub use crate::config_env::ensure_http_url;
use crate::config_env::{http_url_env, optional_trimmed_env, parse_optional_u64_env};
use crate::llm::OpenAiGatewayConfig;

pub const DEFAULT_API_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_GENERATE_URL: &str = "http://127.0.0.1:3000/api/generate";
pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub openai: OpenAiGatewayConfig,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub generate_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: optional_trimmed_env("API_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_API_BIND_ADDR.to_string()),
            openai: OpenAiGatewayConfig {
                chat_completions_url: http_url_env(
                    "OPENAI_CHAT_COMPLETIONS_URL",
                    DEFAULT_CHAT_COMPLETIONS_URL,
                )?,
                // A missing key only fails individual calls, not startup.
                api_key: optional_trimmed_env("OPENAI_API_KEY"),
                model: optional_trimmed_env("OPENAI_MODEL")
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout_ms: parse_optional_u64_env("OPENAI_TIMEOUT_MS")?,
            },
        })
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            generate_url: http_url_env("JUICI_API_URL", DEFAULT_GENERATE_URL)?,
        })
    }
}

/// Loads a `.env` file from the working directory or its parents, if one exists.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ensure_http_url};

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(ensure_http_url("URL", "http://127.0.0.1:3000/api/generate").is_ok());
        assert!(ensure_http_url("URL", "https://api.openai.com/v1/chat/completions").is_ok());
    }

    #[test]
    fn rejects_urls_without_host_or_with_invalid_characters() {
        for url in ["http://", "https://", "http://exa mple.com/v1", "localhost:3000"] {
            let err = ensure_http_url("OPENAI_CHAT_COMPLETIONS_URL", url)
                .expect_err("malformed url must be rejected");
            assert!(
                matches!(err, ConfigError::InvalidConfiguration(ref message) if message.contains("OPENAI_CHAT_COMPLETIONS_URL")),
                "expected invalid configuration for {url:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_urls_without_http_scheme() {
        let err = ensure_http_url("JUICI_API_URL", "ftp://example.com")
            .expect_err("non-http scheme must be rejected");

        assert!(
            matches!(err, ConfigError::InvalidConfiguration(ref message) if message.contains("JUICI_API_URL")),
            "expected invalid configuration naming the key, got {err:?}"
        );
    }
}
