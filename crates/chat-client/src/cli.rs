use shared::config::ensure_http_url;
use shared::llm::PromptMode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub endpoint: Option<String>,
    pub mode: Option<PromptMode>,
    pub color: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            endpoint: None,
            mode: None,
            color: true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("missing value for argument: {0}")]
    MissingValue(String),
    #[error("invalid --mode value: {0}")]
    InvalidMode(String),
    #[error("--endpoint must be an http(s) URL with a host: {0}")]
    InvalidEndpoint(String),
    #[error("help requested")]
    HelpRequested,
}

impl CliOptions {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(CliError::HelpRequested),
                "--endpoint" => {
                    let value = iter.next().ok_or(CliError::MissingValue(arg.clone()))?;
                    if ensure_http_url("--endpoint", &value).is_err() {
                        return Err(CliError::InvalidEndpoint(value));
                    }
                    options.endpoint = Some(value);
                }
                "--mode" => {
                    let value = iter.next().ok_or(CliError::MissingValue(arg.clone()))?;
                    options.mode =
                        parse_mode_name(&value).ok_or(CliError::InvalidMode(value.clone()))?;
                }
                "--no-color" => options.color = false,
                unknown => return Err(CliError::UnknownArgument(unknown.to_string())),
            }
        }

        Ok(options)
    }
}

/// Parses a user-facing mode name. `Some(None)` is the standard mode.
pub fn parse_mode_name(value: &str) -> Option<Option<PromptMode>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "standard" | "none" | "off" => Some(None),
        other => PromptMode::from_tag(other).map(Some),
    }
}
