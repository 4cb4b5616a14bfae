use std::env;

use url::Url;

use crate::config::ConfigError;

pub(crate) fn parse_optional_u64_env(key: &str) -> Result<Option<u64>, ConfigError> {
    match optional_trimmed_env(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::ParseInt(key.to_string())),
        None => Ok(None),
    }
}

pub(crate) fn optional_trimmed_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub(crate) fn http_url_env(key: &str, default: &str) -> Result<String, ConfigError> {
    let url = optional_trimmed_env(key).unwrap_or_else(|| default.to_string());
    ensure_http_url(key, &url)?;
    Ok(url)
}

/// Parses `url` and requires an http(s) scheme with a host.
pub fn ensure_http_url(key: &str, url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url).map_err(|err| {
        ConfigError::InvalidConfiguration(format!("{key} is not a valid URL: {err}"))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidConfiguration(format!(
            "{key} must use http or https"
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidConfiguration(format!(
            "{key} must include a host"
        )));
    }

    Ok(())
}
