use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shared::models::{ChatMessage, ChatRole};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to write transcript to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Plain-text transcript: one `You:` / `Juici:` paragraph per message.
pub fn format_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let speaker = match message.role {
                ChatRole::User => "You",
                ChatRole::Assistant => "Juici",
            };
            format!("{speaker}: {}", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn transcript_file_name(date: NaiveDate) -> String {
    format!("juici-chat-{}.txt", date.format("%Y-%m-%d"))
}

pub fn write_transcript(
    dir: &Path,
    messages: &[ChatMessage],
    date: NaiveDate,
) -> Result<PathBuf, TranscriptError> {
    let path = dir.join(transcript_file_name(date));
    std::fs::write(&path, format_transcript(messages)).map_err(|source| {
        TranscriptError::Write {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}
