use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use shared::llm::PromptMode;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::GenerateApi;
use crate::cli::parse_mode_name;
use crate::render::MarkdownRenderer;
use crate::session::ChatSession;
use crate::transcript::write_transcript;

pub const HELP_TEXT: &str = "Commands:\n\
  /mode <standard|summarize|expand|rewrite|task>  choose how prompts are wrapped\n\
  /settings                                        open or close the settings panel\n\
  /history                                         show or hide the conversations pane\n\
  /expand                                          toggle the response details pane\n\
  /show                                            print the visible conversation\n\
  /download [dir]                                  save the conversation as text\n\
  /help                                            show this help\n\
  /quit                                            leave the chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Send(String),
    Mode(Option<PromptMode>),
    InvalidMode(String),
    Settings,
    History,
    Expand,
    Show,
    Download(Option<PathBuf>),
    Help,
    Quit,
}

/// Lines starting with a known `/command` are commands. `//text` sends
/// `/text`, and any other slash word is sent as an ordinary prompt.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let Some(command_line) = trimmed.strip_prefix('/') else {
        return Command::Send(line.to_string());
    };
    if command_line.starts_with('/') {
        return Command::Send(command_line.to_string());
    }

    let (name, argument) = match command_line.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command_line, ""),
    };

    match name {
        "mode" => match parse_mode_name(argument) {
            Some(mode) => Command::Mode(mode),
            None => Command::InvalidMode(argument.to_string()),
        },
        "settings" => Command::Settings,
        "history" => Command::History,
        "expand" => Command::Expand,
        "show" => Command::Show,
        "download" if argument.is_empty() => Command::Download(None),
        "download" => Command::Download(Some(PathBuf::from(argument))),
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Send(line.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineOutcome {
    pub output: String,
    pub quit: bool,
}

impl LineOutcome {
    fn print(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// Line-oriented chat front end over a [`ChatSession`].
pub struct TerminalChat<A> {
    session: ChatSession,
    api: A,
    renderer: MarkdownRenderer,
}

impl<A: GenerateApi> TerminalChat<A> {
    pub fn new(api: A, renderer: MarkdownRenderer) -> Self {
        Self {
            session: ChatSession::new(),
            api,
            renderer,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub async fn run(&mut self) -> std::io::Result<()> {
        println!("{}", self.banner());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("{} ", Style::new().cyan().bold().apply_to(">"));
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let outcome = self.handle_line(&line).await;
            if !outcome.output.is_empty() {
                println!("{}", outcome.output);
            }
            if outcome.quit {
                break;
            }
        }

        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> LineOutcome {
        match parse_command(line) {
            Command::Empty => LineOutcome::default(),
            Command::Send(text) => self.send(text).await,
            Command::Mode(mode) => {
                self.session.set_mode(mode);
                LineOutcome::print(format!("Response mode: {}", mode_label(mode)))
            }
            Command::InvalidMode(value) => LineOutcome::print(format!(
                "Unknown mode '{value}'. Choose standard, summarize, expand, rewrite or task."
            )),
            Command::Settings => {
                if self.session.toggle_settings() {
                    LineOutcome::print(self.settings_panel())
                } else {
                    LineOutcome::print("Settings closed.")
                }
            }
            Command::History => {
                if self.session.toggle_history() {
                    LineOutcome::print(self.history_pane().unwrap_or_default())
                } else {
                    LineOutcome::print("Conversations pane hidden.")
                }
            }
            Command::Expand => {
                if self.session.toggle_expanded_view() {
                    let pane = self
                        .session
                        .expanded_content()
                        .map(|content| self.expanded_pane(content));
                    LineOutcome::print(
                        pane.unwrap_or_else(|| "Response details opened.".to_string()),
                    )
                } else {
                    LineOutcome::print("Response details closed.")
                }
            }
            Command::Show => LineOutcome::print(self.render_visible_conversation()),
            Command::Download(dir) => {
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                let today = Utc::now().date_naive();
                match write_transcript(&dir, self.session.messages(), today) {
                    Ok(path) => {
                        LineOutcome::print(format!("Saved conversation to {}", path.display()))
                    }
                    Err(err) => {
                        LineOutcome::print(format!("Could not save conversation: {err}"))
                    }
                }
            }
            Command::Help => LineOutcome::print(HELP_TEXT),
            Command::Quit => LineOutcome {
                output: String::new(),
                quit: true,
            },
        }
    }

    async fn send(&mut self, text: String) -> LineOutcome {
        self.session.set_input(text);
        let Some(request) = self.session.begin_send() else {
            return LineOutcome::default();
        };

        let indicator = typing_indicator();
        let outcome = self.api.generate(request).await;
        indicator.finish_and_clear();

        let reply = self.session.complete_send(outcome).clone();
        let mut output = self.renderer.render_message(&reply);
        if let Some(content) = self.session.expanded_content() {
            output.push_str("\n\n");
            output.push_str(&self.expanded_pane(content));
        }

        LineOutcome::print(output)
    }

    fn banner(&self) -> String {
        let title = Style::new().bold().apply_to("juici gen");
        let welcome = self
            .session
            .messages()
            .iter()
            .map(|message| self.renderer.render_message(message))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("{title}  (type /help for commands)\n\n{welcome}")
    }

    /// The conversations pane (when shown) followed by the whole message log.
    fn render_visible_conversation(&self) -> String {
        let conversation = self
            .session
            .messages()
            .iter()
            .map(|message| self.renderer.render_message(message))
            .collect::<Vec<_>>()
            .join("\n\n");

        match self.history_pane() {
            Some(pane) => format!("{pane}\n\n{conversation}"),
            None => conversation,
        }
    }

    fn history_pane(&self) -> Option<String> {
        let entries = self.session.history_entries()?;
        let lines = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let marker = if index == 0 { "▸" } else { " " };
                format!("{marker} {entry}")
            })
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("── Conversations ──\n{lines}"))
    }

    fn expanded_pane(&self, content: &str) -> String {
        format!(
            "── Response Details ──\n{}",
            self.renderer.render_markdown(content)
        )
    }

    fn settings_panel(&self) -> String {
        let settings = self.session.settings();
        let mut modes = vec![(None, "Standard")];
        modes.extend(PromptMode::ALL.into_iter().map(|mode| (Some(mode), mode.label())));

        let mode_line = modes
            .into_iter()
            .map(|(mode, label)| {
                let marker = if mode == settings.mode { "x" } else { " " };
                format!("[{marker}] {label}")
            })
            .collect::<Vec<_>>()
            .join("  ");

        format!(
            "Juici Settings\n\
             Response Mode: {mode_line}\n\
             Show Chat History: {}\n\
             Use /mode and /history to change, /settings to close.",
            if settings.show_history { "on" } else { "off" }
        )
    }
}

fn mode_label(mode: Option<PromptMode>) -> &'static str {
    mode.map(PromptMode::label).unwrap_or("Standard")
}

fn typing_indicator() -> ProgressBar {
    let indicator = ProgressBar::new_spinner();
    indicator.enable_steady_tick(Duration::from_millis(120));
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["·  ", "·· ", "···", "   "])
        .template("{spinner:.green} {msg}")
    {
        indicator.set_style(style);
    }
    indicator.set_message("Juici is typing");
    indicator
}
