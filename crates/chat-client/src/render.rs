use console::Style;
use shared::models::{ChatMessage, ChatRole};

const CODE_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "class", "const", "continue", "def", "else", "elif",
    "enum", "except", "export", "extends", "false", "False", "fn", "for", "from", "func",
    "function", "if", "impl", "import", "in", "interface", "let", "match", "mod", "mut", "new",
    "nil", "None", "null", "package", "pub", "raise", "return", "self", "static", "struct",
    "switch", "this", "throw", "trait", "true", "True", "try", "type", "use", "var", "while",
    "with", "yield",
];

/// Languages whose line comments start with `#` instead of `//`.
const HASH_COMMENT_LANGUAGES: &[&str] = &[
    "bash", "python", "py", "ruby", "rb", "sh", "shell", "toml", "yaml", "yml", "zsh",
];

/// Renders chat messages for a terminal. Assistant messages are treated as
/// markdown; user messages are printed as typed.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    styled: bool,
}

impl MarkdownRenderer {
    pub fn new(styled: bool) -> Self {
        Self { styled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn render_message(&self, message: &ChatMessage) -> String {
        match message.role {
            ChatRole::User => format!(
                "{} {}",
                self.paint(Style::new().cyan().bold(), "You:"),
                message.content
            ),
            ChatRole::Assistant => format!(
                "{}\n{}",
                self.paint(Style::new().green().bold(), "Juici:"),
                self.render_markdown(&message.content)
            ),
        }
    }

    pub fn render_markdown(&self, text: &str) -> String {
        let mut lines = Vec::new();
        let mut code_language: Option<String> = None;

        for line in text.lines() {
            let trimmed = line.trim_start();

            if let Some(fence_info) = trimmed.strip_prefix("```") {
                match code_language.take() {
                    Some(_) => lines.push(self.paint(Style::new().dim(), "└─")),
                    None => {
                        let language = fence_info.trim().to_ascii_lowercase();
                        let label = if language.is_empty() {
                            "code"
                        } else {
                            language.as_str()
                        };
                        lines.push(self.paint(Style::new().dim(), &format!("┌─ {label}")));
                        code_language = Some(language);
                    }
                }
                continue;
            }

            match code_language.as_deref() {
                Some(language) => lines.push(format!(
                    "{}{}",
                    self.paint(Style::new().dim(), "│ "),
                    self.highlight_code_line(line, language)
                )),
                None => lines.push(self.render_block_line(line)),
            }
        }

        // Unterminated fence: close the box anyway.
        if code_language.is_some() {
            lines.push(self.paint(Style::new().dim(), "└─"));
        }

        lines.join("\n")
    }

    fn render_block_line(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if let Some((level, heading)) = parse_heading(trimmed) {
            let style = if level == 1 {
                Style::new().bold().underlined()
            } else {
                Style::new().bold()
            };
            return self.paint(style, heading);
        }

        if is_horizontal_rule(trimmed) {
            return self.paint(Style::new().dim(), "────────────────────");
        }

        if let Some(quoted) = trimmed.strip_prefix('>') {
            return format!(
                "{}{}",
                self.paint(Style::new().dim(), "│ "),
                self.paint(Style::new().italic(), &self.render_inline(quoted.trim_start()))
            );
        }

        if let Some(item) = ["- ", "* ", "+ "]
            .iter()
            .find_map(|marker| trimmed.strip_prefix(marker))
        {
            return format!("{indent}  • {}", self.render_inline(item));
        }

        if let Some((number, item)) = parse_numbered_item(trimmed) {
            return format!("{indent}  {number}. {}", self.render_inline(item));
        }

        format!("{indent}{}", self.render_inline(trimmed))
    }

    fn render_inline(&self, text: &str) -> String {
        let mut output = String::new();
        let mut rest = text;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("**")
                && let Some(end) = after.find("**")
                && end > 0
            {
                output.push_str(&self.paint(Style::new().bold(), &after[..end]));
                rest = &after[end + 2..];
                continue;
            }

            if let Some(after) = rest.strip_prefix('`')
                && let Some(end) = after.find('`')
            {
                output.push_str(&self.paint(Style::new().yellow(), &after[..end]));
                rest = &after[end + 1..];
                continue;
            }

            if let Some(after) = rest.strip_prefix('*')
                && !after.starts_with(' ')
                && let Some(end) = after.find('*')
                && end > 0
            {
                output.push_str(&self.paint(Style::new().italic(), &after[..end]));
                rest = &after[end + 1..];
                continue;
            }

            if let Some((label, url, consumed)) = parse_link(rest) {
                output.push_str(&self.paint(Style::new().underlined(), label));
                output.push_str(&format!(" ({url})"));
                rest = &rest[consumed..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                output.push(ch);
            }
            rest = chars.as_str();
        }

        output
    }

    fn highlight_code_line(&self, line: &str, language: &str) -> String {
        let comment_marker = if HASH_COMMENT_LANGUAGES.contains(&language) {
            "#"
        } else {
            "//"
        };
        if line.trim_start().starts_with(comment_marker) {
            return self.paint(Style::new().dim(), line);
        }

        let mut output = String::new();
        let mut rest = line;
        while let Some(ch) = rest.chars().next() {
            if ch == '"' || ch == '\'' {
                let end = rest[1..]
                    .find(ch)
                    .map(|index| index + 2)
                    .unwrap_or(rest.len());
                output.push_str(&self.paint(Style::new().green(), &rest[..end]));
                rest = &rest[end..];
            } else if ch.is_alphanumeric() || ch == '_' {
                let end = rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                let word = &rest[..end];
                if CODE_KEYWORDS.contains(&word) {
                    output.push_str(&self.paint(Style::new().magenta().bold(), word));
                } else if word.chars().all(|c| c.is_ascii_digit()) {
                    output.push_str(&self.paint(Style::new().yellow(), word));
                } else {
                    output.push_str(word);
                }
                rest = &rest[end..];
            } else {
                output.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }

        output
    }

    fn paint(&self, style: Style, text: &str) -> String {
        style.force_styling(self.styled).apply_to(text).to_string()
    }
}

fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|ch| *ch == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..]
        .strip_prefix(' ')
        .map(|heading| (level, heading.trim()))
}

fn is_horizontal_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|ch| !ch.is_whitespace()).collect();
    compact.len() >= 3
        && (compact.chars().all(|ch| ch == '-')
            || compact.chars().all(|ch| ch == '*')
            || compact.chars().all(|ch| ch == '_'))
}

fn parse_numbered_item(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|item| (&line[..digits], item))
}

/// Parses `[label](url)` at the start of `text`, returning the byte length consumed.
fn parse_link(text: &str) -> Option<(&str, &str, usize)> {
    let after_open = text.strip_prefix('[')?;
    let label_end = after_open.find(']')?;
    let after_label = &after_open[label_end + 1..];
    let after_paren = after_label.strip_prefix('(')?;
    let url_end = after_paren.find(')')?;

    let consumed = 1 + label_end + 1 + 1 + url_end + 1;
    Some((&after_open[..label_end], &after_paren[..url_end], consumed))
}

#[cfg(test)]
mod tests {
    use shared::models::ChatMessage;

    use super::MarkdownRenderer;

    #[test]
    fn user_messages_are_not_parsed_as_markdown() {
        let rendered = MarkdownRenderer::plain().render_message(&ChatMessage::user("**hi**"));
        assert_eq!(rendered, "You: **hi**");
    }

    #[test]
    fn assistant_messages_strip_inline_markup() {
        let rendered = MarkdownRenderer::plain().render_message(&ChatMessage::assistant(
            "Use **bold**, *italic*, `code` and [docs](https://juici.ai).",
        ));
        assert_eq!(
            rendered,
            "Juici:\nUse bold, italic, code and docs (https://juici.ai)."
        );
    }

    #[test]
    fn block_elements_are_laid_out_for_the_terminal() {
        let rendered = MarkdownRenderer::plain()
            .render_markdown("# Plan\n- first\n* second\n2. third\n> note\n---\nplain text");
        assert_eq!(
            rendered,
            "Plan\n  • first\n  • second\n  2. third\n│ note\n────────────────────\nplain text"
        );
    }

    #[test]
    fn fenced_code_is_boxed_with_language_label() {
        let rendered = MarkdownRenderer::plain()
            .render_markdown("Example:\n```Rust\nfn main() {}\n```\nDone");
        assert_eq!(rendered, "Example:\n┌─ rust\n│ fn main() {}\n└─\nDone");
    }

    #[test]
    fn code_fences_keep_markdown_characters_literal() {
        let rendered = MarkdownRenderer::plain().render_markdown("```\n**not bold** # x\n```");
        assert_eq!(rendered, "┌─ code\n│ **not bold** # x\n└─");
    }

    #[test]
    fn unterminated_fence_is_closed() {
        let rendered = MarkdownRenderer::plain().render_markdown("```py\nprint('hi')");
        assert_eq!(rendered, "┌─ py\n│ print('hi')\n└─");
    }

    #[test]
    fn styled_output_highlights_code_keywords() {
        let renderer = MarkdownRenderer::new(true);
        let rendered = renderer.render_markdown("```js\nconst answer = 42;\n```");
        assert!(rendered.contains("\u{1b}["), "expected ANSI escapes in {rendered:?}");
        assert!(rendered.contains("const"));
        assert!(rendered.contains("answer"));
    }

    #[test]
    fn unmatched_markers_stay_literal() {
        let rendered = MarkdownRenderer::plain().render_markdown("2 * 3 = 6 and **open");
        assert_eq!(rendered, "2 * 3 = 6 and **open");
    }
}
