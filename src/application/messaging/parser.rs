//! Message parser - Splits raw chat text into a subcommand and its arguments

/// A `/steam ...` line, tokenized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub subcommand: String,
    pub args: Vec<String>,
}

/// Parses incoming text addressed to the steam command
pub struct MessageParser {
    command_prefix: String,
    command_name: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            command_name: "steam".to_string(),
        }
    }

    /// `None` when the text isn't addressed to us. A bare `/steam` means help.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        let text = text.trim();
        // Remove the command prefix (either / or custom prefix); it's optional
        let cmd_text = if let Some(rest) = text.strip_prefix('/') {
            rest
        } else if !self.command_prefix.is_empty() {
            text.strip_prefix(self.command_prefix.as_str()).unwrap_or(text)
        } else {
            text
        };

        let mut parts = cmd_text.split_whitespace();
        let name = parts.next()?;
        if !name.eq_ignore_ascii_case(&self.command_name) {
            return None;
        }

        let subcommand = parts.next().unwrap_or("help").to_lowercase();
        let args = parts.map(|s| s.to_string()).collect();
        Some(ParsedCommand { subcommand, args })
    }
}
