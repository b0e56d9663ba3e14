//! Message dispatcher - Routes chat text to the steam command

use crate::application::services::SteamCommand;
use super::parser::MessageParser;
use super::render::{render, render_error};

/// Parses a line, runs it against the group it came from, renders the reply
pub struct MessageDispatcher {
    parser: MessageParser,
    command: SteamCommand,
}

impl MessageDispatcher {
    pub fn new(prefix: impl Into<String>, command: SteamCommand) -> Self {
        Self {
            parser: MessageParser::new(prefix),
            command,
        }
    }

    /// `None` for text that isn't a steam command. The chat id is the group scope.
    pub async fn process_text(&self, chat_id: &str, text: &str) -> Option<String> {
        let parsed = self.parser.parse(text)?;
        let reply = match self
            .command
            .handle(&parsed.subcommand, chat_id, &parsed.args)
            .await
        {
            Ok(outcome) => render(&outcome),
            Err(e) => {
                tracing::warn!("[{}] steam {} failed: {}", chat_id, parsed.subcommand, e);
                render_error(&e)
            }
        };
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::services::testing::{FakeSteam, MemoryStore};
    use crate::application::services::ResolutionService;

    fn dispatcher() -> MessageDispatcher {
        let service = ResolutionService::new(Arc::new(MemoryStore::default()), Arc::new(FakeSteam::default()))
            .with_verify_on_link(false);
        MessageDispatcher::new("/", SteamCommand::new(Arc::new(service)))
    }

    #[tokio::test]
    async fn chat_id_scopes_aliases() {
        let d = dispatcher();
        let reply = d.process_text("room-1", "/steam link mai 22202").await.unwrap();
        assert!(reply.starts_with("Linked: mai"));

        let here = d.process_text("room-1", "/steam whois mai").await.unwrap();
        assert!(here.contains("76561197960287930"));
        let elsewhere = d.process_text("room-2", "/steam whois mai").await.unwrap();
        assert_eq!(elsewhere, "Alias not found: mai");
    }

    #[tokio::test]
    async fn non_commands_are_ignored() {
        assert!(dispatcher().process_text("room", "just chatting").await.is_none());
    }

    #[tokio::test]
    async fn bad_usage_gets_a_hint() {
        let reply = dispatcher().process_text("room", "/steam link onlyalias").await.unwrap();
        assert!(reply.contains("usage: link <alias> <steamid|vanity>"));
    }
}
