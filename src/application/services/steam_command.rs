use std::sync::Arc;

use crate::application::errors::ResolveError;
use crate::domain::entities::{LinkOutcome, ListedBinding, ResolutionResult};
use crate::domain::traits::AliasResolver;

/// Subcommands of `/steam`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Help,
    Status,
    Link,
    Unlink,
    List,
    Whois,
}

impl Subcommand {
    pub const ALL: [Subcommand; 6] = [
        Subcommand::Help,
        Subcommand::Link,
        Subcommand::Unlink,
        Subcommand::List,
        Subcommand::Status,
        Subcommand::Whois,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Subcommand::Help => "help",
            Subcommand::Status => "status",
            Subcommand::Link => "link",
            Subcommand::Unlink => "unlink",
            Subcommand::List => "list",
            Subcommand::Whois => "whois",
        }
    }

    /// Exact number of arguments after the subcommand name
    pub fn arity(&self) -> usize {
        match self {
            Subcommand::Help | Subcommand::List => 0,
            Subcommand::Status | Subcommand::Unlink | Subcommand::Whois => 1,
            Subcommand::Link => 2,
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Subcommand::Help => "help",
            Subcommand::Status => "status <alias|steamid|vanity>",
            Subcommand::Link => "link <alias> <steamid|vanity>",
            Subcommand::Unlink => "unlink <alias>",
            Subcommand::List => "list",
            Subcommand::Whois => "whois <alias>",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Subcommand::Help => "Show this help",
            Subcommand::Status => "Show live status",
            Subcommand::Link => "Bind an alias in this group",
            Subcommand::Unlink => "Remove an alias from this group",
            Subcommand::List => "List every alias in this group",
            Subcommand::Whois => "Show what an alias is bound to",
        }
    }
}

/// Structured result handed back to whoever renders text
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Help,
    Status(ResolutionResult),
    Linked(LinkOutcome),
    Unlinked { alias: String, removed: bool },
    List(Vec<ListedBinding>),
    Whois(ListedBinding),
}

/// Validates arguments and routes a subcommand to the resolver
pub struct SteamCommand {
    resolver: Arc<dyn AliasResolver>,
}

impl SteamCommand {
    pub fn new(resolver: Arc<dyn AliasResolver>) -> Self {
        Self { resolver }
    }

    pub async fn handle(
        &self,
        subcommand: &str,
        group: &str,
        args: &[String],
    ) -> Result<CommandOutcome, ResolveError> {
        let sub = Subcommand::parse(subcommand).ok_or_else(|| {
            ResolveError::BadArguments(format!("unknown subcommand {:?}", subcommand))
        })?;

        if args.len() != sub.arity() {
            return Err(ResolveError::BadArguments(format!(
                "usage: {}",
                sub.usage()
            )));
        }

        tracing::debug!(group, subcommand = sub.name(), "handling steam command");

        match sub {
            Subcommand::Help => Ok(CommandOutcome::Help),
            Subcommand::Status => self
                .resolver
                .resolve(group, &args[0], true)
                .await
                .map(CommandOutcome::Status),
            Subcommand::Link => self
                .resolver
                .link(group, &args[0], &args[1])
                .await
                .map(CommandOutcome::Linked),
            Subcommand::Unlink => {
                let removed = self.resolver.unlink(group, &args[0]).await?;
                Ok(CommandOutcome::Unlinked {
                    alias: args[0].clone(),
                    removed,
                })
            }
            Subcommand::List => self.resolver.list(group, true).await.map(CommandOutcome::List),
            Subcommand::Whois => self
                .resolver
                .whois(group, &args[0])
                .await
                .map(CommandOutcome::Whois),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{FakeSteam, MemoryStore};
    use crate::application::services::ResolutionService;

    fn command() -> SteamCommand {
        let service = ResolutionService::new(Arc::new(MemoryStore::default()), Arc::new(FakeSteam::default()))
            .with_verify_on_link(false);
        SteamCommand::new(Arc::new(service))
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Subcommand::parse("LINK"), Some(Subcommand::Link));
        assert_eq!(Subcommand::parse(" whois "), Some(Subcommand::Whois));
        assert_eq!(Subcommand::parse("kick"), None);
    }

    #[tokio::test]
    async fn wrong_arity_is_bad_arguments() {
        let cmd = command();
        for (sub, given) in [
            ("link", args(&["only-alias"])),
            ("status", args(&[])),
            ("unlink", args(&["a", "b"])),
            ("list", args(&["extra"])),
            ("whois", args(&[])),
        ] {
            assert!(
                matches!(cmd.handle(sub, "g", &given).await, Err(ResolveError::BadArguments(_))),
                "{} {:?}",
                sub,
                given
            );
        }
    }

    #[tokio::test]
    async fn unknown_subcommand_is_bad_arguments() {
        assert!(matches!(
            command().handle("ban", "g", &[]).await,
            Err(ResolveError::BadArguments(_))
        ));
    }

    #[tokio::test]
    async fn link_list_unlink_flow() {
        let cmd = command();
        let linked = cmd.handle("link", "g", &args(&["mai", "22202"])).await.unwrap();
        assert!(matches!(linked, CommandOutcome::Linked(_)));

        match cmd.handle("list", "g", &[]).await.unwrap() {
            CommandOutcome::List(rows) => assert_eq!(rows.len(), 1),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            cmd.handle("unlink", "g", &args(&["mai"])).await.unwrap(),
            CommandOutcome::Unlinked { alias: "mai".to_string(), removed: true }
        );
        assert_eq!(
            cmd.handle("unlink", "g", &args(&["mai"])).await.unwrap(),
            CommandOutcome::Unlinked { alias: "mai".to_string(), removed: false }
        );
    }

    #[tokio::test]
    async fn help_takes_no_arguments() {
        assert_eq!(command().handle("help", "g", &[]).await.unwrap(), CommandOutcome::Help);
    }
}
