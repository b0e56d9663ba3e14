use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use steam_alias_bot::application::errors::BotError;
use steam_alias_bot::application::messaging::{render, render_error, MessageDispatcher};
use steam_alias_bot::application::services::{ResolutionService, SteamCommand};
use steam_alias_bot::domain::traits::Bot;
use steam_alias_bot::infrastructure::adapters::ConsoleAdapter;
use steam_alias_bot::infrastructure::config::Config;
use steam_alias_bot::infrastructure::steam::SteamWebClient;
use steam_alias_bot::infrastructure::storage::JsonAliasStore;

#[derive(Parser)]
#[command(name = "steam-alias-bot")]
#[command(about = "Per-group Steam aliases and live status", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Group scope (overrides bot.default-group)
    #[arg(short, long)]
    group: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive console session
    Run,
    /// Run one steam subcommand, e.g. `exec link mai 76561197960287930`
    Exec {
        subcommand: String,
        args: Vec<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_console(&cli.config, cli.group).await,
        Commands::Exec { subcommand, args } => exec(&cli.config, cli.group, &subcommand, &args).await,
        Commands::Version => {
            println!("steam-alias-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        match Config::load(config_path) {
            Ok(mut config) => {
                config.apply_env();
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    }
}

/// Wire store, Steam client and facade together. Fails on a corrupt store.
fn build_command(config: &Config) -> Result<SteamCommand, BotError> {
    config.validate()?;

    let store = JsonAliasStore::open(&config.storage.path, config.alias_policy())?;
    tracing::info!("Alias store loaded from {}", store.path().display());

    let steam = SteamWebClient::from_config(&config.steam)?;
    let service = ResolutionService::new(Arc::new(store), Arc::new(steam))
        .with_verify_on_link(config.steam.verify_on_link);
    Ok(SteamCommand::new(Arc::new(service)))
}

async fn exec(
    config_path: &str,
    group: Option<String>,
    subcommand: &str,
    args: &[String],
) -> Result<(), BotError> {
    let config = load_config(config_path);
    let group = group.unwrap_or_else(|| config.bot.default_group.clone());
    let command = build_command(&config)?;

    match command.handle(subcommand, &group, args).await {
        Ok(outcome) => {
            println!("{}", render(&outcome));
            Ok(())
        }
        Err(e) => {
            println!("{}", render_error(&e));
            Err(e.into())
        }
    }
}

async fn run_console(config_path: &str, group: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path);
    let group = group.unwrap_or_else(|| config.bot.default_group.clone());
    let dispatcher = MessageDispatcher::new(&config.bot.prefix, build_command(&config)?);

    let bot = ConsoleAdapter::new(&config.bot.name);
    bot.start().await?;
    tracing::info!("Bot started: {} (group {})", bot.bot_info().name, group);

    while let Some(input) = bot.read_line("> ").await {
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        match dispatcher.process_text(&group, &input).await {
            Some(reply) => bot.send_message(&group, &reply).await?,
            None => {
                bot.send_message(&group, "Try /steam help").await?;
            }
        }
    }
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| BotError::Internal(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml, set steam.api-key and adjust as needed.");
    Ok(())
}
