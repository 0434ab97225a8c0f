//! SECCO Tap Bot - Main Entry Point
//!
//! A Telegram bot that greets players, shows their stats and referral link,
//! and opens the SECCO Tap Game web app.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use secco_tap_bot::commands::CommandRouter;
use secco_tap_bot::config::{BotSettings, GameConfig, TelegramConfig};
use secco_tap_bot::telegram::{self, TelegramBot};

/// Telegram bot for the SECCO Tap Game.
#[derive(Parser, Debug)]
#[command(name = "secco_tap_bot")]
#[command(about = "Run the SECCO Tap Game Telegram bot")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Skip registering the command menu with Telegram.
    #[arg(long)]
    no_register_commands: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load configurations
    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;

    let game_config =
        GameConfig::from_env().context("Failed to load game links from environment")?;

    let bot_settings = BotSettings::from_env_with_defaults();

    info!(
        "Game web app: {} (community: {}, bot link: {})",
        game_config.web_app_url, game_config.community_url, game_config.bot_link
    );

    // Connect to Telegram
    let bot = TelegramBot::connect(&tg_config)
        .await
        .context("Failed to connect to Telegram")?;

    if bot_settings.register_commands
        && !args.no_register_commands
        && let Err(e) = bot.register_commands().await
    {
        warn!("{}. Continuing without a command menu.", e);
    }

    let router = Arc::new(CommandRouter::new(game_config));

    info!("Starting SECCO Tap Bot...");
    telegram::run(Arc::new(bot), router).await;

    info!("Shutting down...");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
