//! Configuration module for the tap game bot.
//!
//! Handles loading and validation of the bot token and of the links the
//! bot hands out (game web app, community channel, referral base link).

mod settings;

pub use settings::{
    BotSettings, ConfigError, DEFAULT_BOT_LINK, DEFAULT_COMMUNITY_URL, GameConfig, TelegramConfig,
};
