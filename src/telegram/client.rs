//! Telegram client wrapper for delivering responses.

use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::{BotCommand as MenuCommand, CallbackQuery, ChatId, MessageId, ParseMode};
use thiserror::Error;
use tracing::{debug, info};

use super::render::keyboard;
use crate::commands::{Delivery, Response, all_commands};
use crate::config::TelegramConfig;

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Bot token rejected or Telegram unreachable: {0}")]
    Connection(#[source] RequestError),

    #[error("Failed to send message to chat {}: {source}", chat_id.0)]
    Send {
        chat_id: ChatId,
        #[source]
        source: RequestError,
    },

    #[error("Failed to edit message {} in chat {}: {source}", message_id.0, chat_id.0)]
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        #[source]
        source: RequestError,
    },

    #[error("Failed to answer callback query: {0}")]
    AnswerCallback(#[source] RequestError),

    #[error("Failed to register command menu: {0}")]
    RegisterCommands(#[source] RequestError),
}

/// Where a response should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Chat the event came from.
    pub chat_id: ChatId,

    /// Message whose button was pressed, when it can still be edited.
    pub source: Option<MessageId>,
}

impl Target {
    /// A plain chat target with nothing to edit.
    #[must_use]
    pub const fn chat(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            source: None,
        }
    }
}

/// High-level Telegram bot wrapper.
#[derive(Clone)]
pub struct TelegramBot {
    /// The underlying teloxide bot.
    bot: Bot,

    /// Username reported by `getMe`.
    username: String,
}

impl TelegramBot {
    /// Connects to Telegram and verifies the token.
    ///
    /// # Errors
    ///
    /// Returns an error if Telegram rejects the token or cannot be reached.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, TelegramError> {
        info!(
            "Connecting to Telegram as bot {}...",
            mask_token(&config.bot_token)
        );

        let bot = Bot::new(config.bot_token.clone());
        let me = bot.get_me().await.map_err(TelegramError::Connection)?;
        let username = me.user.username.clone().unwrap_or_default();

        info!("Connected to Telegram as @{}", username);

        Ok(Self { bot, username })
    }

    /// Username of the bot.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns a reference to the underlying bot for dispatching.
    #[must_use]
    pub const fn inner(&self) -> &Bot {
        &self.bot
    }

    /// Registers the slash-command menu shown by Telegram clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn register_commands(&self) -> Result<(), TelegramError> {
        let commands = all_commands()
            .into_iter()
            .map(|(name, description)| MenuCommand::new(name, description));

        self.bot
            .set_my_commands(commands)
            .await
            .map_err(TelegramError::RegisterCommands)?;

        info!("Registered {} bot commands", all_commands().len());
        Ok(())
    }

    /// Stops the loading indicator on a pressed inline button.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn answer_callback(&self, query: &CallbackQuery) -> Result<(), TelegramError> {
        self.bot
            .answer_callback_query(query.id.clone())
            .await
            .map_err(TelegramError::AnswerCallback)?;
        Ok(())
    }

    /// Delivers a response to the target chat.
    ///
    /// Responses asking for [`Delivery::EditSource`] replace the source
    /// message when there is one; everything else is posted as a new message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be sent or edited.
    pub async fn deliver(&self, target: Target, response: &Response) -> Result<(), TelegramError> {
        match (response.delivery, target.source) {
            (Delivery::EditSource, Some(message_id)) => {
                self.edit(target.chat_id, message_id, response).await
            }
            _ => self.send(target.chat_id, response).await,
        }
    }

    async fn send(&self, chat_id: ChatId, response: &Response) -> Result<(), TelegramError> {
        debug!(
            "Sending \"{}\" to chat {}",
            truncate_for_log(&response.text, 30),
            chat_id.0
        );

        self.bot
            .send_message(chat_id, response.text.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard(response))
            .await
            .map_err(|source| TelegramError::Send { chat_id, source })?;

        Ok(())
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        response: &Response,
    ) -> Result<(), TelegramError> {
        debug!(
            "Editing message {} in chat {} to \"{}\"",
            message_id.0,
            chat_id.0,
            truncate_for_log(&response.text, 30)
        );

        self.bot
            .edit_message_text(chat_id, message_id, response.text.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard(response))
            .await
            .map_err(|source| TelegramError::Edit {
                chat_id,
                message_id,
                source,
            })?;

        Ok(())
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Masks a bot token for logging (keeps only the bot id before the colon).
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{bot_id}:***"),
        _ => "***".to_owned(),
    }
}

/// Truncates a string for logging purposes.
pub(crate) fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("123456:ABC-secret"), "123456:***");
        assert_eq!(mask_token("no-colon-here"), "***");
        assert_eq!(mask_token(":secret"), "***");
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("Hello", 10), "Hello");
        assert_eq!(truncate_for_log("Hello, World!", 5), "Hello...");
        assert_eq!(truncate_for_log("🎮🎮🎮", 2), "🎮🎮...");
    }

    #[test]
    fn test_target_chat_has_no_source() {
        let target = Target::chat(ChatId(7));
        assert_eq!(target.chat_id, ChatId(7));
        assert_eq!(target.source, None);
    }
}
