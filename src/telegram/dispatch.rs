//! Update dispatching: Telegram updates in, routed responses out.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};
use tracing::{debug, error, info, trace, warn};

use super::client::{Target, TelegramBot, truncate_for_log};
use crate::commands::{CallbackTag, CommandRouter, Event, EventKind, UserRef};

/// Runs long polling until Ctrl+C.
pub async fn run(bot: Arc<TelegramBot>, router: Arc<CommandRouter>) {
    info!("Bot @{} is polling for updates...", bot.username());

    Dispatcher::builder(bot.inner().clone(), setup_handler())
        .dependencies(dptree::deps![bot, router])
        .default_handler(|update| async move {
            trace!("Unhandled update: {:?}", update.id);
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

async fn handle_message(
    msg: Message,
    bot: Arc<TelegramBot>,
    router: Arc<CommandRouter>,
) -> ResponseResult<()> {
    let Some(event) = event_from_message(&msg) else {
        if let Some(text) = msg.text() {
            debug!(
                "Ignoring non-command text in chat {}: \"{}\"",
                msg.chat.id.0,
                truncate_for_log(text, 30)
            );
        }
        return respond(());
    };

    if let Some(response) = router.route(&event)
        && let Err(e) = bot.deliver(Target::chat(msg.chat.id), &response).await
    {
        error!("Failed to answer {} from user {}: {}", event.kind, event.user.id, e);
    }

    respond(())
}

async fn handle_callback(
    query: CallbackQuery,
    bot: Arc<TelegramBot>,
    router: Arc<CommandRouter>,
) -> ResponseResult<()> {
    if let Err(e) = bot.answer_callback(&query).await {
        warn!("{}", e);
    }

    let Some(event) = event_from_callback(&query) else {
        debug!("Callback query {:?} carried no data", query.id);
        return respond(());
    };

    let Some(target) = callback_target(&query) else {
        warn!(
            "Callback {} from user {} has no chat to answer in",
            event.kind, event.user.id
        );
        return respond(());
    };

    if let Some(response) = router.route(&event)
        && let Err(e) = bot.deliver(target, &response).await
    {
        error!("Failed to answer {} from user {}: {}", event.kind, event.user.id, e);
    }

    respond(())
}

/// Builds an event from a text message, if it is a known command.
pub fn event_from_message(msg: &Message) -> Option<Event> {
    let kind = EventKind::parse_command(msg.text()?)?;
    let user = msg.from.as_ref().map_or_else(
        // Channel posts carry no sender; fall back to the chat itself.
        || UserRef::new(msg.chat.id.0.unsigned_abs(), fallback_name(None)),
        |user| user_ref(user.id.0, &user.first_name, user.username.as_deref()),
    );

    Some(Event::new(user, kind))
}

/// Builds an event from an inline button press.
pub fn event_from_callback(query: &CallbackQuery) -> Option<Event> {
    let tag = CallbackTag::parse(query.data.as_deref()?);
    let from = &query.from;
    let user = user_ref(from.id.0, &from.first_name, from.username.as_deref());
    Some(Event::new(user, EventKind::ButtonPress(tag)))
}

fn callback_target(query: &CallbackQuery) -> Option<Target> {
    let message = query.message.as_ref()?;
    Some(Target {
        chat_id: message.chat().id,
        source: message.regular_message().map(|m| m.id),
    })
}

fn user_ref(id: u64, first_name: &str, username: Option<&str>) -> UserRef {
    let name = Some(first_name)
        .filter(|n| !n.trim().is_empty())
        .or(username);
    UserRef::new(id, fallback_name(name))
}

fn fallback_name(name: Option<&str>) -> String {
    name.unwrap_or("Miner").to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ref_prefers_first_name() {
        assert_eq!(user_ref(42, "Ada", Some("ada_l")), UserRef::new(42, "Ada"));
    }

    #[test]
    fn test_user_ref_falls_back_to_username() {
        assert_eq!(user_ref(42, " ", Some("ada_l")).display_name, "ada_l");
        assert_eq!(user_ref(42, "", None).display_name, "Miner");
    }
}
