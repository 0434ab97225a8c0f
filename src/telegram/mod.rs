//! Telegram transport module.
//!
//! Connects with a bot token, turns incoming updates into events for the
//! command router and renders its responses as messages with inline keyboards.

mod client;
mod dispatch;
mod render;

pub use client::{Target, TelegramBot, TelegramError};
pub use dispatch::{event_from_callback, event_from_message, run};
