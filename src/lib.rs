//! SECCO Tap Bot Library
//!
//! A Telegram bot front-end for the SECCO Tap Game web app.
//!
//! This crate provides the core functionality for:
//! - Loading the bot token and game links from the environment
//! - Routing commands and inline button presses to response templates
//! - Delivering responses over the Telegram Bot API

pub mod commands;
pub mod config;
pub mod telegram;
