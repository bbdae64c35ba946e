//! Telegram Bot API integration
//!
//! A thin client over `getUpdates` / `sendMessage` plus the digest formatter.

mod client;
mod format;

pub use client::{
    Chat, ChatMessage, HttpTelegramClient, SendMessage, TelegramApi, TelegramError,
    TelegramResult, Update,
};
pub use format::{build_digest, escape_markdown_v2};
