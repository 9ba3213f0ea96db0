//! Telegram Bot API transport.

pub mod client;
pub mod dispatch;
pub mod polling;
pub mod types;

pub use client::{MessageSender, SendOptions, TelegramClient};
pub use dispatch::answer_update;
pub use polling::Poller;
pub use types::{Chat, Message, Update, User};
