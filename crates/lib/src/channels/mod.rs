//! Communication channels (Telegram).
//!
//! Wire types for inbound webhook updates plus the outbound Bot API client
//! (send, edit, webhook registration).

mod telegram;

pub use telegram::{
    TelegramChannel, TelegramChat, TelegramMessage, TelegramUpdate, TelegramUser,
};
