//! Update routing: classify a parsed update into the handler that should run.
//!
//! Pure and side-effect free; the server dispatches on the returned route.

use crate::channels::TelegramUpdate;

/// Command that triggers the greeting handler. Prefix match, so
/// "/start now" still routes to the greeting.
const START_COMMAND: &str = "/start";

/// Which handler an update routes to. Exactly one route per update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Non-text update (or empty text): no handler runs, no reply is sent.
    Ignore,
    /// `/start` command: send the welcome message.
    Greeting {
        chat_id: i64,
        first_name: Option<String>,
    },
    /// Any other text: run the generation handler.
    Generate { chat_id: i64, text: String },
}

/// Classify an update. Command prefix wins over generic text.
pub fn classify(update: &TelegramUpdate) -> Route {
    let Some(ref msg) = update.message else {
        return Route::Ignore;
    };
    let Some(ref text) = msg.text else {
        return Route::Ignore;
    };
    if text.is_empty() {
        return Route::Ignore;
    }
    if text.starts_with(START_COMMAND) {
        Route::Greeting {
            chat_id: msg.chat.id,
            first_name: msg.from.as_ref().and_then(|u| u.first_name.clone()),
        }
    } else {
        Route::Generate {
            chat_id: msg.chat.id,
            text: text.clone(),
        }
    }
}
