//! Update handlers: greeting and generation.
//!
//! Each handler performs at most one terminal outbound action (a send, or a
//! placeholder send followed by an edit). Errors are returned to the caller
//! for logging and never reach the HTTP response.

use crate::channels::{TelegramChannel, TelegramUpdate};
use crate::llm::GeminiClient;
use crate::routing::{classify, Route};

/// Interim message shown while the generation backend is working.
pub const PLACEHOLDER_TEXT: &str = "⏳ processing…";

/// Sent as a separate message when the generation call fails.
pub const GENERATION_FAILED_TEXT: &str =
    "Something went wrong while generating a reply. Please try again.";

/// Sent when no generation backend is configured.
pub const SERVICE_UNAVAILABLE_TEXT: &str =
    "The reply service is not configured. Only /start works right now.";

/// Welcome text for /start, personalized with the sender's first name when known.
pub fn greeting_text(first_name: Option<&str>) -> String {
    format!(
        "Hi {}! Send me a message and I will reply.",
        first_name.unwrap_or("there")
    )
}

/// Run the handler an update routes to. At most one handler runs; a
/// `Route::Ignore` update returns without any outbound call.
pub async fn process_update(
    telegram: &TelegramChannel,
    generator: Option<&GeminiClient>,
    update: &TelegramUpdate,
) -> Result<(), String> {
    match classify(update) {
        Route::Ignore => Ok(()),
        Route::Greeting {
            chat_id,
            first_name,
        } => handle_greeting(telegram, chat_id, first_name.as_deref()).await,
        Route::Generate { chat_id, text } => {
            handle_generate(telegram, generator, chat_id, &text).await
        }
    }
}

/// Send the welcome message. Best-effort: a send failure is the handler's
/// only error and no second message is attempted.
async fn handle_greeting(
    telegram: &TelegramChannel,
    chat_id: i64,
    first_name: Option<&str>,
) -> Result<(), String> {
    telegram
        .send_message(chat_id, &greeting_text(first_name))
        .await?;
    log::debug!("greeting sent to chat {}", chat_id);
    Ok(())
}

/// Generation flow: placeholder send, backend call, then edit-in-place on
/// success or a separate failure notice on error. The placeholder is never
/// edited into an error text, since that edit could fail the same way.
async fn handle_generate(
    telegram: &TelegramChannel,
    generator: Option<&GeminiClient>,
    chat_id: i64,
    text: &str,
) -> Result<(), String> {
    let Some(generator) = generator else {
        telegram.send_message(chat_id, SERVICE_UNAVAILABLE_TEXT).await?;
        return Ok(());
    };

    let placeholder_id = telegram.send_message(chat_id, PLACEHOLDER_TEXT).await?;

    match generator.generate(text).await {
        Ok(reply) => {
            telegram
                .edit_message_text(chat_id, placeholder_id, &reply)
                .await
        }
        Err(e) => {
            log::warn!("generation failed for chat {}: {}", chat_id, e);
            telegram.send_message(chat_id, GENERATION_FAILED_TEXT).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_uses_first_name() {
        assert_eq!(
            greeting_text(Some("Ali")),
            "Hi Ali! Send me a message and I will reply."
        );
    }

    #[test]
    fn greeting_falls_back_without_name() {
        assert_eq!(
            greeting_text(None),
            "Hi there! Send me a message and I will reply."
        );
    }
}
