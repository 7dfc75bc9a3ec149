//! Telegram channel: webhook update payloads and sendMessage/editMessageText via Bot API.

use serde::Deserialize;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram update payload (webhook POST body).
#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<TelegramUser>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TelegramUser {
    #[serde(default)]
    pub first_name: Option<String>,
}

/// Bot API response envelope: `{"ok": bool, "result": ...}`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
}

/// sendMessage result; only the id of the created message is needed
/// (the generation handler edits its placeholder by id later).
#[derive(Debug, Default, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram channel connector: sends and edits messages via the Bot API.
pub struct TelegramChannel {
    token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    /// `api_base` overrides the Bot API host (for tests or a local API server).
    pub fn new(token: String, api_base: Option<String>) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| TELEGRAM_API_BASE.to_string());
        Self {
            token,
            api_base,
            client: reqwest::Client::new(),
        }
    }

    /// Bot token (used by the server as the webhook routing path).
    pub fn token(&self) -> &str {
        &self.token
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Send a text message to a chat via sendMessage; returns the new message id.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, String> {
        let url = self.method_url("sendMessage");
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("sendMessage failed: {} {}", status, body));
        }
        let data: ApiResponse<SentMessage> = res.json().await.map_err(|e| e.to_string())?;
        if !data.ok {
            return Err("sendMessage returned ok: false".to_string());
        }
        data.result
            .map(|m| m.message_id)
            .ok_or_else(|| "sendMessage returned no result".to_string())
    }

    /// Replace the text of a previously sent message via editMessageText.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), String> {
        let url = self.method_url("editMessageText");
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("editMessageText failed: {} {}", status, body));
        }
        Ok(())
    }

    /// Register `url` as this bot's webhook target. Telegram POSTs updates there
    /// instead of serving getUpdates. Safe to call repeatedly.
    pub async fn set_webhook(&self, url: &str) -> Result<(), String> {
        let api_url = self.method_url("setWebhook");
        let body = serde_json::json!({ "url": url });
        let res = self
            .client
            .post(&api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("setWebhook failed: {} {}", status, body));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_update_with_text_and_sender() {
        let update: TelegramUpdate = serde_json::from_str(
            r#"{"message":{"chat":{"id":42},"text":"/start","from":{"first_name":"Ali"}}}"#,
        )
        .expect("parse");
        let msg = update.message.expect("message");
        assert_eq!(msg.chat.id, 42);
        assert_eq!(msg.text.as_deref(), Some("/start"));
        assert_eq!(
            msg.from.and_then(|u| u.first_name).as_deref(),
            Some("Ali")
        );
    }

    #[test]
    fn parse_update_without_text() {
        let update: TelegramUpdate =
            serde_json::from_str(r#"{"message":{"chat":{"id":7},"message_id":5}}"#).expect("parse");
        let msg = update.message.expect("message");
        assert_eq!(msg.chat.id, 7);
        assert!(msg.text.is_none());
        assert!(msg.from.is_none());
    }

    #[test]
    fn parse_update_without_message() {
        let update: TelegramUpdate =
            serde_json::from_str(r#"{"update_id":1}"#).expect("parse");
        assert!(update.message.is_none());
    }

    #[test]
    fn method_url_includes_token_and_base_override() {
        let channel = TelegramChannel::new(
            "123:abc".to_string(),
            Some("http://127.0.0.1:9999/".to_string()),
        );
        assert_eq!(
            channel.method_url("sendMessage"),
            "http://127.0.0.1:9999/bot123:abc/sendMessage"
        );
    }
}
