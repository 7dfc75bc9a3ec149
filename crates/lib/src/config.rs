//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.tgrelay/config.json`) and environment.
//! Secrets (bot token, generation API key) may come from the file or from env vars;
//! env wins when both are set.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Channel settings (Telegram).
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Generation backend settings (API key, model).
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Webhook server bind, port, and public URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for the webhook HTTP server (default 8080).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1"; set "0.0.0.0" behind a reverse proxy).
    #[serde(default = "default_server_bind")]
    pub bind: String,

    /// Public base URL this server is reachable at (e.g. "https://bot.example.com").
    /// Required by the webhook setup endpoint; the bot token is appended as the path.
    pub public_url: Option<String>,
}

fn default_server_port() -> u16 {
    8080
}

fn default_server_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
            public_url: None,
        }
    }
}

/// Per-channel config (Telegram).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsConfig {
    #[serde(default)]
    pub telegram: TelegramChannelConfig,
}

/// Telegram channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramChannelConfig {
    /// Bot token from BotFather. Overridden by TELEGRAM_BOT_TOKEN env when set.
    pub bot_token: Option<String>,
    /// Override the Bot API base URL (for tests or a local API server).
    pub api_base: Option<String>,
}

/// Generation backend config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// API key for the generation backend. Overridden by GEMINI_API_KEY env when set.
    /// When neither is set the bot still runs; generation requests get an unavailable notice.
    pub api_key: Option<String>,
    /// Model id passed to the backend (default in the client module).
    pub model: Option<String>,
    /// Override the backend base URL (for tests or a proxy).
    pub base_url: Option<String>,
}

/// Resolve the Telegram bot token: env TELEGRAM_BOT_TOKEN overrides config.
pub fn resolve_telegram_token(config: &Config) -> Option<String> {
    std::env::var("TELEGRAM_BOT_TOKEN")
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config
                .channels
                .telegram
                .bot_token
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the generation backend API key: env GEMINI_API_KEY overrides config.
pub fn resolve_generation_api_key(config: &Config) -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            config
                .generation
                .api_key
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("TGRELAY_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".tgrelay").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or TGRELAY_CONFIG_PATH). Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_port_and_bind() {
        let s = ServerConfig::default();
        assert_eq!(s.port, 8080);
        assert_eq!(s.bind, "127.0.0.1");
        assert!(s.public_url.is_none());
    }

    #[test]
    fn empty_json_parses_to_defaults() {
        let config: Config = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.server.port, 8080);
        assert!(config.channels.telegram.bot_token.is_none());
        assert!(config.generation.api_key.is_none());
    }

    #[test]
    fn token_from_config_is_trimmed() {
        let mut config = Config::default();
        config.channels.telegram.bot_token = Some("  123:abc  ".to_string());
        // Only meaningful when the env var is absent; tests do not set it.
        if std::env::var("TELEGRAM_BOT_TOKEN").is_err() {
            assert_eq!(resolve_telegram_token(&config), Some("123:abc".to_string()));
        }
    }

    #[test]
    fn blank_api_key_resolves_to_none() {
        let mut config = Config::default();
        config.generation.api_key = Some("   ".to_string());
        if std::env::var("GEMINI_API_KEY").is_err() {
            assert_eq!(resolve_generation_api_key(&config), None);
        }
    }

    #[test]
    fn camel_case_field_names() {
        let config: Config = serde_json::from_str(
            r#"{
                "server": { "publicUrl": "https://bot.example.com" },
                "channels": { "telegram": { "botToken": "t", "apiBase": "http://127.0.0.1:1" } },
                "generation": { "apiKey": "k", "model": "m", "baseUrl": "http://127.0.0.1:2" }
            }"#,
        )
        .expect("parse");
        assert_eq!(
            config.server.public_url.as_deref(),
            Some("https://bot.example.com")
        );
        assert_eq!(config.channels.telegram.bot_token.as_deref(), Some("t"));
        assert_eq!(config.generation.model.as_deref(), Some("m"));
    }
}
