//! Telegram Bot API notification transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{Notifier, NotifyError};

/// Telegram transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from @BotFather (required).
    pub bot_token: String,
    /// Chat where operator notifications land.
    pub admin_chat_id: i64,
    /// Base URL (default: https://api.telegram.org).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Telegram Bot API client implementing the notifier transport.
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    bot_token: String,
    admin_chat_id: i64,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier.
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        if config.bot_token.is_empty() {
            return Err(NotifyError::NotConfigured(
                "Telegram bot token is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.telegram.org".to_string());

        Ok(Self {
            client,
            base_url,
            bot_token: config.bot_token,
            admin_chat_id: config.admin_chat_id,
        })
    }

    /// Chat configured for operator notifications.
    pub fn admin_chat_id(&self) -> i64 {
        self.admin_chat_id
    }
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, recipient_id: i64, message: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);

        debug!(recipient_id, "sending Telegram message");

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": recipient_id,
                "text": message,
                "parse_mode": "Markdown",
            }))
            .send()
            .await?;

        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Rejected(format!("unparseable response: {}", e)))?;

        if !body.ok {
            return Err(NotifyError::Rejected(
                body.description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(())
    }
}
