//! Telegram notification sink.
//!
//! Sends each run's payload to a single chat. Delivery is awaited so the
//! pipeline can record failures; the call itself is bounded by a timeout.
//!
//! Requires the `telegram` feature to be enabled.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::info;

use super::format::format_payload;
use crate::domain::report::NotificationPayload;
use crate::error::NotificationError;
use crate::port::NotificationSink;

const SINK_NAME: &str = "telegram";

/// Configuration for the Telegram sink.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for notifications.
    pub chat_id: i64,
    /// Upper bound on a single message send.
    pub send_timeout: Duration,
}

impl TelegramConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`. Returns `None` if
    /// either is missing or invalid.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok())?;

        Some(Self {
            bot_token,
            chat_id,
            send_timeout: Duration::from_secs(15),
        })
    }
}

/// Notification sink that posts to a Telegram chat.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
    send_timeout: Duration,
}

impl TelegramSink {
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        info!(chat_id = config.chat_id, "Telegram sink configured");
        Self {
            bot: Bot::new(&config.bot_token),
            chat_id: ChatId(config.chat_id),
            send_timeout: config.send_timeout,
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    fn name(&self) -> &'static str {
        SINK_NAME
    }

    async fn send(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
        for text in format_payload(payload) {
            let request = self
                .bot
                .send_message(self.chat_id, text)
                .parse_mode(ParseMode::MarkdownV2);

            match tokio::time::timeout(self.send_timeout, request.send()).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => return Err(NotificationError::new(SINK_NAME, e.to_string())),
                Err(_) => {
                    return Err(NotificationError::new(
                        SINK_NAME,
                        format!("send timed out after {:?}", self.send_timeout),
                    ))
                }
            }
        }
        Ok(())
    }
}
