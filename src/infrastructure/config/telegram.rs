//! Telegram notification configuration.

use serde::Deserialize;

/// Telegram notification configuration.
///
/// The bot token and chat id are read from `TELEGRAM_BOT_TOKEN` and
/// `TELEGRAM_CHAT_ID`; the file only switches the sink on.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    /// Per-message send timeout in seconds (default: 15).
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

const fn default_send_timeout_secs() -> u64 {
    15
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}
