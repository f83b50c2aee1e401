//! Notification sink factory.
//!
//! The log sink is always registered. Telegram is added when the `telegram`
//! feature is compiled in, `[telegram].enabled` is set and the bot
//! credentials are present in the environment.

use tracing::{info, warn};

use crate::adapter::outbound::notifier::LogSink;
use crate::infrastructure::config::settings::Config;
use crate::port::SinkRegistry;

#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramSink};

/// Build the sink registry from configuration.
#[must_use]
pub fn build_sinks(config: &Config) -> SinkRegistry {
    let mut registry = SinkRegistry::new();
    registry.register(Box::new(LogSink));

    if config.telegram.enabled {
        register_telegram(config, &mut registry);
    }

    info!(sinks = registry.len(), "Notification sinks ready");
    registry
}

#[cfg(feature = "telegram")]
fn register_telegram(config: &Config, registry: &mut SinkRegistry) {
    match TelegramConfig::from_env() {
        Some(tg) => {
            let tg = TelegramConfig {
                send_timeout: std::time::Duration::from_secs(config.telegram.send_timeout_secs),
                ..tg
            };
            registry.register(Box::new(TelegramSink::new(tg)));
        }
        None => warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set"),
    }
}

#[cfg(not(feature = "telegram"))]
fn register_telegram(_config: &Config, _registry: &mut SinkRegistry) {
    warn!("Telegram enabled in config but the binary was built without the `telegram` feature");
}
