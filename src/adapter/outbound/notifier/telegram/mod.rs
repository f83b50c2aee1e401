//! Telegram notification sink.
//!
//! Posts each run's ranked opportunities to a configured chat using
//! `MarkdownV2` formatting.

mod format;

pub mod sink;

pub use sink::{TelegramConfig, TelegramSink};
