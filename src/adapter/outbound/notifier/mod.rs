//! Notification adapters.
//!
//! Implements the [`NotificationSink`](crate::port::NotificationSink) trait
//! for the log and for Telegram.

pub mod log;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use log::LogSink;

#[cfg(test)]
mod tests;
