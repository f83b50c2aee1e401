//! Infrastructure configuration modules.

pub mod llm;
pub mod logging;
pub mod schedule;
pub mod settings;
pub mod telegram;
