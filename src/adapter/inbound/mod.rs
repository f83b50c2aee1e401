//! Inbound adapters: ways the outside world drives the application.

pub mod cli;
