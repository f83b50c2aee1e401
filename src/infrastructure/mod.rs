//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, component wiring and process-level
//! coordination.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions
//! - [`lock`] - Single-instance lock file

pub mod config;
pub mod factory;
pub mod lock;
