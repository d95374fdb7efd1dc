//! Sigchain Common
//!
//! Shared utilities for the sigchain signing stack.
//!
//! This crate provides:
//! - Component-based structured logging with instance and device context
//! - Logging configuration backed by `env_logger`
//! - Level-checked logging macros

pub mod logging;
pub mod macros;

pub use logging::{Component, LogLevel, Logger, LoggingConfig};
