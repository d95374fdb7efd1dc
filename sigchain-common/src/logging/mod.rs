// Logging utilities for the sigchain stack
//
// This module provides:
// - Component-based structured logging
// - Instance ID tracking through logger inheritance
// - Per-request device context for tracing a signature chain
// - A small configuration layer over env_logger

use log::{debug, error, info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Arguments, Display, Formatter};

/// Predefined components for logging categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Service,
    Keys,
    Store,
    Chain,
    Locks,
    Custom(&'static str),
}

impl Component {
    /// Get the string representation of the component
    pub fn as_str(&self) -> &str {
        match self {
            Component::Service => "Service",
            Component::Keys => "Keys",
            Component::Store => "Store",
            Component::Chain => "Chain",
            Component::Locks => "Locks",
            Component::Custom(name) => name,
        }
    }
}

// Display helpers to avoid building prefix Strings on every log call
struct ComponentPrefixDisplay {
    parent: Option<Component>,
    component: Component,
}

impl Display for ComponentPrefixDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) if parent != Component::Service => {
                write!(f, "{}.{}", parent.as_str(), self.component.as_str())
            }
            _ => write!(f, "{}", self.component.as_str()),
        }
    }
}

struct MaybeDeviceDisplay<'a>(Option<&'a str>);

impl Display for MaybeDeviceDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.0 {
            write!(f, "|device={id}")
        } else {
            Ok(())
        }
    }
}

/// A component-specific logger that carries the service instance id
#[derive(Clone, Debug)]
pub struct Logger {
    component: Component,
    instance_id: String,
    parent_component: Option<Component>,
    /// Device whose chain the current request operates on
    device_id: Option<String>,
}

impl Logger {
    /// Create a new root logger for a component and instance id
    pub fn new_root(component: Component, instance_id: &str) -> Self {
        Self {
            component,
            instance_id: instance_id.to_string(),
            parent_component: None,
            device_id: None,
        }
    }

    /// Create a child logger with the same instance id but a different component
    pub fn with_component(&self, component: Component) -> Self {
        Self {
            component,
            instance_id: self.instance_id.clone(),
            parent_component: Some(self.component),
            device_id: self.device_id.clone(),
        }
    }

    /// Create a logger bound to a single device's chain
    pub fn with_device(&self, device_id: impl Into<String>) -> Self {
        Self {
            component: self.component,
            instance_id: self.instance_id.clone(),
            parent_component: self.parent_component,
            device_id: Some(device_id.into()),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn component(&self) -> Component {
        self.component
    }

    /// Full line prefix: component path plus optional device context
    pub fn prefix(&self) -> String {
        format!(
            "{}{}",
            ComponentPrefixDisplay {
                parent: self.parent_component,
                component: self.component,
            },
            MaybeDeviceDisplay(self.device_id())
        )
    }

    fn is_root_service(&self) -> bool {
        self.component == Component::Service
            && self.parent_component.is_none()
            && self.device_id.is_none()
    }

    pub fn debug(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Debug) {
            self.debug_args(format_args!("{}", message.into()));
        }
    }

    /// Log a debug message using fmt::Arguments (avoids allocating message String)
    pub fn debug_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Debug) {
            if self.is_root_service() {
                debug!("[{}] {}", self.instance_id, args);
            } else {
                debug!(
                    "[{}][{}{}] {}",
                    self.instance_id,
                    ComponentPrefixDisplay {
                        parent: self.parent_component,
                        component: self.component
                    },
                    MaybeDeviceDisplay(self.device_id()),
                    args
                );
            }
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Info) {
            self.info_args(format_args!("{}", message.into()));
        }
    }

    pub fn info_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Info) {
            if self.is_root_service() {
                info!("[{}] {}", self.instance_id, args);
            } else {
                info!(
                    "[{}][{}{}] {}",
                    self.instance_id,
                    ComponentPrefixDisplay {
                        parent: self.parent_component,
                        component: self.component
                    },
                    MaybeDeviceDisplay(self.device_id()),
                    args
                );
            }
        }
    }

    pub fn warn(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Warn) {
            self.warn_args(format_args!("{}", message.into()));
        }
    }

    pub fn warn_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Warn) {
            if self.is_root_service() {
                warn!("[{}] {}", self.instance_id, args);
            } else {
                warn!(
                    "[{}][{}{}] {}",
                    self.instance_id,
                    ComponentPrefixDisplay {
                        parent: self.parent_component,
                        component: self.component
                    },
                    MaybeDeviceDisplay(self.device_id()),
                    args
                );
            }
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Error) {
            self.error_args(format_args!("{}", message.into()));
        }
    }

    pub fn error_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Error) {
            if self.is_root_service() {
                error!("[{}] {}", self.instance_id, args);
            } else {
                error!(
                    "[{}][{}{}] {}",
                    self.instance_id,
                    ComponentPrefixDisplay {
                        parent: self.parent_component,
                        component: self.component
                    },
                    MaybeDeviceDisplay(self.device_id()),
                    args
                );
            }
        }
    }
}

/* ------------------------------ Configuration ---------------------------- */

/// Log level as it appears in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

/// Logging configuration applied once per process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub default_level: LogLevel,
    pub with_timestamp: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            with_timestamp: true,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.with_timestamp = enabled;
        self
    }

    /// Install env_logger with this configuration.
    ///
    /// `RUST_LOG` still takes precedence. A logger that is already installed
    /// is left in place, so calling this more than once is harmless.
    pub fn apply(&self) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.default_level.to_level_filter());
        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }
        if !self.with_timestamp {
            builder.format_timestamp(None);
        }
        let _ = builder.try_init();
    }
}
