//! Service configuration
//!
//! Loaded from and saved to `<config_dir>/config.json`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{from_str, to_string_pretty};
use sigchain_common::logging::LoggingConfig;
use sigchain_keys::{KeyGenConfig, DEFAULT_RSA_KEY_BITS};
use std::path::Path;
use uuid::Uuid;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Identifier of this service instance, shown in every log line
    pub instance_id: String,

    /// RSA modulus size for newly created devices
    #[serde(default = "default_rsa_key_bits")]
    pub rsa_key_bits: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_rsa_key_bits() -> usize {
    DEFAULT_RSA_KEY_BITS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(format!("sigchain_{}", Uuid::new_v4()))
    }
}

impl ServiceConfig {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            rsa_key_bits: DEFAULT_RSA_KEY_BITS,
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_rsa_key_bits(mut self, bits: usize) -> Self {
        self.rsa_key_bits = bits;
        self
    }

    pub fn with_logging_config(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    pub fn key_gen_config(&self) -> KeyGenConfig {
        KeyGenConfig::default().with_rsa_key_bits(self.rsa_key_bits)
    }

    /// Load configuration from file
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        if !config_file.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file not found: {:?}",
                config_file
            ));
        }

        let config_content = std::fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file: {config_file:?}"))?;

        let config: ServiceConfig = from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {config_file:?}"))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        let config_content = to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_file, config_content)
            .with_context(|| format!("Failed to write config file: {config_file:?}"))?;

        Ok(())
    }

    pub fn exists(config_dir: &Path) -> bool {
        config_dir.join(CONFIG_FILE_NAME).exists()
    }
}
