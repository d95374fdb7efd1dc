//! Fresh key material for a chosen algorithm.

use crate::error::{KeyError, Result};
use crate::types::{Algorithm, EccKeyPair, KeyPair, RsaKeyPair};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use sigchain_common::logging::{Component, Logger};
use sigchain_common::log_debug;

/// Default RSA modulus size in bits
pub const DEFAULT_RSA_KEY_BITS: usize = 2048;

/// Smallest modulus that still leaves room for a SHA-256 digest plus an
/// equal-length PSS salt
pub const MIN_RSA_KEY_BITS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenConfig {
    pub rsa_key_bits: usize,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            rsa_key_bits: DEFAULT_RSA_KEY_BITS,
        }
    }
}

impl KeyGenConfig {
    pub fn with_rsa_key_bits(mut self, bits: usize) -> Self {
        self.rsa_key_bits = bits;
        self
    }
}

pub struct KeyPairGenerator {
    config: KeyGenConfig,
    logger: Logger,
}

impl KeyPairGenerator {
    pub fn new(config: KeyGenConfig, logger: &Logger) -> Self {
        Self {
            config,
            logger: logger.with_component(Component::Keys),
        }
    }

    pub fn config(&self) -> &KeyGenConfig {
        &self.config
    }

    /// Generate a key pair for `algorithm`, consuming OS randomness.
    pub fn generate(&self, algorithm: Algorithm) -> Result<KeyPair> {
        let key_pair = match algorithm {
            Algorithm::Rsa => KeyPair::Rsa(self.generate_rsa()?),
            Algorithm::Ecc => KeyPair::Ecc(self.generate_ecc()),
        };
        log_debug!(self.logger, "generated {algorithm} key pair");
        Ok(key_pair)
    }

    fn generate_rsa(&self) -> Result<RsaKeyPair> {
        let bits = self.config.rsa_key_bits;
        if bits < MIN_RSA_KEY_BITS {
            return Err(KeyError::GenerationError(format!(
                "RSA modulus of {bits} bits is below the minimum of {MIN_RSA_KEY_BITS}"
            )));
        }
        let private = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| KeyError::GenerationError(e.to_string()))?;
        Ok(RsaKeyPair::new(private))
    }

    fn generate_ecc(&self) -> EccKeyPair {
        EccKeyPair::new(p256::SecretKey::random(&mut OsRng))
    }
}
