//! Core key types for sigchain devices.
//!
//! Strongly-typed wrappers over RSA and P-256 key material. The algorithm tag
//! travels with the key so callers never have to guess it from byte shape.

use crate::error::{KeyError, Result};
use p256::ecdsa::{SigningKey as EccSigningKey, VerifyingKey as EccVerifyingKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/* ------------------------------ Algorithm -------------------------------- */

/// Asymmetric algorithm a device is bound to.
///
/// The textual form is case-sensitive: exactly `"RSA"` or `"ECC"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "ECC")]
    Ecc,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Rsa, Algorithm::Ecc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Rsa => "RSA",
            Algorithm::Ecc => "ECC",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RSA" => Ok(Algorithm::Rsa),
            "ECC" => Ok(Algorithm::Ecc),
            other => Err(KeyError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/* ------------------------------ RSA -------------------------------------- */

#[derive(Clone)]
pub struct RsaKeyPair {
    pub(crate) private: RsaPrivateKey,
    pub(crate) public: RsaPublicKey,
}

impl RsaKeyPair {
    pub fn new(private: RsaPrivateKey) -> Self {
        let public = private.to_public_key();
        Self { private, public }
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }
}

/* ------------------------------ ECC -------------------------------------- */

/// NIST P-256 key pair used for DER-encoded ECDSA signatures.
#[derive(Clone)]
pub struct EccKeyPair {
    pub(crate) private: p256::SecretKey,
    pub(crate) public: p256::PublicKey,
}

impl EccKeyPair {
    pub fn new(private: p256::SecretKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    pub fn public_key(&self) -> &p256::PublicKey {
        &self.public
    }

    pub(crate) fn signing_key(&self) -> EccSigningKey {
        EccSigningKey::from(&self.private)
    }
}

/* ------------------------------ Key pair --------------------------------- */

/// Key material of either supported algorithm.
#[derive(Clone)]
pub enum KeyPair {
    Rsa(RsaKeyPair),
    Ecc(EccKeyPair),
}

impl KeyPair {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyPair::Rsa(_) => Algorithm::Rsa,
            KeyPair::Ecc(_) => Algorithm::Ecc,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            KeyPair::Rsa(kp) => PublicKey::Rsa(kp.public.clone()),
            KeyPair::Ecc(kp) => PublicKey::Ecc(EccVerifyingKey::from(&kp.public)),
        }
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (KeyPair::Rsa(a), KeyPair::Rsa(b)) => a.private == b.private,
            (KeyPair::Ecc(a), KeyPair::Ecc(b)) => a.private == b.private,
            _ => false,
        }
    }
}

impl fmt::Debug for KeyPair {
    // Never print private material
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// Public half of a key pair, used for verification and display.
#[derive(Clone, Debug, PartialEq)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    Ecc(EccVerifyingKey),
}

impl PublicKey {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            PublicKey::Rsa(_) => Algorithm::Rsa,
            PublicKey::Ecc(_) => Algorithm::Ecc,
        }
    }
}

/// PEM envelopes of a key pair: SPKI for the public key, PKCS#8 for the private key.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedKeyPair {
    pub public_pem: String,
    pub private_pem: String,
}

impl fmt::Debug for EncodedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedKeyPair")
            .field("public_pem", &self.public_pem)
            .finish_non_exhaustive()
    }
}
