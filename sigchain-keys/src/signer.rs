//! Signing over arbitrary payloads, one implementation per algorithm.
//!
//! Both variants are randomized: signing the same payload twice yields two
//! different, equally valid signatures.

use crate::encoding;
use crate::error::{KeyError, Result};
use crate::types::{Algorithm, EccKeyPair, KeyPair, RsaKeyPair};
use p256::ecdsa::{signature::RandomizedSigner as _, Signature as EccSignature};
use rand::rngs::OsRng;
use rsa::pss::BlindedSigningKey;
use rsa::signature::{RandomizedSigner as _, SignatureEncoding as _};
use sha2::Sha256;

/// Capability shared by every device signer.
pub trait Signer: Send + Sync {
    /// Sign `payload`, returning the raw signature bytes.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>>;

    fn algorithm(&self) -> Algorithm;
}

/// RSASSA-PSS with SHA-256; the salt is as long as the digest.
pub struct RsaSigner {
    signing_key: BlindedSigningKey<Sha256>,
}

impl RsaSigner {
    pub fn new(key_pair: &RsaKeyPair) -> Self {
        Self {
            signing_key: BlindedSigningKey::<Sha256>::new(key_pair.private.clone()),
        }
    }
}

impl Signer for RsaSigner {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let signature = self
            .signing_key
            .try_sign_with_rng(&mut OsRng, payload)
            .map_err(|e| KeyError::SigningError(e.to_string()))?;
        Ok(signature.to_vec())
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Rsa
    }
}

/// ECDSA over P-256, ASN.1 DER signature encoding.
pub struct EccSigner {
    signing_key: p256::ecdsa::SigningKey,
}

impl EccSigner {
    pub fn new(key_pair: &EccKeyPair) -> Self {
        Self {
            signing_key: key_pair.signing_key(),
        }
    }
}

impl Signer for EccSigner {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let signature: EccSignature = self
            .signing_key
            .try_sign_with_rng(&mut OsRng, payload)
            .map_err(|e| KeyError::SigningError(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Ecc
    }
}

/// Build the signer matching a key pair.
pub fn signer_for(key_pair: &KeyPair) -> Box<dyn Signer> {
    match key_pair {
        KeyPair::Rsa(kp) => Box::new(RsaSigner::new(kp)),
        KeyPair::Ecc(kp) => Box::new(EccSigner::new(kp)),
    }
}

/// Decode a stored private key and build its signer.
///
/// Dispatch follows the declared `algorithm`; an envelope holding a key of
/// another algorithm is rejected as a signing failure.
pub fn signer_from_pem(algorithm: Algorithm, private_pem: &str) -> Result<Box<dyn Signer>> {
    let key_pair = encoding::decode(algorithm, private_pem).map_err(|e| {
        KeyError::SigningError(format!("private key does not match {algorithm}: {e}"))
    })?;
    Ok(signer_for(&key_pair))
}
