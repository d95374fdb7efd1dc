//! Signature verification against a device public key.

use crate::encoding;
use crate::error::{KeyError, Result};
use crate::types::{Algorithm, PublicKey};
use p256::ecdsa::{signature::Verifier as _, Signature as EccSignature};
use rsa::pss::{Signature as RsaSignature, VerifyingKey as RsaVerifyingKey};
use rsa::signature::Verifier as _;
use sha2::Sha256;

/// Verify `signature` over `payload` with an already decoded public key.
pub fn verify(public_key: &PublicKey, payload: &[u8], signature: &[u8]) -> Result<()> {
    match public_key {
        PublicKey::Rsa(key) => {
            let signature = RsaSignature::try_from(signature)
                .map_err(|e| KeyError::VerificationError(e.to_string()))?;
            RsaVerifyingKey::<Sha256>::new(key.clone())
                .verify(payload, &signature)
                .map_err(|e| KeyError::VerificationError(e.to_string()))
        }
        PublicKey::Ecc(key) => {
            let signature = EccSignature::from_der(signature)
                .map_err(|e| KeyError::VerificationError(e.to_string()))?;
            key.verify(payload, &signature)
                .map_err(|e| KeyError::VerificationError(e.to_string()))
        }
    }
}

/// Verify against a public key still in its PEM envelope.
pub fn verify_pem(
    algorithm: Algorithm,
    public_pem: &str,
    payload: &[u8],
    signature: &[u8],
) -> Result<()> {
    let public_key = encoding::decode_public(algorithm, public_pem)?;
    verify(&public_key, payload, signature)
}
