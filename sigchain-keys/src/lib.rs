//! Sigchain Keys – key generation, PEM envelopes and signing for devices

pub mod encoding;
pub mod error;
pub mod generator;
pub mod signer;
pub mod types;
pub mod verify;

pub use error::{KeyError, Result};

pub use types::{Algorithm, EccKeyPair, EncodedKeyPair, KeyPair, PublicKey, RsaKeyPair};

pub use generator::{KeyGenConfig, KeyPairGenerator, DEFAULT_RSA_KEY_BITS, MIN_RSA_KEY_BITS};

pub use encoding::{decode, decode_public, encode};

pub use signer::{signer_for, signer_from_pem, EccSigner, RsaSigner, Signer};

pub use verify::{verify, verify_pem};
