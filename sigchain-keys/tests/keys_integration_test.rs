use sigchain_common::logging::{Component, Logger};
use sigchain_keys::*;

// Smaller modulus keeps RSA generation fast in debug builds
const TEST_RSA_BITS: usize = 1024;

fn generator() -> KeyPairGenerator {
    let logger = Logger::new_root(Component::Custom("keys_integration"), "test");
    KeyPairGenerator::new(
        KeyGenConfig::default().with_rsa_key_bits(TEST_RSA_BITS),
        &logger,
    )
}

#[test]
fn test_round_trip_sign_and_verify_for_every_algorithm() {
    let generator = generator();
    let payload = b"0_test-data_dGVzdC1kZXZpY2U=";

    for algorithm in Algorithm::ALL {
        let key_pair = generator
            .generate(algorithm)
            .expect("Failed to generate key pair");
        assert_eq!(key_pair.algorithm(), algorithm);

        let encoded = encode(&key_pair).expect("Failed to encode key pair");
        let decoded = decode(algorithm, &encoded.private_pem).expect("Failed to decode key pair");
        assert_eq!(decoded, key_pair, "{algorithm} decode(encode(k)) != k");

        let signer = signer_for(&decoded);
        assert_eq!(signer.algorithm(), algorithm);
        let signature = signer.sign(payload).expect("Failed to sign");

        verify_pem(algorithm, &encoded.public_pem, payload, &signature)
            .expect("Signature should verify with the original public key");
        verify(&key_pair.public_key(), payload, &signature)
            .expect("Signature should verify with the decoded public key");

        let err = verify(&key_pair.public_key(), b"tampered", &signature).unwrap_err();
        assert!(matches!(err, KeyError::VerificationError(_)));
    }
}

#[test]
fn test_signatures_are_randomized() {
    let generator = generator();
    let payload = b"same payload";

    for algorithm in Algorithm::ALL {
        let key_pair = generator.generate(algorithm).unwrap();
        let signer = signer_for(&key_pair);

        let first = signer.sign(payload).unwrap();
        let second = signer.sign(payload).unwrap();
        assert_ne!(first, second, "{algorithm} signatures should differ");

        let public_key = key_pair.public_key();
        verify(&public_key, payload, &first).unwrap();
        verify(&public_key, payload, &second).unwrap();
    }
}

#[test]
fn test_ecc_signature_is_der_encoded() {
    let key_pair = generator().generate(Algorithm::Ecc).unwrap();
    let signature = signer_for(&key_pair).sign(b"payload").unwrap();

    // DER SEQUENCE tag, and never longer than the P-256 maximum of 72 bytes
    assert_eq!(signature[0], 0x30);
    assert!(signature.len() <= 72);
    assert_eq!(signature[1] as usize, signature.len() - 2);
}

#[test]
fn test_rsa_signature_matches_modulus_size() {
    let key_pair = generator().generate(Algorithm::Rsa).unwrap();
    let signature = signer_for(&key_pair).sign(b"payload").unwrap();
    assert_eq!(signature.len(), TEST_RSA_BITS / 8);
}

#[test]
fn test_decode_rejects_envelope_of_other_algorithm() {
    let generator = generator();
    let rsa = encode(&generator.generate(Algorithm::Rsa).unwrap()).unwrap();
    let ecc = encode(&generator.generate(Algorithm::Ecc).unwrap()).unwrap();

    assert!(matches!(
        decode(Algorithm::Ecc, &rsa.private_pem),
        Err(KeyError::DecodingError(_))
    ));
    assert!(matches!(
        decode(Algorithm::Rsa, &ecc.private_pem),
        Err(KeyError::DecodingError(_))
    ));
    assert!(decode_public(Algorithm::Rsa, &ecc.public_pem).is_err());
    assert!(decode_public(Algorithm::Ecc, &rsa.public_pem).is_err());

    match signer_from_pem(Algorithm::Rsa, &ecc.private_pem) {
        Err(KeyError::SigningError(_)) => {}
        Err(other) => panic!("expected SigningError, got {other}"),
        Ok(_) => panic!("ECC key must not produce an RSA signer"),
    }
}

#[test]
fn test_public_key_round_trip() {
    let generator = generator();
    for algorithm in Algorithm::ALL {
        let key_pair = generator.generate(algorithm).unwrap();
        let encoded = encode(&key_pair).unwrap();
        let public_key = decode_public(algorithm, &encoded.public_pem).unwrap();
        assert_eq!(public_key, key_pair.public_key());
        assert_eq!(public_key.algorithm(), algorithm);
    }
}
