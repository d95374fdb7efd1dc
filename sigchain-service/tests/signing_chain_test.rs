use base64::{engine::general_purpose::STANDARD, Engine as _};
use sigchain_keys::{verify_pem, Algorithm};
use sigchain_service::*;
use std::sync::{Arc, Barrier};
use std::thread;

// Smaller modulus keeps RSA generation fast in debug builds
const TEST_RSA_BITS: usize = 1024;

fn service() -> SigningService {
    let config = ServiceConfig::new("signing-chain-test").with_rsa_key_bits(TEST_RSA_BITS);
    SigningService::new(config)
}

fn counter_of(signed_data: &str) -> u64 {
    signed_data
        .split('_')
        .next()
        .and_then(|c| c.parse().ok())
        .expect("signed data starts with a counter")
}

/// Check that `records` form a gap-free chain 0..n-1 whose links verify.
fn assert_valid_chain(device: &DeviceResponse, responses: &[SignatureResponse]) {
    let mut ordered: Vec<&SignatureResponse> = responses.iter().collect();
    ordered.sort_by_key(|r| counter_of(&r.signed_data));

    for (i, response) in ordered.iter().enumerate() {
        assert_eq!(counter_of(&response.signed_data), i as u64);

        let anchor = if i == 0 {
            genesis_anchor(&device.id)
        } else {
            ordered[i - 1].signature.clone()
        };
        assert!(
            response.signed_data.ends_with(&format!("_{anchor}")),
            "link {i} does not embed its predecessor"
        );

        let raw = STANDARD.decode(&response.signature).expect("signature is base64");
        verify_pem(
            device.algorithm,
            &device.public_key,
            response.signed_data.as_bytes(),
            &raw,
        )
        .expect("signature verifies with the device public key");
    }
}

#[test]
fn test_create_device_returns_fresh_device() {
    let service = service();

    for algorithm in ["RSA", "ECC"] {
        let device = service
            .create_device(CreateDeviceRequest::new(algorithm, "my device"))
            .expect("Failed to create device");
        assert_eq!(device.algorithm.as_str(), algorithm);
        assert_eq!(device.signature_counter, 0);
        assert_eq!(device.label, "my device");
        assert!(device.public_key.starts_with("-----BEGIN PUBLIC KEY-----"));
        assert!(!device.public_key.contains("PRIVATE"));
        assert_eq!(service.get_device(&device.id).unwrap(), device);
    }

    assert_eq!(service.list_devices().len(), 2);
}

#[test]
fn test_genesis_signature_anchors_to_device_id() {
    let service = service();
    let device = service
        .create_device(CreateDeviceRequest::new("ECC", ""))
        .unwrap();

    let response = service
        .sign(SignRequest::new(&device.id, "test-data"))
        .unwrap();
    assert_eq!(
        response.signed_data,
        format!("0_test-data_{}", STANDARD.encode(device.id.as_bytes()))
    );
    assert_eq!(service.get_device(&device.id).unwrap().signature_counter, 1);
}

#[test]
fn test_sequential_signs_build_contiguous_chain() {
    let service = service();

    for algorithm in Algorithm::ALL {
        let device = service
            .create_device(CreateDeviceRequest::new(algorithm.as_str(), "seq"))
            .unwrap();

        let n = 5;
        let responses: Vec<SignatureResponse> = (0..n)
            .map(|i| {
                service
                    .sign(SignRequest::new(&device.id, format!("tx-{i}")))
                    .expect("Failed to sign")
            })
            .collect();

        assert_valid_chain(&device, &responses);
        assert_eq!(
            responses[1].signed_data,
            format!("1_tx-1_{}", responses[0].signature)
        );

        let stored = service.list_device_signatures(&device.id).unwrap();
        let counters: Vec<u64> = stored.iter().map(|r| r.signature_counter).collect();
        assert_eq!(counters, (0..n as u64).collect::<Vec<_>>());
        assert!(stored.iter().all(|r| r.device_id == device.id));
        assert_eq!(
            service.get_device(&device.id).unwrap().signature_counter,
            n as u64
        );
        assert_eq!(service.get_signature(&stored[2].id).unwrap(), stored[2]);
    }

    assert_eq!(service.list_signatures().len(), 10);
}

#[test]
fn test_concurrent_signs_on_one_device_are_serialized() {
    let service = Arc::new(service());
    let device = service
        .create_device(CreateDeviceRequest::new("ECC", "contended"))
        .unwrap();

    let m = 32;
    let barrier = Arc::new(Barrier::new(m));
    let handles: Vec<_> = (0..m)
        .map(|i| {
            let service = service.clone();
            let barrier = barrier.clone();
            let device_id = device.id.clone();
            thread::spawn(move || {
                barrier.wait();
                service
                    .sign(SignRequest::new(device_id, format!("req-{i}")))
                    .expect("Concurrent sign failed")
            })
        })
        .collect();

    let responses: Vec<SignatureResponse> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    let mut claimed: Vec<u64> = responses
        .iter()
        .map(|r| counter_of(&r.signed_data))
        .collect();
    claimed.sort_unstable();
    assert_eq!(claimed, (0..m as u64).collect::<Vec<_>>());

    assert_valid_chain(&device, &responses);
    assert_eq!(service.list_device_signatures(&device.id).unwrap().len(), m);
    assert_eq!(
        service.get_device(&device.id).unwrap().signature_counter,
        m as u64
    );
}

#[test]
fn test_concurrent_signs_across_devices_keep_chains_separate() {
    let service = Arc::new(service());
    let devices: Vec<DeviceResponse> = (0..4)
        .map(|i| {
            let algorithm = if i % 2 == 0 { "ECC" } else { "RSA" };
            service
                .create_device(CreateDeviceRequest::new(algorithm, format!("d{i}")))
                .unwrap()
        })
        .collect();

    let per_device = 6;
    let mut handles = Vec::new();
    for device in &devices {
        for i in 0..per_device {
            let service = service.clone();
            let device_id = device.id.clone();
            handles.push(thread::spawn(move || {
                let response = service
                    .sign(SignRequest::new(device_id.clone(), format!("data-{i}")))
                    .expect("Concurrent sign failed");
                (device_id, response)
            }));
        }
    }

    let results: Vec<(String, SignatureResponse)> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    for device in &devices {
        let responses: Vec<SignatureResponse> = results
            .iter()
            .filter(|(id, _)| *id == device.id)
            .map(|(_, r)| r.clone())
            .collect();
        assert_eq!(responses.len(), per_device);
        assert_valid_chain(device, &responses);
        assert_eq!(
            service.get_device(&device.id).unwrap().signature_counter,
            per_device as u64
        );
    }
    assert_eq!(service.list_signatures().len(), devices.len() * per_device);
}

#[test]
fn test_unknown_device_is_not_found() {
    let service = service();

    let err = service
        .sign(SignRequest::new("no-such-device", "data"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    assert!(service.get_device("no-such-device").unwrap_err().is_not_found());
    assert!(service
        .list_device_signatures("no-such-device")
        .unwrap_err()
        .is_not_found());
    assert!(service.get_signature("no-such-signature").unwrap_err().is_not_found());
    assert!(service.list_signatures().is_empty());
}

#[test]
fn test_unsupported_algorithm_is_validation_error() {
    let service = service();

    for algorithm in ["rsa", "Ecc", "ED25519", ""] {
        let err = service
            .create_device(CreateDeviceRequest::new(algorithm, "label"))
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::Validation(_)),
            "{algorithm:?} produced {err:?}"
        );
    }
    assert!(service.list_devices().is_empty());
}

#[test]
fn test_sign_validation_leaves_chain_untouched() {
    let service = service();
    let device = service
        .create_device(CreateDeviceRequest::new("ECC", ""))
        .unwrap();

    let err = service.sign(SignRequest::new(&device.id, "")).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Validation(vec!["data is required".to_string()])
    );
    assert_eq!(service.get_device(&device.id).unwrap().signature_counter, 0);
    assert!(service.list_device_signatures(&device.id).unwrap().is_empty());
}

/// Signature store that stores records but never reports them back.
struct ForgetfulSignatureStore {
    inner: InMemorySignatureStore,
}

impl SignatureStore for ForgetfulSignatureStore {
    fn create(&self, record: SignatureRecord) -> Result<()> {
        self.inner.create(record)
    }

    fn get(&self, id: &str) -> Result<SignatureRecord> {
        self.inner.get(id)
    }

    fn latest_for(&self, device_id: &str) -> Result<SignatureRecord> {
        Err(ServiceError::NotFound(format!("forgot {device_id}")))
    }

    fn list_all(&self) -> Vec<SignatureRecord> {
        self.inner.list_all()
    }

    fn list_by_device(&self, device_id: &str) -> Vec<SignatureRecord> {
        self.inner.list_by_device(device_id)
    }
}

#[test]
fn test_missing_prior_signature_surfaces_chain_error_and_releases_lock() {
    let service = SigningService::with_stores(
        ServiceConfig::new("forgetful"),
        Arc::new(InMemoryDeviceStore::new()),
        Arc::new(ForgetfulSignatureStore {
            inner: InMemorySignatureStore::new(),
        }),
    );
    let device = service
        .create_device(CreateDeviceRequest::new("ECC", ""))
        .unwrap();

    service.sign(SignRequest::new(&device.id, "first")).unwrap();

    // Each failing call must give the lock back, or the next one would block
    for _ in 0..3 {
        let err = service
            .sign(SignRequest::new(&device.id, "second"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Chain(ref m) if m.contains("no prior signature")));
    }

    assert_eq!(service.get_device(&device.id).unwrap().signature_counter, 1);
    assert_eq!(service.list_device_signatures(&device.id).unwrap().len(), 1);
}

#[test]
fn test_orchestrator_rejects_private_key_of_other_algorithm() {
    let devices = Arc::new(InMemoryDeviceStore::new());
    let signatures = Arc::new(InMemorySignatureStore::new());
    let service = SigningService::with_stores(
        ServiceConfig::new("mismatch").with_rsa_key_bits(TEST_RSA_BITS),
        devices.clone(),
        signatures.clone(),
    );
    let ecc = service
        .create_device(CreateDeviceRequest::new("ECC", ""))
        .unwrap();

    // A device that claims RSA but carries ECC key material
    let ecc_private = {
        let generator = sigchain_keys::KeyPairGenerator::new(
            sigchain_keys::KeyGenConfig::default(),
            &sigchain_common::logging::Logger::new_root(
                sigchain_common::logging::Component::Custom("test"),
                "test",
            ),
        );
        sigchain_keys::encode(&generator.generate(Algorithm::Ecc).unwrap()).unwrap()
    };
    devices
        .create(Device::with_id("liar", Algorithm::Rsa, ecc_private, ""))
        .unwrap();

    let err = service.sign(SignRequest::new("liar", "data")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Key(sigchain_keys::KeyError::SigningError(_))
    ));
    assert_eq!(service.get_device("liar").unwrap().signature_counter, 0);
    assert!(signatures.list_by_device("liar").is_empty());

    // Other devices are unaffected
    service.sign(SignRequest::new(&ecc.id, "data")).unwrap();
}
