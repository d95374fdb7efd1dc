// Signing service
//
// Inbound operation surface: device creation, signing, and read-only listing.
// Transport-agnostic; an HTTP or RPC layer maps its requests onto these calls
// and ServiceError variants onto its own status codes.

use sigchain_common::logging::{Component, Logger};
use sigchain_common::log_info;
use sigchain_keys::{encode, KeyPairGenerator};
use std::sync::Arc;

use crate::api::{CreateDeviceRequest, DeviceResponse, SignRequest, SignatureResponse};
use crate::config::ServiceConfig;
use crate::domain::{Device, SignatureRecord};
use crate::error::{Result, ServiceError};
use crate::orchestrator::SigningOrchestrator;
use crate::store::{DeviceStore, InMemoryDeviceStore, InMemorySignatureStore, SignatureStore};

pub struct SigningService {
    config: ServiceConfig,
    generator: KeyPairGenerator,
    devices: Arc<dyn DeviceStore>,
    signatures: Arc<dyn SignatureStore>,
    orchestrator: SigningOrchestrator,
    logger: Logger,
}

impl SigningService {
    /// Service backed by in-memory stores
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_stores(
            config,
            Arc::new(InMemoryDeviceStore::new()),
            Arc::new(InMemorySignatureStore::new()),
        )
    }

    pub fn with_stores(
        config: ServiceConfig,
        devices: Arc<dyn DeviceStore>,
        signatures: Arc<dyn SignatureStore>,
    ) -> Self {
        config.logging.apply();

        let logger = Logger::new_root(Component::Service, &config.instance_id);
        let generator = KeyPairGenerator::new(config.key_gen_config(), &logger);
        let orchestrator = SigningOrchestrator::new(devices.clone(), signatures.clone(), &logger);

        Self {
            config,
            generator,
            devices,
            signatures,
            orchestrator,
            logger,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Create a device with a fresh key pair and an empty chain.
    pub fn create_device(&self, request: CreateDeviceRequest) -> Result<DeviceResponse> {
        let algorithm = request.validate()?;

        let key_pair = self.generator.generate(algorithm)?;
        let encoded = encode(&key_pair)?;
        let device = Device::new(algorithm, encoded, request.label);
        let response = DeviceResponse::from(&device);

        self.devices.create(device)?;
        log_info!(
            self.logger,
            "created {} device {} ({} devices registered)",
            algorithm,
            response.id,
            self.devices.count()
        );
        Ok(response)
    }

    /// Sign `data` as the next link of the device's chain.
    pub fn sign(&self, request: SignRequest) -> Result<SignatureResponse> {
        request.validate()?;
        let outcome = self.orchestrator.sign(&request.device_id, &request.data)?;
        Ok(SignatureResponse::from(outcome))
    }

    pub fn get_device(&self, device_id: &str) -> Result<DeviceResponse> {
        let device = self.devices.get(device_id)?;
        Ok(DeviceResponse::from(&device))
    }

    pub fn list_devices(&self) -> Vec<DeviceResponse> {
        self.devices
            .list_all()
            .iter()
            .map(DeviceResponse::from)
            .collect()
    }

    pub fn list_signatures(&self) -> Vec<SignatureRecord> {
        self.signatures.list_all()
    }

    /// The chain of one device, ordered by counter.
    pub fn list_device_signatures(&self, device_id: &str) -> Result<Vec<SignatureRecord>> {
        if device_id.is_empty() {
            return Err(ServiceError::Validation(vec!["device_id is required".to_string()]));
        }
        self.devices.get(device_id)?;
        Ok(self.signatures.list_by_device(device_id))
    }

    pub fn get_signature(&self, signature_id: &str) -> Result<SignatureRecord> {
        self.signatures.get(signature_id)
    }
}
