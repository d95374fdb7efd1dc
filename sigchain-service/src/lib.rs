//! Sigchain service – signature devices and their signature chains
//!
//! Each device owns an RSA or ECC key pair and a counter. Every signature a
//! device produces covers a payload that embeds the previous signature (or,
//! for the first one, the device id), so a device's signatures form a chain
//! with contiguous counters `0..N-1`. Signing for one device is serialized by
//! a per-device lock; different devices sign in parallel.

pub mod api;
pub mod chain;
pub mod config;
pub mod domain;
pub mod error;
pub mod locks;
pub mod orchestrator;
pub mod service;
pub mod store;

pub use api::{CreateDeviceRequest, DeviceResponse, SignRequest, SignatureResponse};
pub use chain::{genesis_anchor, next_step, ChainStep};
pub use config::ServiceConfig;
pub use domain::{Device, SignatureRecord};
pub use error::{Result, ServiceError};
pub use locks::{DeviceLock, DeviceLockGuard, DeviceLockRegistry};
pub use orchestrator::{SignOutcome, SignStage, SigningOrchestrator};
pub use service::SigningService;
pub use store::{DeviceStore, InMemoryDeviceStore, InMemorySignatureStore, SignatureStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
