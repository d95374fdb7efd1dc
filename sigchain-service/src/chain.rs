//! Construction of the payload signed as the next link of a device's chain.
//!
//! Payload format:
//!
//! ```text
//! genesis:  "0_"         + data + "_" + base64(device_id)
//! n > 0:    "{n}_"       + data + "_" + signature_value(n - 1)
//! ```
//!
//! where `signature_value(n - 1)` is the previous record's value exactly as
//! stored (base64 of the raw signature). Each signature therefore commits to
//! the one before it, and the first one to the device identifier.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::domain::{Device, SignatureRecord};
use crate::error::{Result, ServiceError};

/// Counter and exact payload for the next signature of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    pub counter: u64,
    pub payload: String,
}

/// Anchor of a device's chain: the standard base64 of its id.
pub fn genesis_anchor(device_id: &str) -> String {
    STANDARD.encode(device_id.as_bytes())
}

/// Compute the next link from a device snapshot and its latest record.
///
/// Pure: same inputs, same bytes. Any disagreement between the device counter
/// and the stored chain is reported as `ServiceError::Chain` rather than
/// patched over.
pub fn next_step(
    device: &Device,
    latest: Option<&SignatureRecord>,
    data: &str,
) -> Result<ChainStep> {
    let counter = device.signature_counter();

    match (counter, latest) {
        (0, None) => Ok(ChainStep {
            counter: 0,
            payload: format!("0_{}_{}", data, genesis_anchor(device.id())),
        }),
        (0, Some(record)) => Err(ServiceError::Chain(format!(
            "device {} has counter 0 but signature {} is already recorded",
            device.id(),
            record.signature_counter
        ))),
        (_, None) => Err(ServiceError::Chain(format!(
            "no prior signature found for device {} with counter {counter}",
            device.id()
        ))),
        (_, Some(record)) => {
            if record.device_id != device.id() {
                return Err(ServiceError::Chain(format!(
                    "latest signature belongs to device {}, not {}",
                    record.device_id,
                    device.id()
                )));
            }
            let next = record.signature_counter + 1;
            if next != counter {
                return Err(ServiceError::Chain(format!(
                    "device {} has counter {counter} but latest signature is {}",
                    device.id(),
                    record.signature_counter
                )));
            }
            Ok(ChainStep {
                counter: next,
                payload: format!("{}_{}_{}", next, data, record.signature_value),
            })
        }
    }
}
