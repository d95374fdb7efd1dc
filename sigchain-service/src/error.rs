use sigchain_keys::KeyError;
use thiserror::Error;

/// Failures surfaced by the signing service.
///
/// Every variant is returned before any shared chain state is touched, or
/// after the state change it reports has fully completed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed or missing input, one message per offending field
    #[error("Validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Key(#[from] KeyError),

    /// Device counter and stored signatures disagree
    #[error("Chain error: {0}")]
    Chain(String),
}

impl ServiceError {
    pub fn device_not_found(device_id: &str) -> Self {
        ServiceError::NotFound(format!("device with id {device_id} not found"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

/// Result type for sigchain service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
