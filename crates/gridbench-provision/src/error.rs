use thiserror::Error;

/// Errors local to the provisioning adapters, converted into core errors at
/// the gateway boundary.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("invalid provider section: {0}")]
    InvalidSection(String),

    #[error("{0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProvisionError> for gridbench_core::Error {
    fn from(err: ProvisionError) -> Self {
        match err {
            ProvisionError::InvalidSection(msg) => gridbench_core::Error::Provider(msg),
            ProvisionError::Network(msg) => gridbench_core::Error::NetworkValidation(msg),
            ProvisionError::Io(e) => gridbench_core::Error::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
