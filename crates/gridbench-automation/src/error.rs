use std::path::PathBuf;
use thiserror::Error;

/// Errors local to the automation adapters, converted into core errors at
/// the gateway boundary.
#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("automation unit not found: {0}")]
    UnitNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AutomationError> for gridbench_core::Error {
    fn from(err: AutomationError) -> Self {
        match err {
            AutomationError::UnitNotFound(path) => gridbench_core::Error::Automation {
                unit: path.display().to_string(),
                log: "playbook file not found".to_string(),
            },
            AutomationError::Io(e) => gridbench_core::Error::Io(e),
            AutomationError::Json(e) => gridbench_core::Error::Json(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutomationError>;
