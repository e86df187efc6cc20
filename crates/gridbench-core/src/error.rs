use std::path::PathBuf;
use thiserror::Error;

/// Errors shared by the orchestrator, the store and the gateway adapters.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    ConfigFormat(String),

    #[error("provider '{0}' is not supported or has no configuration section")]
    UnsupportedProvider(String),

    #[error("network validation failed: {0}")]
    NetworkValidation(String),

    #[error("state file is unreadable: {path}\nreason: {message}")]
    StoreCorrupt { path: PathBuf, message: String },

    #[error("unknown stage tag: {0}")]
    UnknownTag(String),

    #[error("stage '{stage}' requires '{missing}' to have run first")]
    MissingPrerequisite { stage: String, missing: String },

    #[error("provider error: {0}")]
    Provider(String),

    #[error("automation unit '{unit}' failed\n{log}")]
    Automation { unit: String, log: String },

    #[error("light mode needs at least two database hosts, found {0}")]
    NotEnoughHosts(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
