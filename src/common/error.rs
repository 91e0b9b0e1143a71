// src/common/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Display initialization failed: {0}")]
    DisplayInit(String),

    #[error("Display update failed")]
    DisplayUpdateFailed,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Time format error: {0}")]
    TimeFormat(String),

    #[error("Image decode error: {0}")]
    Decode(&'static str),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Signal handling error: {0}")]
    SignalError(String),

    #[error("Task spawn failed: {0}")]
    TaskSpawn(String),
}

pub type Result<T> = core::result::Result<T, AppError>;
