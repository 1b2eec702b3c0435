use crate::api::ApiError;
use crate::config::ConfigError;
use crate::pipeline::DeskError;
use crate::session::{SessionError, StorageError};
use crate::telemetry::TelemetryError;
use std::fmt;

/// Process-level error for binaries built on the portal core.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Session(SessionError),
    Desk(DeskError),
    Api(ApiError),
    Storage(StorageError),
    Io(std::io::Error),
}

impl AppError {
    /// True when the backend refused the credential and the user must sign in again.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            AppError::Api(err) => err.is_unauthorized(),
            AppError::Session(SessionError::Upstream(err)) => err.is_unauthorized(),
            AppError::Desk(err) => err.is_unauthorized(),
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Desk(err) => write!(f, "pipeline error: {}", err),
            AppError::Api(err) => write!(f, "backend error: {}", err),
            AppError::Storage(err) => write!(f, "credential storage error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Desk(err) => Some(err),
            AppError::Api(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<DeskError> for AppError {
    fn from(value: DeskError) -> Self {
        Self::Desk(value)
    }
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<StorageError> for AppError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
