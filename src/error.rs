use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::onet::OnetImportError;
use crate::workflows::pipeline::{CacheError, CollaboratorError, OutputError, PipelineError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Import(OnetImportError),
    Collaborator(CollaboratorError),
    Cache(CacheError),
    Pipeline(PipelineError),
    Output(OutputError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Import(err) => write!(f, "import error: {err}"),
            AppError::Collaborator(err) => write!(f, "scoring service error: {err}"),
            AppError::Cache(err) => write!(f, "cache error: {err}"),
            AppError::Pipeline(err) => write!(f, "pipeline error: {err}"),
            AppError::Output(err) => write!(f, "output error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Collaborator(err) => Some(err),
            AppError::Cache(err) => Some(err),
            AppError::Pipeline(err) => Some(err),
            AppError::Output(err) => Some(err),
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

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<OnetImportError> for AppError {
    fn from(value: OnetImportError) -> Self {
        Self::Import(value)
    }
}

impl From<CollaboratorError> for AppError {
    fn from(value: CollaboratorError) -> Self {
        Self::Collaborator(value)
    }
}

impl From<CacheError> for AppError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<PipelineError> for AppError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<OutputError> for AppError {
    fn from(value: OutputError) -> Self {
        Self::Output(value)
    }
}
